#![deny(unsafe_op_in_unsafe_fn)]

pub mod block;
pub mod config;
pub mod denormal;
pub mod error;
pub mod filter;
pub mod ladder;
pub mod taper;

pub use block::process_checked;
pub use config::FilterSettings;
pub use error::{LadderError, Result};
pub use filter::MoogFilter;
pub use ladder::{prewarp_gain, process, process_into, LadderState};
