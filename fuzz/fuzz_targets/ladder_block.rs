#![no_main]

use libfuzzer_sys::fuzz_target;
use voog_dsp::block::fuzz_process;

fuzz_target!(|data: &[u8]| {
    fuzz_process(data);
});
