use thiserror::Error;

/// Errors raised at the checked boundary and while loading settings.
///
/// The filter recurrence itself never fails; these only cover malformed
/// arguments detected before it runs.
#[derive(Debug, Error)]
pub enum LadderError {
    #[error("cutoff buffer has {cutoffs} entries but sample buffer has {samples}")]
    LengthMismatch { samples: usize, cutoffs: usize },
    #[error("filter state must hold exactly 4 values, got {0}")]
    StateLength(usize),
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),
    #[error("invalid filter settings: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = LadderError> = core::result::Result<T, E>;

#[inline]
pub(crate) fn check_sample_rate(sample_rate: f64) -> Result<f64> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(LadderError::InvalidSampleRate(sample_rate))
    }
}
