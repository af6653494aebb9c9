/// Lowest cutoff reachable from the control.
pub const MIN_CUTOFF_HZ: f64 = 20.0;
/// Highest cutoff reachable from the control.
pub const MAX_CUTOFF_HZ: f64 = 20_000.0;
/// Control positions run from 0 to this value.
pub const TAPER_STEPS: f64 = 1_000.0;

/// Maps a control position in `0..=TAPER_STEPS` to a cutoff in Hz.
///
/// Exponential: three decades above 20 Hz across the range, capped at 20 kHz.
#[inline]
pub fn position_to_cutoff(position: f64) -> f64 {
    let hz = MIN_CUTOFF_HZ * 1_000.0f64.powf(position / TAPER_STEPS);
    hz.min(MAX_CUTOFF_HZ)
}

/// Inverse of [`position_to_cutoff`]. Anything at or below 20 Hz maps to 0.
#[inline]
pub fn cutoff_to_position(cutoff: f64) -> f64 {
    if cutoff <= MIN_CUTOFF_HZ {
        0.0
    } else {
        TAPER_STEPS * (cutoff / MIN_CUTOFF_HZ).ln() / 1_000.0f64.ln()
    }
}
