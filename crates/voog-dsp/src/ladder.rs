//! Zero-delay-feedback 4-pole ladder lowpass.
//!
//! Four trapezoidal one-pole stages share one pre-warped gain `G`. The global
//! feedback loop is solved in closed form each sample, so there is no unit
//! delay in the resonance path and no iteration.

use core::f64::consts::PI;

/// Effective cutoff never exceeds this fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f64 = 0.49;

/// Normalized resonance is scaled by this to form the feedback coefficient.
/// The loop self-oscillates as the coefficient approaches 4.
pub const RESONANCE_SCALE: f64 = 4.0;

/// Integrator states of the four cascaded stages.
///
/// `stages[0]` is the stage closest to the input, `stages[3]` feeds the
/// output. One instance per independent voice or channel; carry it across
/// calls so consecutive blocks filter as one continuous signal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LadderState {
    pub stages: [f64; 4],
}

impl LadderState {
    #[inline]
    pub const fn new() -> Self {
        Self { stages: [0.0; 4] }
    }

    #[inline]
    pub const fn from_stages(stages: [f64; 4]) -> Self {
        Self { stages }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.stages = [0.0; 4];
    }

    #[inline]
    pub fn is_silent(&self) -> bool {
        self.stages.iter().all(|s| *s == 0.0)
    }

    /// Runs one sample through the ladder and returns the fourth stage output.
    #[inline]
    pub fn tick(&mut self, input: f64, cutoff: f64, resonance: f64, sample_rate: f64) -> f64 {
        let g = prewarp_gain(cutoff, sample_rate);
        let r = resonance * RESONANCE_SCALE;
        let [s0, s1, s2, s3] = self.stages;

        let g2 = g * g;
        let g3 = g2 * g;
        let sigma = g3 * s0 + g2 * s1 + g * s2 + s3;
        let u = (input - r * sigma) / (1.0 + r * g * g * g * g);

        let mut lp = u;
        for stage in &mut self.stages {
            let v = (lp - *stage) * g;
            lp = v + *stage;
            *stage = lp + v;
        }
        lp
    }
}

/// Per-stage gain `G` in (0, 1) for a requested cutoff.
///
/// The cutoff is clamped to `MAX_CUTOFF_RATIO * sample_rate` and pre-warped
/// with the bilinear tangent mapping before being turned into the trapezoidal
/// integrator gain.
#[inline]
pub fn prewarp_gain(cutoff: f64, sample_rate: f64) -> f64 {
    let max_fc = MAX_CUTOFF_RATIO * sample_rate;
    // Not `f64::min`: a NaN cutoff must reach the output.
    let fc = if cutoff > max_fc { max_fc } else { cutoff };
    let wa = 2.0 * sample_rate * (PI * fc / sample_rate).tan();
    let g = wa / (2.0 * sample_rate);
    g / (1.0 + g)
}

/// Filters `samples` into a new buffer, one cutoff per sample.
///
/// `state` is read as the initial condition and holds the final stage values
/// on return. No validation is done here; see [`crate::block::process_checked`]
/// for the checked entry point.
pub fn process(
    samples: &[f64],
    cutoffs: &[f64],
    resonance: f64,
    state: &mut LadderState,
    sample_rate: f64,
) -> Vec<f64> {
    let mut output = vec![0.0; samples.len()];
    process_into(samples, cutoffs, resonance, state, sample_rate, &mut output);
    output
}

/// Allocation-free form of [`process`].
///
/// Only the common prefix of the three slices is processed.
pub fn process_into(
    samples: &[f64],
    cutoffs: &[f64],
    resonance: f64,
    state: &mut LadderState,
    sample_rate: f64,
    output: &mut [f64],
) {
    debug_assert_eq!(samples.len(), cutoffs.len());
    debug_assert_eq!(samples.len(), output.len());

    // Work on a local copy so the stage values stay in registers.
    let mut local = *state;
    for ((dst, &x), &fc) in output.iter_mut().zip(samples).zip(cutoffs) {
        *dst = local.tick(x, fc, resonance, sample_rate);
    }
    *state = local;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44_100.0;

    #[test]
    fn gain_is_in_unit_interval() {
        for fc in [1.0, 20.0, 1_000.0, 10_000.0, 21_000.0, 1.0e6] {
            let g = prewarp_gain(fc, SR);
            assert!(g > 0.0 && g < 1.0, "G out of range for {fc}: {g}");
        }
    }

    #[test]
    fn gain_saturates_at_clamp() {
        let clamped = prewarp_gain(MAX_CUTOFF_RATIO * SR, SR);
        assert_eq!(prewarp_gain(SR, SR), clamped);
        assert_eq!(prewarp_gain(f64::INFINITY, SR), clamped);
    }

    #[test]
    fn first_impulse_sample_is_g_to_the_fourth() {
        let mut state = LadderState::new();
        let y = state.tick(1.0, 1_000.0, 0.0, SR);
        let g = prewarp_gain(1_000.0, SR);
        assert!((y - g.powi(4)).abs() < 1e-18);
    }

    #[test]
    fn feedback_denominator_multiplies_left_to_right() {
        // One sample from a charged state, evaluated in the reference order.
        let (x, fc, resonance) = (0.3, 3_000.0, 0.85);
        let mut state = LadderState::from_stages([0.7, -0.4, 0.25, 0.9]);
        let [s0, s1, s2, s3] = state.stages;
        let y = state.tick(x, fc, resonance, SR);

        let g = prewarp_gain(fc, SR);
        let r = resonance * 4.0;
        let sigma = g * g * g * s0 + g * g * s1 + g * s2 + s3;
        let mut lp = (x - r * sigma) / (1.0 + r * g * g * g * g);
        for s in [s0, s1, s2, s3] {
            let v = (lp - s) * g;
            lp = v + s;
        }
        assert_eq!(y.to_bits(), lp.to_bits());
    }

    #[test]
    fn dc_gain_matches_fixed_point() {
        // At rest every stage equals its input, so y = x / (1 + r * (1 + G + G^2 + G^3 + G^4)).
        let resonance = 0.5;
        let fc = 1_000.0;
        let n = 40_000;
        let mut state = LadderState::new();
        let out = process(&vec![1.0; n], &vec![fc; n], resonance, &mut state, SR);

        let g = prewarp_gain(fc, SR);
        let r = resonance * RESONANCE_SCALE;
        let expected = 1.0 / (1.0 + r * (1.0 + g + g * g + g.powi(3) + g.powi(4)));
        assert!((out[n - 1] - expected).abs() < 1e-9, "{} vs {}", out[n - 1], expected);
    }

    #[test]
    fn process_into_matches_process() {
        let samples: Vec<f64> = (0..256).map(|i| ((i as f64) * 0.1).sin()).collect();
        let cutoffs: Vec<f64> = (0..256).map(|i| 200.0 + 30.0 * i as f64).collect();

        let mut a = LadderState::new();
        let expected = process(&samples, &cutoffs, 0.3, &mut a, SR);

        let mut b = LadderState::new();
        let mut out = vec![0.0; samples.len()];
        process_into(&samples, &cutoffs, 0.3, &mut b, SR, &mut out);

        assert_eq!(expected, out);
        assert_eq!(a, b);
    }

    #[test]
    fn cutoff_buffer_is_not_mutated() {
        let cutoffs = vec![SR; 8];
        let mut state = LadderState::new();
        let _ = process(&[1.0; 8], &cutoffs, 0.2, &mut state, SR);
        assert!(cutoffs.iter().all(|c| *c == SR));
    }

    #[test]
    fn nan_propagates_into_state() {
        let mut state = LadderState::new();
        let out = process(&[f64::NAN, 0.0, 0.0], &[1_000.0; 3], 0.0, &mut state, SR);
        assert!(out.iter().all(|y| y.is_nan()));
        assert!(state.stages.iter().all(|s| s.is_nan()));
    }

    #[test]
    fn nan_cutoff_is_not_clamped_away() {
        assert!(prewarp_gain(f64::NAN, SR).is_nan());
    }

    #[test]
    fn reset_clears_state() {
        let mut state = LadderState::new();
        state.tick(1.0, 500.0, 0.7, SR);
        assert!(!state.is_silent());
        state.reset();
        assert!(state.is_silent());
    }
}
