//! Checked entry point for callers holding untyped slices.

use crate::error::{check_sample_rate, LadderError, Result};
use crate::ladder::{self, LadderState};

/// Validates buffer shapes, then filters `samples`.
///
/// `state` must hold exactly four values; it is updated in place only when
/// the call succeeds. Resonance and sample values are not inspected, so an
/// unstable setting is processed like any other.
pub fn process_checked(
    samples: &[f64],
    cutoffs: &[f64],
    resonance: f64,
    state: &mut [f64],
    sample_rate: f64,
) -> Result<Vec<f64>> {
    if samples.len() != cutoffs.len() {
        tracing::warn!(
            samples = samples.len(),
            cutoffs = cutoffs.len(),
            "rejecting ladder block with mismatched buffers"
        );
        return Err(LadderError::LengthMismatch {
            samples: samples.len(),
            cutoffs: cutoffs.len(),
        });
    }
    let stages = match <[f64; 4]>::try_from(&*state) {
        Ok(stages) => stages,
        Err(_) => {
            tracing::warn!(len = state.len(), "rejecting ladder block with bad state");
            return Err(LadderError::StateLength(state.len()));
        }
    };
    let sample_rate = check_sample_rate(sample_rate).map_err(|err| {
        tracing::warn!(%err, "rejecting ladder block");
        err
    })?;

    let mut ladder_state = LadderState::from_stages(stages);
    let output = ladder::process(samples, cutoffs, resonance, &mut ladder_state, sample_rate);
    state.copy_from_slice(&ladder_state.stages);
    Ok(output)
}

/// Feeds arbitrary bytes through the checked boundary.
///
/// Bytes are read as little-endian `f64`: resonance, sample rate, state
/// length, then interleaved sample/cutoff pairs. A trailing odd value is
/// kept as an extra sample so length mismatches get exercised too.
#[cfg(feature = "fuzzing")]
pub fn fuzz_process(data: &[u8]) {
    let mut values = data
        .chunks_exact(8)
        .map(|chunk| f64::from_le_bytes(chunk.try_into().unwrap_or([0; 8])));
    let resonance = values.next().unwrap_or(0.0);
    let sample_rate = values.next().unwrap_or(44_100.0);
    let state_len = values.next().map_or(4, |v| (v.abs() as usize) % 8);
    let rest: Vec<f64> = values.collect();

    let mut samples = Vec::with_capacity(rest.len() / 2 + 1);
    let mut cutoffs = Vec::with_capacity(rest.len() / 2);
    for pair in rest.chunks(2) {
        samples.push(pair[0]);
        if let Some(fc) = pair.get(1) {
            cutoffs.push(*fc);
        }
    }

    let mut state = vec![0.0; state_len];
    if let Ok(out) = process_checked(&samples, &cutoffs, resonance, &mut state, sample_rate) {
        assert_eq!(out.len(), samples.len());
    }
}
