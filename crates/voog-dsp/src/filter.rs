use crate::config::FilterSettings;
use crate::denormal::with_flush_to_zero;
use crate::error::{check_sample_rate, Result};
use crate::ladder::{self, LadderState, MAX_CUTOFF_RATIO};
use crate::taper::MIN_CUTOFF_HZ;

/// Note at which key tracking leaves the cutoff unchanged.
pub const KEY_TRACK_CENTER: u8 = 60;

/// Per-voice ladder filter with its own cutoff, resonance and state.
#[derive(Clone, Debug)]
pub struct MoogFilter {
    cutoff: f64,
    resonance: f64,
    env_amount: f64,
    key_tracking: f64,
    sample_rate: f64,
    state: LadderState,
    cutoff_buf: Vec<f64>,
}

impl Default for MoogFilter {
    fn default() -> Self {
        let settings = FilterSettings::default();
        Self {
            cutoff: settings.cutoff,
            resonance: settings.resonance,
            env_amount: settings.env_amount,
            key_tracking: settings.key_tracking,
            sample_rate: settings.sample_rate,
            state: LadderState::new(),
            cutoff_buf: Vec::new(),
        }
    }
}

impl MoogFilter {
    /// Default settings at `sample_rate`, which must be finite and positive.
    pub fn new(sample_rate: f64) -> Result<Self> {
        let mut filter = Self::default();
        filter.sample_rate = check_sample_rate(sample_rate)?;
        Ok(filter)
    }

    pub fn from_settings(settings: &FilterSettings) -> Result<Self> {
        let mut filter = Self::default();
        filter.apply_settings(settings)?;
        Ok(filter)
    }

    pub fn settings(&self) -> FilterSettings {
        FilterSettings {
            cutoff: self.cutoff,
            resonance: self.resonance,
            env_amount: self.env_amount,
            key_tracking: self.key_tracking,
            sample_rate: self.sample_rate,
        }
    }

    /// Applies new settings, keeping the current filter state.
    pub fn apply_settings(&mut self, settings: &FilterSettings) -> Result<()> {
        self.set_sample_rate(settings.sample_rate)?;
        self.cutoff = settings.cutoff;
        self.resonance = settings.resonance;
        self.env_amount = settings.env_amount;
        self.key_tracking = settings.key_tracking;
        Ok(())
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if sample_rate != self.sample_rate {
            tracing::debug!(from = self.sample_rate, to = sample_rate, "ladder sample rate changed");
            self.sample_rate = sample_rate;
        }
        Ok(())
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    pub fn set_cutoff(&mut self, cutoff: f64) {
        self.cutoff = cutoff;
    }

    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Resonance is stored as given; values near or above 1 self-oscillate.
    #[inline]
    pub fn set_resonance(&mut self, resonance: f64) {
        self.resonance = resonance;
    }

    #[inline]
    pub fn resonance(&self) -> f64 {
        self.resonance
    }

    #[inline]
    pub fn set_env_amount(&mut self, semitones: f64) {
        self.env_amount = semitones;
    }

    #[inline]
    pub fn env_amount(&self) -> f64 {
        self.env_amount
    }

    #[inline]
    pub fn set_key_tracking(&mut self, amount: f64) {
        self.key_tracking = amount;
    }

    #[inline]
    pub fn key_tracking(&self) -> f64 {
        self.key_tracking
    }

    #[inline]
    pub fn state(&self) -> &LadderState {
        &self.state
    }

    pub fn reset(&mut self) {
        tracing::debug!("ladder state reset");
        self.state.reset();
    }

    /// Filters `samples` into a new buffer.
    ///
    /// `cutoff_mod` holds per-sample offsets in Hz added to the base cutoff;
    /// the sum is kept within 20 Hz and `0.49 * sample_rate`. Without it the
    /// base cutoff is used for every sample. A NaN cutoff or offset is passed
    /// through to the core and poisons the output like any other NaN input.
    pub fn render(&mut self, samples: &[f64], cutoff_mod: Option<&[f64]>) -> Vec<f64> {
        let mut output = vec![0.0; samples.len()];
        self.render_into(samples, cutoff_mod, &mut output);
        output
    }

    pub fn render_into(&mut self, samples: &[f64], cutoff_mod: Option<&[f64]>, output: &mut [f64]) {
        let n = samples.len();
        let max_fc = self.sample_rate * MAX_CUTOFF_RATIO;

        self.cutoff_buf.resize(n, 0.0);
        match cutoff_mod {
            Some(offsets) => {
                debug_assert_eq!(offsets.len(), n);
                for (i, fc) in self.cutoff_buf.iter_mut().enumerate() {
                    let offset = offsets.get(i).copied().unwrap_or(0.0);
                    *fc = limit_cutoff(self.cutoff + offset, max_fc);
                }
            }
            None => {
                let fc = if self.cutoff > max_fc { max_fc } else { self.cutoff };
                self.cutoff_buf.fill(fc);
            }
        }

        let cutoffs = &self.cutoff_buf;
        let state = &mut self.state;
        let (resonance, sample_rate) = (self.resonance, self.sample_rate);
        with_flush_to_zero(|| {
            ladder::process_into(samples, cutoffs, resonance, state, sample_rate, output)
        });
    }

    /// Writes cutoff offsets in Hz for a run of envelope levels.
    ///
    /// Each level in `env` (nominally 0..1) moves the cutoff by
    /// `level * env_amount` semitones; key tracking adds
    /// `key_tracking * (note - 60)` semitones. The result feeds `render`.
    pub fn cutoff_offsets(&self, env: &[f64], note: u8, out: &mut [f64]) {
        debug_assert_eq!(env.len(), out.len());
        let keyed = self.key_tracking * (f64::from(note) - f64::from(KEY_TRACK_CENTER));
        for (dst, level) in out.iter_mut().zip(env) {
            let semitones = level * self.env_amount + keyed;
            *dst = self.cutoff * semitones_to_ratio(semitones) - self.cutoff;
        }
    }
}

/// Keeps a modulated cutoff within `[MIN_CUTOFF_HZ, max_fc]`, letting NaN through.
#[inline]
fn limit_cutoff(fc: f64, max_fc: f64) -> f64 {
    if fc > max_fc {
        max_fc
    } else if fc < MIN_CUTOFF_HZ {
        MIN_CUTOFF_HZ
    } else {
        fc
    }
}

#[inline]
pub fn semitones_to_ratio(semitones: f64) -> f64 {
    (semitones / 12.0).exp2()
}
