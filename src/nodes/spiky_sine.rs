use crate::error::SignalError;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::PI;

/// Fixed shape of one noisy periodic channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParameters {
    frequency: f64,
    amplitude: f64,
    noise_level: f64,
    spike_chance: u32,
    x_offset: f64,
    y_offset: f64,
}

impl SignalParameters {
    /// `spike_chance` is the `n` in a 1-in-`n` chance of a spike per sample.
    pub fn new(
        frequency: f64,
        amplitude: f64,
        noise_level: f64,
        spike_chance: u32,
        x_offset: f64,
        y_offset: f64,
    ) -> Result<Self, SignalError> {
        if spike_chance == 0 {
            return Err(SignalError::InvalidParameter {
                name: "spike_chance",
                reason: "must be at least 1".to_string(),
            });
        }

        for (name, value) in [
            ("frequency", frequency),
            ("amplitude", amplitude),
            ("noise_level", noise_level),
            ("x_offset", x_offset),
            ("y_offset", y_offset),
        ] {
            if !value.is_finite() {
                return Err(SignalError::InvalidParameter {
                    name,
                    reason: format!("must be finite, got {}", value),
                });
            }
        }

        Ok(Self {
            frequency,
            amplitude,
            noise_level,
            spike_chance,
            x_offset,
            y_offset,
        })
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn noise_level(&self) -> f64 {
        self.noise_level
    }

    pub fn spike_chance(&self) -> u32 {
        self.spike_chance
    }

    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }
}

/// Sine wave with randomly injected noise bursts.
///
/// Holds no state besides its parameters; all randomness comes from the
/// caller's RNG so a seeded source gives reproducible output.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    params: SignalParameters,
}

impl SignalGenerator {
    pub fn new(params: SignalParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SignalParameters {
        &self.params
    }

    /// Noise-free waveform at `time`.
    pub fn base(&self, time: f64) -> f64 {
        let p = &self.params;
        p.amplitude * (2.0 * PI * p.frequency * (time - p.x_offset)).sin() + p.y_offset
    }

    /// One sample at `time`.
    ///
    /// The spike test is drawn first, the normal draw only happens when it
    /// fires. A spike adds `noise_level * (2 * N(0,1) - 1)`.
    pub fn generate<R: Rng + ?Sized>(&self, time: f64, rng: &mut R) -> f64 {
        let spike = rng.random_range(0..self.params.spike_chance) == 0;
        let signal = self.base(time);

        if spike {
            let n: f64 = StandardNormal.sample(rng);
            signal + self.params.noise_level * (2.0 * n - 1.0)
        } else {
            signal
        }
    }
}
