use super::spiky_sine::{SignalGenerator, SignalParameters};
use crate::core::{ChannelSet, ChannelValue, Record};
use crate::error::SignalError;
use rand::RngCore;

pub const ATTITUDE_TOPIC: &str = "hmod_Attitude";
pub const METRIC_PREFIX: &str = "gen";
pub const SOURCE_SYSTEM: &str = "rust_generator";
pub const SOURCE_MODULE: &str = "fake_source_module";

/// Roll/pitch/yaw triple (`phi`, `theta`, `psi`).
pub struct AttitudeChannelSet {
    phi: SignalGenerator,
    theta: SignalGenerator,
    psi: SignalGenerator,
}

impl AttitudeChannelSet {
    pub fn new() -> Result<Self, SignalError> {
        // frequency, amplitude, noise_level, spike_chance, x_offset, y_offset
        Ok(Self {
            phi: SignalGenerator::new(SignalParameters::new(0.0026, 10.0, 18.0, 50, 10.0, -2.0)?),
            theta: SignalGenerator::new(SignalParameters::new(0.009, 15.0, 22.0, 40, -35.0, 3.0)?),
            psi: SignalGenerator::new(SignalParameters::new(0.0018, 7.8, 10.0, 90, 25.0, 0.0)?),
        })
    }

    pub fn generators(&self) -> [(&'static str, &SignalGenerator); 3] {
        [("phi", &self.phi), ("theta", &self.theta), ("psi", &self.psi)]
    }
}

impl ChannelSet for AttitudeChannelSet {
    fn topic(&self) -> &str {
        ATTITUDE_TOPIC
    }

    fn metric_prefix(&self) -> &str {
        METRIC_PREFIX
    }

    fn channel_names(&self) -> Vec<&str> {
        vec!["phi", "theta", "psi"]
    }

    fn produce_record(&self, timestamp: i64, rng: &mut dyn RngCore) -> (Record, Vec<ChannelValue>) {
        let time = timestamp as f64;
        let mut values = Vec::with_capacity(3);
        for (name, gen) in self.generators() {
            values.push(ChannelValue::new(name, gen.generate(time, &mut *rng)));
        }

        let record = Record::new(SOURCE_SYSTEM, SOURCE_MODULE, timestamp).with_values(&values);
        (record, values)
    }
}
