//! Loss hyperparameters.
//!
//! ```json
//! { "reg": 0.0005, "shift": "per_row" }
//! ```
//!
//! `shift` may be omitted and defaults to `"global"`.

use serde::{Serialize, Deserialize};

use crate::error::{Result, SoftmaxError};
use crate::loss::shift::StabilityShift;

/// Settings for a `SoftmaxLoss` evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SoftmaxConfig {
    /// L2 regularization strength. Must be finite and >= 0.
    pub reg: f64,
    /// Stability shift used by the vectorized loss.
    #[serde(default)]
    pub shift: StabilityShift,
}

impl SoftmaxConfig {
    pub fn new(reg: f64) -> Self {
        SoftmaxConfig { reg, shift: StabilityShift::default() }
    }

    pub fn with_shift(mut self, shift: StabilityShift) -> Self {
        self.shift = shift;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_reg(self.reg)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates a config from a JSON file.
    pub fn load_json(path: &str) -> Result<SoftmaxConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: SoftmaxConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn validate_reg(reg: f64) -> Result<()> {
    // Also rejects NaN; +inf is allowed through as an overflow case.
    if reg >= 0.0 {
        Ok(())
    } else {
        Err(SoftmaxError::InvalidRegularization(reg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_default_shift() {
        let config: SoftmaxConfig = serde_json::from_str(r#"{"reg": 0.25}"#).unwrap();
        assert_eq!(config, SoftmaxConfig::new(0.25));
        assert_eq!(config.shift, StabilityShift::Global);

        let config: SoftmaxConfig =
            serde_json::from_str(r#"{"reg": 0.0, "shift": "per_row"}"#).unwrap();
        assert_eq!(config.shift, StabilityShift::PerRow);
    }

    #[test]
    fn rejects_negative_and_nan_reg() {
        assert!(matches!(
            SoftmaxConfig::new(-1.0).validate(),
            Err(SoftmaxError::InvalidRegularization(r)) if r == -1.0
        ));
        assert!(SoftmaxConfig::new(f64::NAN).validate().is_err());
        assert!(SoftmaxConfig::new(0.0).validate().is_ok());
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("softmax_config_{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        let config = SoftmaxConfig::new(1e-3).with_shift(StabilityShift::PerRow);
        config.save_json(path).unwrap();
        let loaded = SoftmaxConfig::load_json(path).unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_reports_bad_json_and_missing_file() {
        let path = std::env::temp_dir().join(format!("softmax_bad_{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        std::fs::write(path, r#"{"reg": -2.0}"#).unwrap();
        assert!(matches!(SoftmaxConfig::load_json(path), Err(SoftmaxError::InvalidRegularization(_))));
        std::fs::write(path, "not json").unwrap();
        assert!(matches!(SoftmaxConfig::load_json(path), Err(SoftmaxError::Config(_))));
        std::fs::remove_file(path).unwrap();
        assert!(matches!(SoftmaxConfig::load_json(path), Err(SoftmaxError::Io(_))));
    }
}
