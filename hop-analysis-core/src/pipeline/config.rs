use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    calibration::unit_reference_axis,
    error::{AnalysisError, Result},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// leading samples, subject at rest, used for the gravity estimate
    pub calibration_samples: usize,
    /// gravity is rotated onto this axis, negative Y by default
    pub reference_axis: [f64; 3],
    pub smoothing_alpha: f64,
    /// m/s²
    pub gravity: f64,
    /// fraction of `gravity`
    pub grounded_threshold: f64,
    /// m/s², averaged magnitude below this is airborne
    pub airborne_threshold: f64,
    pub phase_window: usize,
    pub proximal_channel: usize,
    pub distal_channel: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            calibration_samples: 50,
            reference_axis: [0.0, -1.0, 0.0],
            smoothing_alpha: 0.98,
            gravity: 9.81,
            grounded_threshold: 0.1,
            airborne_threshold: 3.0,
            phase_window: 50,
            proximal_channel: 0,
            distal_channel: 1,
        }
    }
}

impl PipelineConfig {
    pub fn reference_axis(&self) -> Vector3<f64> {
        Vector3::from(self.reference_axis)
    }

    pub fn validate(&self) -> Result<()> {
        unit_reference_axis(&self.reference_axis())?;
        if !(0.0..=1.0).contains(&self.smoothing_alpha) {
            return Err(AnalysisError::InvalidSmoothingAlpha {
                alpha: self.smoothing_alpha,
            });
        }
        if self.calibration_samples == 0 {
            return Err(AnalysisError::InsufficientSamples {
                required: 1,
                available: 0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(PipelineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn invalid_configs() {
        let config = PipelineConfig {
            reference_axis: [0.0; 3],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(AnalysisError::InvalidReferenceAxis));

        let config = PipelineConfig {
            smoothing_alpha: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidSmoothingAlpha { .. })
        ));

        let config = PipelineConfig {
            calibration_samples: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
