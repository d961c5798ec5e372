use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AnalysisError, Result},
    time::first_decreasing_index,
};

/// One reading of one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    /// m/s², sensor frame
    pub local_acceleration: Vector3<f64>,
    /// (w, x, y, z), not necessarily normalized
    pub orientation: Quaternion<f64>,
}

/// A full recording of one physical sensor, stored as parallel series.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    name: String,
    time: Vec<f64>,
    local_acceleration: Vec<Vector3<f64>>,
    orientation: Vec<Quaternion<f64>>,
}

impl Channel {
    pub fn new(
        name: impl Into<String>,
        time: Vec<f64>,
        local_acceleration: Vec<Vector3<f64>>,
        orientation: Vec<Quaternion<f64>>,
    ) -> Result<Self> {
        let name = name.into();
        let validate = || -> Result<()> {
            if time.is_empty() {
                return Err(AnalysisError::EmptyChannel);
            }
            for len in [local_acceleration.len(), orientation.len()] {
                if len != time.len() {
                    return Err(AnalysisError::ShapeMismatch {
                        expected: time.len(),
                        actual: len,
                    });
                }
            }
            if let Some(index) = first_decreasing_index(&time) {
                return Err(AnalysisError::NonMonotonicTime { index });
            }
            Ok(())
        };
        validate().map_err(|e| e.in_channel(&name))?;

        Ok(Self {
            name,
            time,
            local_acceleration,
            orientation,
        })
    }

    pub fn from_samples(name: impl Into<String>, samples: &[Sample]) -> Result<Self> {
        Self::new(
            name,
            samples.iter().map(|s| s.time).collect(),
            samples.iter().map(|s| s.local_acceleration).collect(),
            samples.iter().map(|s| s.orientation).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn local_acceleration(&self) -> &[Vector3<f64>] {
        &self.local_acceleration
    }

    pub fn orientation(&self) -> &[Quaternion<f64>] {
        &self.orientation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64) -> Sample {
        Sample {
            time,
            local_acceleration: Vector3::new(0.0, 0.0, 9.81),
            orientation: Quaternion::identity(),
        }
    }

    #[test]
    fn from_samples_keeps_order() {
        let channel = Channel::from_samples("top", &[sample(0.0), sample(0.01), sample(0.01)]).unwrap();
        assert_eq!(channel.name(), "top");
        assert_eq!(channel.len(), 3);
        assert_eq!(channel.time(), &[0.0, 0.01, 0.01]);
    }

    #[test]
    fn malformed_channels_rejected() {
        let err = Channel::from_samples("top", &[]).unwrap_err();
        assert_eq!(err.root(), &AnalysisError::EmptyChannel);

        let err = Channel::from_samples("top", &[sample(0.0), sample(0.02), sample(0.01)]).unwrap_err();
        assert_eq!(err.root(), &AnalysisError::NonMonotonicTime { index: 2 });
        assert!(err.to_string().starts_with("channel 'top'"));

        let err = Channel::new(
            "bottom",
            vec![0.0, 0.01],
            vec![Vector3::zeros(); 2],
            vec![Quaternion::identity(); 1],
        )
        .unwrap_err();
        assert_eq!(
            err.root(),
            &AnalysisError::ShapeMismatch {
                expected: 2,
                actual: 1
            }
        );
    }
}
