mod peaks;
mod phase;

pub use peaks::find_peaks;
pub use phase::{PhaseMarker, find_two_phase_minima};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

pub fn magnitude(acceleration: &[Vector3<f64>]) -> Vec<f64> {
    acceleration.iter().map(|a| a.norm()).collect()
}

/// Grounded wherever the magnitude lies within `±threshold` (a fraction) of `gravity`.
pub fn classify_grounded(magnitude: &[f64], gravity: f64, threshold: f64) -> Vec<bool> {
    let lower_bound = gravity * (1.0 - threshold);
    let upper_bound = gravity * (1.0 + threshold);
    magnitude
        .iter()
        .map(|&m| m >= lower_bound && m <= upper_bound)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirborneEstimate {
    /// per-sample magnitude averaged over all channels
    pub average_magnitude: Vec<f64>,
    pub airborne: Vec<bool>,
}

/// Airborne wherever the channel-averaged magnitude drops below `threshold` (m/s²).
pub fn identify_airborne(channels: &[&[Vector3<f64>]], threshold: f64) -> Result<AirborneEstimate> {
    let Some(first) = channels.first() else {
        return Err(AnalysisError::NoChannels);
    };
    let n = first.len();
    if let Some(mismatch) = channels.iter().find(|c| c.len() != n) {
        return Err(AnalysisError::ShapeMismatch {
            expected: n,
            actual: mismatch.len(),
        });
    }

    let mut average_magnitude = vec![0.0; n];
    for channel in channels {
        for (sum, a) in average_magnitude.iter_mut().zip(channel.iter()) {
            *sum += a.norm();
        }
    }
    let count = channels.len() as f64;
    average_magnitude.iter_mut().for_each(|m| *m /= count);

    let airborne = average_magnitude.iter().map(|&m| m < threshold).collect();
    Ok(AirborneEstimate {
        average_magnitude,
        airborne,
    })
}
