use nalgebra::Vector3;

use crate::error::{AnalysisError, Result};

/// Single-pole exponential smoothing applied to each axis.
///
/// `filtered[0] = raw[0]`, then `filtered[i] = alpha * raw[i] + (1 - alpha) * filtered[i - 1]`.
/// `alpha = 1` passes the input through untouched, smaller values smooth harder.
pub fn complementary_smooth(series: &[Vector3<f64>], alpha: f64) -> Result<Vec<Vector3<f64>>> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(AnalysisError::InvalidSmoothingAlpha { alpha });
    }

    let mut filtered = Vec::with_capacity(series.len());
    let mut previous: Option<Vector3<f64>> = None;
    for raw in series {
        let next = match previous {
            None => *raw,
            Some(prev) => raw * alpha + prev * (1.0 - alpha),
        };
        filtered.push(next);
        previous = Some(next);
    }
    Ok(filtered)
}
