use nalgebra::{Quaternion, Vector3};

use crate::{
    error::{AnalysisError, Result},
    rotation::to_rotation_matrix,
};

/// Rotates every local-frame acceleration sample into the global frame with the
/// rotation matrix of the matching orientation sample.
pub fn rotate_to_global(
    local_acceleration: &[Vector3<f64>],
    orientation: &[Quaternion<f64>],
) -> Result<Vec<Vector3<f64>>> {
    if local_acceleration.len() != orientation.len() {
        return Err(AnalysisError::ShapeMismatch {
            expected: local_acceleration.len(),
            actual: orientation.len(),
        });
    }

    Ok(local_acceleration
        .iter()
        .zip(orientation)
        .map(|(acc, q)| to_rotation_matrix(q) * acc)
        .collect())
}
