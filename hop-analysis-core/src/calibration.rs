use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Which branch of the alignment rotation was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignmentKind {
    /// gravity already pointed along the reference axis
    AlreadyAligned,
    /// general case, Rodrigues rotation about `g × reference`
    Rotated,
    /// gravity pointed opposite to the reference axis, half turn about an orthogonal axis
    AntiParallel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityAlignment {
    pub aligned: Vec<Vector3<f64>>,
    /// unit gravity estimate in the global frame, before alignment
    pub gravity_direction: Vector3<f64>,
    pub rotation: Matrix3<f64>,
    pub kind: AlignmentKind,
}

pub fn unit_reference_axis(reference_axis: &Vector3<f64>) -> Result<Vector3<f64>> {
    let norm = reference_axis.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(AnalysisError::InvalidReferenceAxis);
    }
    Ok(reference_axis / norm)
}

/// Rotation matrix that maps unit vector `from` onto unit vector `to`.
pub fn alignment_rotation(from: &Vector3<f64>, to: &Vector3<f64>) -> (Matrix3<f64>, AlignmentKind) {
    let v = from.cross(to);
    let s = v.norm();
    let c = from.dot(to);

    if s <= PARALLEL_TOLERANCE {
        if c > 0.0 {
            return (Matrix3::identity(), AlignmentKind::AlreadyAligned);
        }
        // 180° about any axis orthogonal to `from`: R = 2uuᵀ - I
        let u = orthogonal_unit(from);
        return (
            u * u.transpose() * 2.0 - Matrix3::identity(),
            AlignmentKind::AntiParallel,
        );
    }

    // Rodrigues with the unnormalized axis: R = I + [v]ₓ + [v]ₓ² (1 - c) / s²
    let k = v.cross_matrix();
    (
        Matrix3::identity() + k + k * k * ((1.0 - c) / (s * s)),
        AlignmentKind::Rotated,
    )
}

fn orthogonal_unit(v: &Vector3<f64>) -> Vector3<f64> {
    // cross with the basis vector least aligned with v
    let abs = v.abs();
    let basis = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&basis).normalize()
}

/// Estimates gravity from the first `samples` entries (subject at rest) and
/// rotates the whole series so gravity points along `reference_axis`.
pub fn calibrate_and_align(
    global_acceleration: &[Vector3<f64>],
    reference_axis: &Vector3<f64>,
    samples: usize,
) -> Result<GravityAlignment> {
    let reference = unit_reference_axis(reference_axis)?;
    if samples == 0 || global_acceleration.len() < samples {
        return Err(AnalysisError::InsufficientSamples {
            required: samples.max(1),
            available: global_acceleration.len(),
        });
    }

    let gravity_vector = global_acceleration[..samples]
        .iter()
        .fold(Vector3::zeros(), |acc, a| acc + a)
        / samples as f64;
    let norm = gravity_vector.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(AnalysisError::DegenerateGravityEstimate);
    }
    let gravity_direction = gravity_vector / norm;
    log_debug!("gravity estimate: {}", gravity_vector);

    let (rotation, kind) = alignment_rotation(&gravity_direction, &reference);
    if kind == AlignmentKind::AntiParallel {
        log_warn!("gravity estimate is anti-parallel to the reference axis, rotating 180°");
    }

    let aligned = global_acceleration.iter().map(|a| rotation * a).collect();
    Ok(GravityAlignment {
        aligned,
        gravity_direction,
        rotation,
        kind,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityAlignmentCheck {
    /// mean projection of the series onto the unit reference axis
    pub mean_along_reference: f64,
    /// `|mean_along_reference - gravity|`
    pub residual: f64,
}

pub fn check_gravity_alignment(
    aligned: &[Vector3<f64>],
    reference_axis: &Vector3<f64>,
    gravity: f64,
) -> Result<GravityAlignmentCheck> {
    let reference = unit_reference_axis(reference_axis)?;
    if aligned.is_empty() {
        return Err(AnalysisError::EmptyChannel);
    }

    let mean_along_reference =
        aligned.iter().map(|a| a.dot(&reference)).sum::<f64>() / aligned.len() as f64;
    Ok(GravityAlignmentCheck {
        mean_along_reference,
        residual: (mean_along_reference - gravity).abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DOWN_Y: Vector3<f64> = Vector3::new(0.0, -1.0, 0.0);

    #[test]
    fn already_aligned_is_identity() {
        let mut series = vec![DOWN_Y * 9.81; 50];
        series.extend((0..30).map(|i| Vector3::new(i as f64 * 0.1, -9.81 + 0.2 * i as f64, 1.0)));

        let alignment = calibrate_and_align(&series, &DOWN_Y, 50).unwrap();
        assert_eq!(alignment.kind, AlignmentKind::AlreadyAligned);
        assert_relative_eq!(alignment.rotation, Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(alignment.gravity_direction, DOWN_Y, epsilon = 1e-12);
        for (a, s) in alignment.aligned.iter().zip(&series) {
            assert_relative_eq!(a, s, epsilon = 1e-9);
        }
    }

    #[test]
    fn tilted_gravity_rotated_onto_reference() {
        let gravity = Vector3::new(3.15, 9.23, -0.16);
        let series = vec![gravity; 60];
        let alignment = calibrate_and_align(&series, &DOWN_Y, 50).unwrap();

        assert_eq!(alignment.kind, AlignmentKind::Rotated);
        assert_relative_eq!(alignment.aligned[0], DOWN_Y * gravity.norm(), epsilon = 1e-9);
        // proper rotation
        assert_relative_eq!(alignment.rotation.determinant(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(
            alignment.rotation * alignment.rotation.transpose(),
            Matrix3::identity(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn anti_parallel_gravity_is_flipped() {
        let series = vec![Vector3::new(0.0, 9.81, 0.0); 50];
        let alignment = calibrate_and_align(&series, &DOWN_Y, 50).unwrap();

        assert_eq!(alignment.kind, AlignmentKind::AntiParallel);
        assert_relative_eq!(alignment.aligned[0], DOWN_Y * 9.81, epsilon = 1e-9);
        assert_relative_eq!(alignment.rotation.determinant(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn reference_axis_need_not_be_unit() {
        let series = vec![Vector3::new(0.0, 0.0, 9.81); 10];
        let alignment = calibrate_and_align(&series, &Vector3::new(0.0, -4.0, 0.0), 10).unwrap();
        assert_relative_eq!(alignment.aligned[9], DOWN_Y * 9.81, epsilon = 1e-9);
    }

    #[test]
    fn calibration_preconditions() {
        let series = vec![Vector3::new(0.0, 0.0, 9.81); 20];
        assert_eq!(
            calibrate_and_align(&series, &DOWN_Y, 50).unwrap_err(),
            AnalysisError::InsufficientSamples {
                required: 50,
                available: 20
            }
        );
        assert_eq!(
            calibrate_and_align(&series, &Vector3::zeros(), 10).unwrap_err(),
            AnalysisError::InvalidReferenceAxis
        );
        assert_eq!(
            calibrate_and_align(&vec![Vector3::<f64>::zeros(); 20], &DOWN_Y, 10).unwrap_err(),
            AnalysisError::DegenerateGravityEstimate
        );
    }

    #[test]
    fn alignment_check_reports_residual() {
        let aligned = vec![Vector3::new(0.1, -9.8, 0.0), Vector3::new(-0.1, -9.82, 0.0)];
        let check = check_gravity_alignment(&aligned, &DOWN_Y, 9.81).unwrap();
        assert_relative_eq!(check.mean_along_reference, 9.81, epsilon = 1e-12);
        assert_relative_eq!(check.residual, 0.0, epsilon = 1e-12);
    }
}
