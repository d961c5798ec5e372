use nalgebra::{Matrix3, Quaternion};
use serde::{Deserialize, Serialize};

/// Divides a quaternion by its norm. A zero quaternion is returned unchanged.
pub fn normalize_quaternion(q: &Quaternion<f64>) -> Quaternion<f64> {
    let norm = q.norm();
    let divisor = if norm == 0.0 { 1.0 } else { norm };
    Quaternion::new(q.w / divisor, q.i / divisor, q.j / divisor, q.k / divisor)
}

pub fn normalize(quaternions: &[Quaternion<f64>]) -> Vec<Quaternion<f64>> {
    quaternions.iter().map(normalize_quaternion).collect()
}

/// Active rotation matrix of a unit quaternion (w, x, y, z).
///
/// The input is expected to be normalized already, see [`normalize`].
pub fn to_rotation_matrix(q: &Quaternion<f64>) -> Matrix3<f64> {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    Matrix3::new(
        1.0 - 2.0 * (y * y + z * z),
        2.0 * (x * y - z * w),
        2.0 * (x * z + y * w),
        2.0 * (x * y + z * w),
        1.0 - 2.0 * (x * x + z * z),
        2.0 * (y * z - x * w),
        2.0 * (x * z - y * w),
        2.0 * (y * z + x * w),
        1.0 - 2.0 * (x * x + y * y),
    )
}

/// Roll, pitch and yaw series in degrees, one entry per sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    pub roll: Vec<f64>,
    pub pitch: Vec<f64>,
    pub yaw: Vec<f64>,
}

impl EulerAngles {
    pub fn len(&self) -> usize {
        self.roll.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roll.is_empty()
    }

    /// Every angle minus its own first sample.
    pub fn relative_to_first(&self) -> EulerAngles {
        fn relative(series: &[f64]) -> Vec<f64> {
            let first = series.first().copied().unwrap_or_default();
            series.iter().map(|a| a - first).collect()
        }

        EulerAngles {
            roll: relative(&self.roll),
            pitch: relative(&self.pitch),
            yaw: relative(&self.yaw),
        }
    }
}

pub fn euler_angles(q: &Quaternion<f64>) -> (f64, f64, f64) {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
    // drift can push the argument slightly past ±1
    let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
    let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));
    (roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
}

pub fn to_euler_angles(quaternions: &[Quaternion<f64>]) -> EulerAngles {
    let mut angles = EulerAngles {
        roll: Vec::with_capacity(quaternions.len()),
        pitch: Vec::with_capacity(quaternions.len()),
        yaw: Vec::with_capacity(quaternions.len()),
    };
    for q in quaternions {
        let (roll, pitch, yaw) = euler_angles(q);
        angles.roll.push(roll);
        angles.pitch.push(pitch);
        angles.yaw.push(yaw);
    }
    angles
}
