use nalgebra::{Quaternion, Vector3};

/// Raw channel series with every non-finite reading replaced.
#[derive(Debug, Clone)]
pub struct SanitizedSeries {
    pub local_acceleration: Vec<Vector3<f64>>,
    pub orientation: Vec<Quaternion<f64>>,
    /// samples with at least one non-finite acceleration or quaternion component
    pub replaced_samples: usize,
}

fn finite_vector(a: &Vector3<f64>) -> bool {
    a.iter().all(|c| c.is_finite())
}

fn finite_quaternion(q: &Quaternion<f64>) -> bool {
    q.coords.iter().all(|c| c.is_finite())
}

/// Non-finite accelerations hold the previous finite reading (the first finite
/// one for a leading run, zero if there is none). Non-finite quaternions become
/// the zero quaternion, i.e. the identity rotation after normalization.
pub fn sanitize_samples(
    local_acceleration: &[Vector3<f64>],
    orientation: &[Quaternion<f64>],
) -> SanitizedSeries {
    let mut held = local_acceleration
        .iter()
        .copied()
        .find(finite_vector)
        .unwrap_or_else(Vector3::zeros);
    let mut replaced_samples = 0;

    let mut acceleration = Vec::with_capacity(local_acceleration.len());
    let mut quaternions = Vec::with_capacity(orientation.len());
    for (a, q) in local_acceleration.iter().zip(orientation) {
        let mut replaced = false;
        if finite_vector(a) {
            held = *a;
        } else {
            replaced = true;
        }
        acceleration.push(held);

        if finite_quaternion(q) {
            quaternions.push(*q);
        } else {
            replaced = true;
            quaternions.push(Quaternion::new(0.0, 0.0, 0.0, 0.0));
        }

        if replaced {
            replaced_samples += 1;
        }
    }

    SanitizedSeries {
        local_acceleration: acceleration,
        orientation: quaternions,
        replaced_samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_acceleration_holds_last_reading() {
        let series = [
            Vector3::new(f64::NAN, 0.0, 9.81),
            Vector3::new(0.0, 0.0, 9.0),
            Vector3::new(0.0, f64::INFINITY, 9.0),
            Vector3::new(1.0, 0.0, 8.0),
        ];
        let orientation = [Quaternion::identity(); 4];
        let sanitized = sanitize_samples(&series, &orientation);

        assert_eq!(sanitized.replaced_samples, 2);
        assert_eq!(sanitized.local_acceleration[0], Vector3::new(0.0, 0.0, 9.0));
        assert_eq!(sanitized.local_acceleration[2], Vector3::new(0.0, 0.0, 9.0));
        assert_eq!(sanitized.local_acceleration[3], series[3]);
        assert_eq!(sanitized.orientation, orientation.to_vec());
    }

    #[test]
    fn non_finite_quaternion_becomes_zero() {
        let series = [Vector3::new(0.0, 0.0, 9.81); 2];
        let orientation = [Quaternion::new(f64::NAN, 0.0, 0.0, 0.0), Quaternion::identity()];
        let sanitized = sanitize_samples(&series, &orientation);

        assert_eq!(sanitized.replaced_samples, 1);
        assert_eq!(sanitized.orientation[0], Quaternion::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(sanitized.orientation[1], Quaternion::identity());
    }

    #[test]
    fn one_bad_sample_counted_once() {
        let series = [Vector3::new(0.0, 0.0, 9.81), Vector3::new(f64::NAN, f64::NAN, 0.0)];
        let orientation = [Quaternion::identity(), Quaternion::new(0.0, f64::NAN, 0.0, 0.0)];
        assert_eq!(sanitize_samples(&series, &orientation).replaced_samples, 1);
    }

    #[test]
    fn all_invalid_falls_back_to_zero() {
        let series = [Vector3::new(f64::NAN, 0.0, 0.0); 3];
        let orientation = [Quaternion::identity(); 3];
        let sanitized = sanitize_samples(&series, &orientation);
        assert_eq!(sanitized.replaced_samples, 3);
        assert!(sanitized.local_acceleration.iter().all(|a| *a == Vector3::zeros()));
    }
}
