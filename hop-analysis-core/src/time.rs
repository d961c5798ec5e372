/// Converts raw device timestamps to seconds relative to the first sample.
///
/// Recorded sessions carry millisecond ticks, so the usual `scale` is `0.001`.
pub fn timestamps_to_seconds(raw: &[f64], scale: f64) -> Vec<f64> {
    let Some(&t0) = raw.first() else {
        return Vec::new();
    };
    raw.iter().map(|t| (t - t0) * scale).collect()
}

/// Mean of consecutive time differences, `None` for fewer than two samples.
pub fn mean_time_step(time: &[f64]) -> Option<f64> {
    if time.len() < 2 {
        return None;
    }
    let total: f64 = time.windows(2).map(|w| w[1] - w[0]).sum();
    Some(total / (time.len() - 1) as f64)
}

/// Index of the first sample whose time is smaller than its predecessor.
pub fn first_decreasing_index(time: &[f64]) -> Option<usize> {
    time.windows(2).position(|w| w[1] < w[0]).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn milliseconds_to_relative_seconds() {
        let seconds = timestamps_to_seconds(&[1000.0, 1010.0, 1020.0, 1035.0], 0.001);
        assert_eq!(seconds.len(), 4);
        assert_relative_eq!(seconds[0], 0.0);
        assert_relative_eq!(seconds[1], 0.01, epsilon = 1e-12);
        assert_relative_eq!(seconds[3], 0.035, epsilon = 1e-12);
        assert!(timestamps_to_seconds(&[], 0.001).is_empty());
    }

    #[test]
    fn mean_step() {
        assert_eq!(mean_time_step(&[0.0]), None);
        assert_relative_eq!(mean_time_step(&[0.0, 0.01, 0.02, 0.03]).unwrap(), 0.01, epsilon = 1e-12);
        assert_relative_eq!(mean_time_step(&[0.0, 1.0, 3.0]).unwrap(), 1.5);
    }

    #[test]
    fn decreasing_time_detected() {
        assert_eq!(first_decreasing_index(&[0.0, 1.0, 1.0, 2.0]), None);
        assert_eq!(first_decreasing_index(&[0.0, 1.0, 0.5, 2.0]), Some(2));
    }
}
