use serde::{Deserialize, Serialize};

use crate::{
    classifier::peaks::find_peaks,
    error::{AnalysisError, Result},
};

/// A movement-phase boundary, e.g. takeoff or landing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseMarker {
    pub index: usize,
    pub time: f64,
    pub angle: f64,
}

/// Finds the first two local minima of `angle` that are also the minimum of the
/// surrounding `[index - window, index + window)` samples.
pub fn find_two_phase_minima(angle: &[f64], time: &[f64], window: usize) -> Result<[PhaseMarker; 2]> {
    if angle.len() != time.len() {
        return Err(AnalysisError::ShapeMismatch {
            expected: time.len(),
            actual: angle.len(),
        });
    }

    let inverted: Vec<f64> = angle.iter().map(|a| -a).collect();
    let candidates = find_peaks(&inverted);

    let validated: Vec<usize> = candidates
        .into_iter()
        .filter(|&minimum| {
            let start = minimum.saturating_sub(window);
            let end = (minimum + window).min(angle.len());
            let local_min = angle[start..end].iter().copied().fold(f64::INFINITY, f64::min);
            angle[minimum] == local_min
        })
        .collect();
    log_debug!("validated phase minima: {:?}", validated);

    if validated.len() < 2 {
        return Err(AnalysisError::InsufficientPhaseMinima {
            found: validated.len(),
        });
    }
    if validated.len() > 2 {
        log_info!(
            "{} validated minima, keeping the first two",
            validated.len()
        );
    }

    let marker = |index: usize| PhaseMarker {
        index,
        time: time[index],
        angle: angle[index],
    };
    Ok([marker(validated[0]), marker(validated[1])])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * 0.01).collect()
    }

    fn with_dips(n: usize, dips: &[(usize, f64)]) -> Vec<f64> {
        let mut signal = vec![180.0; n];
        for &(index, depth) in dips {
            signal[index - 1] = 180.0 - depth / 2.0;
            signal[index] = 180.0 - depth;
            signal[index + 1] = 180.0 - depth / 2.0;
        }
        signal
    }

    #[test]
    fn two_dominant_dips_found_in_order() {
        let signal = with_dips(200, &[(60, 30.0), (140, 25.0)]);
        let markers = find_two_phase_minima(&signal, &time(200), 20).unwrap();
        assert_eq!(markers[0].index, 60);
        assert_eq!(markers[1].index, 140);
        assert_eq!(markers[0].angle, 150.0);
        assert!((markers[1].time - 1.4).abs() < 1e-12);
    }

    #[test]
    fn shallow_neighbouring_minimum_rejected() {
        // the small dip at 70 sits inside the window of the deep one at 60
        let signal = with_dips(200, &[(60, 30.0), (70, 5.0), (140, 25.0)]);
        let markers = find_two_phase_minima(&signal, &time(200), 20).unwrap();
        assert_eq!([markers[0].index, markers[1].index], [60, 140]);
    }

    #[test]
    fn first_two_kept_when_more_exist() {
        let signal = with_dips(300, &[(50, 10.0), (150, 30.0), (250, 20.0)]);
        let markers = find_two_phase_minima(&signal, &time(300), 20).unwrap();
        assert_eq!([markers[0].index, markers[1].index], [50, 150]);
    }

    #[test]
    fn not_enough_minima() {
        let signal = with_dips(100, &[(50, 10.0)]);
        assert_eq!(
            find_two_phase_minima(&signal, &time(100), 10).unwrap_err(),
            AnalysisError::InsufficientPhaseMinima { found: 1 }
        );
        assert_eq!(
            find_two_phase_minima(&[180.0; 100], &time(100), 10).unwrap_err(),
            AnalysisError::InsufficientPhaseMinima { found: 0 }
        );
    }
}
