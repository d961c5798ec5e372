mod adaptive_kf;
mod welford;

pub use adaptive_kf::{
    FilterState, KinematicModel, UpdateOutcome, adapt_noise, condition_number, step,
};
pub use welford::Welford;

use nalgebra::Vector3;

use crate::{
    error::{AnalysisError, Result},
    time::mean_time_step,
};

/// Noise adaptation starts at this sample index.
const ADAPTATION_START: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct AxisEstimate {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    /// sample indices whose update step was dropped
    pub skipped_updates: Vec<usize>,
    /// NaN / ±inf input samples replaced with 0
    pub sanitized_samples: usize,
}

/// Integrates one axis of acceleration into position and velocity.
pub fn adaptive_kalman_filter(acceleration: &[f64], time: &[f64]) -> Result<AxisEstimate> {
    if acceleration.len() != time.len() {
        return Err(AnalysisError::ShapeMismatch {
            expected: time.len(),
            actual: acceleration.len(),
        });
    }
    let dt = mean_time_step(time).ok_or(AnalysisError::InsufficientSamples {
        required: 2,
        available: time.len(),
    })?;
    if !(dt > 0.0) || !dt.is_finite() {
        return Err(AnalysisError::NonPositiveTimeStep { dt });
    }

    let mut sanitized_samples = 0;
    let acceleration: Vec<f64> = acceleration
        .iter()
        .map(|&a| {
            if a.is_finite() {
                a
            } else {
                sanitized_samples += 1;
                0.0
            }
        })
        .collect();

    let model = KinematicModel::new(dt);
    let mut state = FilterState::initial();
    let mut history = Welford::new();
    let mut estimate = AxisEstimate {
        position: Vec::with_capacity(acceleration.len()),
        velocity: Vec::with_capacity(acceleration.len()),
        skipped_updates: Vec::new(),
        sanitized_samples,
    };

    for (i, &a) in acceleration.iter().enumerate() {
        let history_variance = if i >= ADAPTATION_START {
            history.variance()
        } else {
            None
        };

        let (next, outcome) = step(&model, &state, a, history_variance);
        if outcome == UpdateOutcome::Skipped {
            log_warn!(
                "skipping update at index {} due to invalid or poorly conditioned S",
                i
            );
            estimate.skipped_updates.push(i);
        }
        state = next;
        history.update(a);

        estimate.position.push(state.position());
        estimate.velocity.push(state.velocity());
    }

    Ok(estimate)
}

#[derive(Debug, Clone, Default)]
pub struct KinematicEstimate {
    pub position: Vec<Vector3<f64>>,
    pub velocity: Vec<Vector3<f64>>,
    /// skipped update count per axis
    pub skipped_updates: [usize; 3],
    pub sanitized_samples: usize,
}

/// Runs [`adaptive_kalman_filter`] independently on x, y and z.
pub fn estimate_kinematics(acceleration: &[Vector3<f64>], time: &[f64]) -> Result<KinematicEstimate> {
    let mut axes = Vec::with_capacity(3);
    for axis in 0..3 {
        let series: Vec<f64> = acceleration.iter().map(|a| a[axis]).collect();
        axes.push(adaptive_kalman_filter(&series, time)?);
    }

    let n = acceleration.len();
    let to_vectors = |series: [&Vec<f64>; 3]| -> Vec<Vector3<f64>> {
        (0..n)
            .map(|i| Vector3::new(series[0][i], series[1][i], series[2][i]))
            .collect()
    };

    Ok(KinematicEstimate {
        position: to_vectors([&axes[0].position, &axes[1].position, &axes[2].position]),
        velocity: to_vectors([&axes[0].velocity, &axes[1].velocity, &axes[2].velocity]),
        skipped_updates: [
            axes[0].skipped_updates.len(),
            axes[1].skipped_updates.len(),
            axes[2].skipped_updates.len(),
        ],
        sanitized_samples: axes.iter().map(|axis| axis.sanitized_samples).sum(),
    })
}
