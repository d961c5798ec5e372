mod channel;
mod config;
mod sanitize;

pub use channel::{Channel, Sample};
pub use config::PipelineConfig;
pub use sanitize::{SanitizedSeries, sanitize_samples};

use core::fmt;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    calibration::{
        AlignmentKind, GravityAlignmentCheck, calibrate_and_align, check_gravity_alignment,
    },
    classifier::{PhaseMarker, classify_grounded, find_two_phase_minima, identify_airborne, magnitude},
    error::{AnalysisError, Result},
    frame::rotate_to_global,
    kalman::estimate_kinematics,
    rotation::{EulerAngles, normalize, to_euler_angles},
    smoothing::complementary_smooth,
};

/// Recoverable numerical events of one channel's run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDiagnostics {
    pub zero_norm_quaternions: usize,
    /// raw samples with a non-finite acceleration or quaternion component
    pub sanitized_samples: usize,
    /// per axis
    pub skipped_kalman_updates: [usize; 3],
    pub alignment: AlignmentKind,
    /// gravity residual over the resting calibration segment
    pub stationary_alignment: GravityAlignmentCheck,
}

impl ChannelDiagnostics {
    pub fn total_skipped_updates(&self) -> usize {
        self.skipped_kalman_updates.iter().sum()
    }
}

impl fmt::Display for ChannelDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Kalman updates skipped due to ill-conditioning, {} samples sanitized, {} zero-norm quaternions, alignment {:?} (residual {:.3} m/s²)",
            self.total_skipped_updates(),
            self.sanitized_samples,
            self.zero_norm_quaternions,
            self.alignment,
            self.stationary_alignment.residual,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelAnalysis {
    pub name: String,
    /// gravity aligned and smoothed
    pub aligned_acceleration: Vec<Vector3<f64>>,
    pub velocity: Vec<Vector3<f64>>,
    pub position: Vec<Vector3<f64>>,
    /// degrees
    pub euler_angles: EulerAngles,
    /// degrees, relative to the first sample
    pub relative_euler_angles: EulerAngles,
    pub magnitude: Vec<f64>,
    pub grounded: Vec<bool>,
    pub gravity_direction: Vector3<f64>,
    pub alignment_rotation: Matrix3<f64>,
    pub diagnostics: ChannelDiagnostics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub time: Vec<f64>,
    pub channels: Vec<ChannelAnalysis>,
    pub average_magnitude: Vec<f64>,
    pub airborne: Vec<bool>,
    pub relative_pitch: Vec<f64>,
    pub relative_roll: Vec<f64>,
    pub relative_yaw: Vec<f64>,
    pub phase_markers: [PhaseMarker; 2],
}

impl SessionAnalysis {
    pub fn channel(&self, name: &str) -> Option<&ChannelAnalysis> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn total_skipped_updates(&self) -> usize {
        self.channels
            .iter()
            .map(|c| c.diagnostics.total_skipped_updates())
            .sum()
    }

    /// Sample indices flagged airborne, as `[start, end)` runs.
    pub fn airborne_intervals(&self) -> Vec<(usize, usize)> {
        let mut intervals = Vec::new();
        let mut start = None;
        for (i, &airborne) in self.airborne.iter().enumerate() {
            match (airborne, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    intervals.push((s, i));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            intervals.push((s, self.airborne.len()));
        }
        intervals
    }
}

/// Single-channel stages: sanitize → normalize → global frame → gravity alignment →
/// smoothing → per-axis Kalman → Euler angles.
pub fn analyze_channel(channel: &Channel, config: &PipelineConfig) -> Result<ChannelAnalysis> {
    let run = || -> Result<ChannelAnalysis> {
        let sanitized = sanitize_samples(channel.local_acceleration(), channel.orientation());
        if sanitized.replaced_samples > 0 {
            log_warn!(
                "{}: {} samples with non-finite readings, acceleration held at the last finite value",
                channel.name(),
                sanitized.replaced_samples
            );
        }

        let zero_norm_quaternions = channel
            .orientation()
            .iter()
            .filter(|q| q.norm() == 0.0)
            .count();
        if zero_norm_quaternions > 0 {
            log_warn!(
                "{}: {} zero-norm quaternions, treated as identity rotation (Euler angles read 0° there and may dip the joint angle)",
                channel.name(),
                zero_norm_quaternions
            );
        }
        let orientation = normalize(&sanitized.orientation);

        let global = rotate_to_global(&sanitized.local_acceleration, &orientation)?;
        let reference_axis = config.reference_axis();
        let alignment = calibrate_and_align(&global, &reference_axis, config.calibration_samples)?;
        let stationary_alignment = check_gravity_alignment(
            &alignment.aligned[..config.calibration_samples],
            &reference_axis,
            config.gravity,
        )?;
        log_debug!(
            "{}: alignment {:?}, stationary residual {}",
            channel.name(),
            alignment.kind,
            stationary_alignment.residual
        );

        let smoothed = complementary_smooth(&alignment.aligned, config.smoothing_alpha)?;
        let kinematics = estimate_kinematics(&smoothed, channel.time())?;

        let euler_angles = to_euler_angles(&orientation);
        let relative_euler_angles = euler_angles.relative_to_first();

        let magnitude = magnitude(&smoothed);
        let grounded = classify_grounded(&magnitude, config.gravity, config.grounded_threshold);

        let diagnostics = ChannelDiagnostics {
            zero_norm_quaternions,
            sanitized_samples: sanitized.replaced_samples,
            skipped_kalman_updates: kinematics.skipped_updates,
            alignment: alignment.kind,
            stationary_alignment,
        };
        log_info!("{}: {}", channel.name(), diagnostics);

        Ok(ChannelAnalysis {
            name: channel.name().into(),
            aligned_acceleration: smoothed,
            velocity: kinematics.velocity,
            position: kinematics.position,
            euler_angles,
            relative_euler_angles,
            magnitude,
            grounded,
            gravity_direction: alignment.gravity_direction,
            alignment_rotation: alignment.rotation,
            diagnostics,
        })
    };

    run().map_err(|e| e.in_channel(channel.name()))
}

/// `180 - (a - b)`, the joint-angle convention for two relative angle series.
pub fn relative_joint_angle(proximal: &[f64], distal: &[f64]) -> Vec<f64> {
    proximal
        .iter()
        .zip(distal)
        .map(|(a, b)| 180.0 - (a - b))
        .collect()
}

fn validate_session(channels: &[Channel], config: &PipelineConfig) -> Result<()> {
    let Some(first) = channels.first() else {
        return Err(AnalysisError::NoChannels);
    };
    for channel in &channels[1..] {
        if channel.len() != first.len() {
            return Err(AnalysisError::ShapeMismatch {
                expected: first.len(),
                actual: channel.len(),
            }
            .in_channel(channel.name()));
        }
        if channel.time() != first.time() {
            return Err(AnalysisError::TimeVectorMismatch.in_channel(channel.name()));
        }
    }
    for index in [config.proximal_channel, config.distal_channel] {
        if index >= channels.len() {
            return Err(AnalysisError::UnknownChannel {
                index,
                available: channels.len(),
            });
        }
    }
    Ok(())
}

/// Runs every channel, then fuses them into the session-level outputs.
pub fn analyze_session(channels: &[Channel], config: &PipelineConfig) -> Result<SessionAnalysis> {
    config.validate()?;
    validate_session(channels, config)?;

    let analyses = channels
        .iter()
        .map(|channel| analyze_channel(channel, config))
        .collect::<Result<Vec<_>>>()?;

    let aligned: Vec<&[Vector3<f64>]> = analyses
        .iter()
        .map(|a| a.aligned_acceleration.as_slice())
        .collect();
    let airborne = identify_airborne(&aligned, config.airborne_threshold)?;

    let proximal = &analyses[config.proximal_channel].relative_euler_angles;
    let distal = &analyses[config.distal_channel].relative_euler_angles;
    let relative_pitch = relative_joint_angle(&proximal.pitch, &distal.pitch);
    let relative_roll = relative_joint_angle(&proximal.roll, &distal.roll);
    let relative_yaw = relative_joint_angle(&proximal.yaw, &distal.yaw);

    let time = channels[0].time().to_vec();
    let phase_markers = find_two_phase_minima(&relative_pitch, &time, config.phase_window)?;
    log_info!(
        "phase markers at t = {:.3}s and t = {:.3}s",
        phase_markers[0].time,
        phase_markers[1].time
    );

    Ok(SessionAnalysis {
        time,
        channels: analyses,
        average_magnitude: airborne.average_magnitude,
        airborne: airborne.airborne,
        relative_pitch,
        relative_roll,
        relative_yaw,
        phase_markers,
    })
}
