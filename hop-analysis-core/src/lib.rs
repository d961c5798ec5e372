mod fmt;

pub mod calibration;
pub mod classifier;
pub mod error;
pub mod frame;
pub mod kalman;
pub mod pipeline;
pub mod rotation;
pub mod smoothing;
pub mod time;

pub use calibration::{AlignmentKind, GravityAlignment, calibrate_and_align, check_gravity_alignment};
pub use classifier::{
    AirborneEstimate, PhaseMarker, classify_grounded, find_two_phase_minima, identify_airborne,
    magnitude,
};
pub use error::AnalysisError;
pub use frame::rotate_to_global;
pub use kalman::{AxisEstimate, KinematicEstimate, adaptive_kalman_filter, estimate_kinematics};
pub use pipeline::{
    Channel, ChannelAnalysis, ChannelDiagnostics, PipelineConfig, Sample, SessionAnalysis,
    analyze_channel, analyze_session, relative_joint_angle,
};
pub use rotation::{EulerAngles, normalize, to_euler_angles, to_rotation_matrix};
pub use smoothing::complementary_smooth;
pub use time::timestamps_to_seconds;

pub use nalgebra::{Quaternion, Vector3};

#[cfg(test)]
mod tests;
