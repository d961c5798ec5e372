#[cfg(feature = "log")]
use log::LevelFilter;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::pipeline::Channel;

pub fn init_logger() {
    #[cfg(feature = "log")]
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter(Some("hop_analysis_core"), LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

pub const SAMPLE_RATE_HZ: f64 = 100.0;
pub const SESSION_LEN: usize = 200;
pub const TAKEOFF: usize = 60;
pub const LANDING: usize = 80;

pub fn uniform_time(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64 / SAMPLE_RATE_HZ).collect()
}

/// Global-frame specific force of a single hop: rest, push-off, flight, impact, rest.
pub fn hop_profile(n: usize) -> Vec<Vector3<f64>> {
    (0..n)
        .map(|i| {
            let z = match i {
                i if i < 50 => 9.81,
                i if i < TAKEOFF => 12.75,
                i if i < LANDING => 0.2,
                i if i < LANDING + 5 => 25.0,
                _ => 9.81,
            };
            Vector3::new(0.0, 0.0, z)
        })
        .collect()
}

/// Pitch (degrees) made of triangular bumps, exactly zero outside them.
pub fn pitch_bumps(n: usize, centers: &[usize], height_deg: f64, half_width: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            centers
                .iter()
                .map(|&c| {
                    let distance = i.abs_diff(c) as f64;
                    (height_deg * (1.0 - distance / half_width as f64)).max(0.0)
                })
                .sum::<f64>()
        })
        .collect()
}

/// A channel whose sensor pitches by `pitch_deg` while measuring `global_acceleration`.
pub fn synthetic_channel(
    name: &str,
    global_acceleration: &[Vector3<f64>],
    pitch_deg: &[f64],
) -> Channel {
    let orientation: Vec<UnitQuaternion<f64>> = pitch_deg
        .iter()
        .map(|p| UnitQuaternion::from_axis_angle(&Vector3::y_axis(), p.to_radians()))
        .collect();
    let local = global_acceleration
        .iter()
        .zip(&orientation)
        .map(|(g, q)| q.inverse_transform_vector(g))
        .collect();
    let orientation: Vec<Quaternion<f64>> = orientation.iter().map(|q| *q.quaternion()).collect();

    Channel::new(name, uniform_time(global_acceleration.len()), local, orientation).unwrap()
}
