use nalgebra::{Matrix1, Matrix2, RowVector2, Vector2};

/// Added to the innovation covariance diagonal before inversion.
const REGULARIZATION: f64 = 1e-6;
const NOISE_MIN: f64 = 1e-10;
const NOISE_MAX: f64 = 1e-2;
const NOISE_ADAPTATION_GAIN: f64 = 0.01;

/// Constant-acceleration kinematics for one axis.
///
/// State vector  x = [ position, velocity ]ᵀ
/// Control input u = acceleration sample
/// Measurement   z = the same acceleration sample, compared against velocity
///
/// ```text
/// xₖ₊₁ = F · xₖ + B · uₖ
/// zₖ   = H · xₖ
///
/// F = ⎡1  dt⎤ ,  B = ⎡dt²/2⎤ ,  H = ⎡0  1⎤
///     ⎣0   1⎦        ⎣ dt  ⎦
/// ```
#[derive(Debug, Clone)]
pub struct KinematicModel {
    f: Matrix2<f64>,
    b: Vector2<f64>,
    h: RowVector2<f64>,
}

impl KinematicModel {
    pub fn new(dt: f64) -> Self {
        Self {
            f: Matrix2::new(1.0, dt, 0.0, 1.0),
            b: Vector2::new(0.5 * dt * dt, dt),
            h: RowVector2::new(0.0, 1.0),
        }
    }
}

/// Everything the recursion carries from one sample to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// [position, velocity]ᵀ
    pub x: Vector2<f64>,
    /// estimate covariance
    pub p: Matrix2<f64>,
    /// process-noise covariance
    pub q: Matrix2<f64>,
    /// measurement-noise covariance
    pub r: Matrix1<f64>,
}

impl FilterState {
    pub fn initial() -> Self {
        Self {
            x: Vector2::zeros(),
            p: Matrix2::identity(),
            q: Matrix2::identity() * 1e-5,
            r: Matrix1::new(1e-3),
        }
    }

    pub fn position(&self) -> f64 {
        self.x[0]
    }

    pub fn velocity(&self) -> f64 {
        self.x[1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// innovation covariance non-finite or ill-conditioned, prediction kept
    Skipped,
}

/// Rescales the previous noise covariances by the current acceleration and the
/// variance of the acceleration history, then clamps every element.
pub fn adapt_noise(
    q: &Matrix2<f64>,
    r: &Matrix1<f64>,
    acceleration: f64,
    history_variance: f64,
) -> (Matrix2<f64>, Matrix1<f64>) {
    let q = (q * (acceleration.abs() * NOISE_ADAPTATION_GAIN)).map(clamp_noise);
    let r = (r * (history_variance * NOISE_ADAPTATION_GAIN)).map(clamp_noise);
    (q, r)
}

fn clamp_noise(v: f64) -> f64 {
    // NaN stays NaN through clamp; treat it as the floor
    if v.is_nan() {
        NOISE_MIN
    } else {
        v.clamp(NOISE_MIN, NOISE_MAX)
    }
}

/// 2-norm condition number, `inf` for a singular matrix.
pub fn condition_number(m: &Matrix1<f64>) -> f64 {
    let singular_values = m.svd(false, false).singular_values;
    let max = singular_values.iter().copied().fold(0.0, f64::max);
    let min = singular_values.iter().copied().fold(f64::INFINITY, f64::min);
    if min == 0.0 { f64::INFINITY } else { max / min }
}

/// One predict/update cycle. `history_variance` is `Some` once noise adaptation
/// is active and carries the variance of all previous acceleration samples.
pub fn step(
    model: &KinematicModel,
    state: &FilterState,
    acceleration: f64,
    history_variance: Option<f64>,
) -> (FilterState, UpdateOutcome) {
    let (q, r) = match history_variance {
        Some(variance) => adapt_noise(&state.q, &state.r, acceleration, variance),
        None => (state.q, state.r),
    };

    // x̂₋ = F x̂ + B u
    let x = model.f * state.x + model.b * acceleration;
    // P₋ = F P Fᵀ + Q
    let p = model.f * state.p * model.f.transpose() + q;

    // Innovation y = z - H x̂₋
    let y = Matrix1::new(acceleration) - model.h * x;
    // S = H P₋ Hᵀ + R, regularized
    let s = model.h * p * model.h.transpose() + r + Matrix1::identity() * REGULARIZATION;

    let well_conditioned =
        s.iter().all(|v| v.is_finite()) && condition_number(&s) < 1.0 / f64::EPSILON;
    let s_inv = if well_conditioned { s.try_inverse() } else { None };

    match s_inv {
        Some(s_inv) => {
            // K = P₋ Hᵀ S⁻¹
            let k = p * model.h.transpose() * s_inv;
            let x = x + k * y;
            // P = P₋ - K H P₋
            let p = p - k * model.h * p;
            (FilterState { x, p, q, r }, UpdateOutcome::Applied)
        }
        None => (FilterState { x, p, q, r }, UpdateOutcome::Skipped),
    }
}
