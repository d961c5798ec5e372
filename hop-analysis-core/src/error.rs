use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("channel contains no samples")]
    EmptyChannel,

    #[error("series length mismatch: expected {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("time vector differs from the session time vector")]
    TimeVectorMismatch,

    #[error("time decreases at sample {index}")]
    NonMonotonicTime { index: usize },

    #[error("invalid time step: mean dt = {dt}")]
    NonPositiveTimeStep { dt: f64 },

    #[error("insufficient samples: need at least {required}, got {available}")]
    InsufficientSamples { required: usize, available: usize },

    #[error("gravity estimate has zero or non-finite norm")]
    DegenerateGravityEstimate,

    #[error("reference axis must be a finite non-zero vector")]
    InvalidReferenceAxis,

    #[error("smoothing alpha must lie in [0, 1], got {alpha}")]
    InvalidSmoothingAlpha { alpha: f64 },

    #[error("not enough valid local minima found: {found} (need 2)")]
    InsufficientPhaseMinima { found: usize },

    #[error("session has no channels")]
    NoChannels,

    #[error("channel index {index} out of range ({available} channels)")]
    UnknownChannel { index: usize, available: usize },

    #[error("channel '{channel}': {source}")]
    Channel {
        channel: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    pub fn in_channel(self, channel: &str) -> Self {
        match self {
            // already attributed
            Self::Channel { .. } => self,
            other => Self::Channel {
                channel: channel.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, with any channel attribution stripped.
    pub fn root(&self) -> &AnalysisError {
        match self {
            Self::Channel { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = core::result::Result<T, AnalysisError>;
