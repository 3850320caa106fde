//! Errors reported by track construction and editing

use super::types::SegmentId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    /// Zero-length straight, non-positive radius or sweep, or non-finite coordinates.
    #[error("invalid segment geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// Station or signal fraction outside [0, 1]. Such values are rejected, never clamped.
    #[error("fraction {fraction} is outside [0, 1]")]
    InvalidPosition { fraction: f32 },

    #[error("segment {0:?} not found on track")]
    UnknownSegment(SegmentId),

    #[error("invalid train configuration: {reason}")]
    InvalidTrainConfig { reason: String },
}

impl TrackError {
    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        TrackError::InvalidGeometry {
            reason: reason.into(),
        }
    }

    pub(crate) fn train_config(reason: impl Into<String>) -> Self {
        TrackError::InvalidTrainConfig {
            reason: reason.into(),
        }
    }
}

pub type TrackResult<T> = Result<T, TrackError>;
