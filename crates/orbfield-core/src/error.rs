use thiserror::Error;

/// Errors reported to whoever mounts or drives a field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// The drawing context could not be acquired. The loop stays stopped.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// Rejected at construction; the engine never starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The host refused to queue a frame callback.
    #[error("frame scheduling failed: {0}")]
    Scheduler(String),
}

impl From<serde_json::Error> for FieldError {
    fn from(e: serde_json::Error) -> Self {
        FieldError::InvalidConfiguration(e.to_string())
    }
}

/// A single draw call failed on the host surface.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("draw failed: {0}")]
pub struct SurfaceError(pub String);
