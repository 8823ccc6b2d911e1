//! Error taxonomy for the sketch pipeline.
//!
//! None of these are fatal. A failed gesture is reported to the draw-end sink
//! as an `Err` and the user simply draws again; nothing is retried.

/// Errors produced while turning a gesture into a shape.
#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    /// The host map could not resolve a screen point (not mounted yet, or the
    /// point lies outside the rendered viewport).
    #[error("host map could not project screen point ({x}, {y})")]
    ProjectionUnavailable { x: f64, y: f64 },

    /// A circle was finished before a scale factor was measured for the
    /// current mode session.
    #[error("scale factor unavailable for the current mode session")]
    ScaleUnavailable,

    /// A projection resolved after a gesture under a newer mode selection
    /// had already started.
    #[error("stale result for generation {generation} (current {current})")]
    Stale { generation: u64, current: u64 },

    /// The session runtime is no longer running.
    #[error("sketch session channel closed")]
    ChannelClosed,

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// A shape could not be encoded.
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SketchError {
    /// Stable machine-readable code for logs and host bridges.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ProjectionUnavailable { .. } => "E_PROJECTION_UNAVAILABLE",
            Self::ScaleUnavailable => "E_SCALE_UNAVAILABLE",
            Self::Stale { .. } => "E_STALE",
            Self::ChannelClosed => "E_CHANNEL_CLOSED",
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::Encode(_) => "E_ENCODE",
        }
    }
}
