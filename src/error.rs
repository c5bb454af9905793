use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvanimError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Shape is longer than biggest allowed length: {length} (max {max})")]
    LengthExceedsMax { length: f64, max: u32 },

    #[error("Invalid copy instruction: {0}")]
    CopyMismatch(String),

    #[error("Shape {index} has an invalid length: {length}")]
    InvalidLength { index: usize, length: f64 },

    #[error("Override references shape that does not exist: {index}")]
    UnknownShape { index: usize },

    #[error("Icon {key}")]
    Icon {
        key: String,
        #[source]
        source: Box<SvanimError>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SvanimError {
    /// Attach the icon key to an error raised while animating that icon.
    pub fn in_icon(self, key: impl Into<String>) -> Self {
        match self {
            SvanimError::Icon { .. } => self,
            other => SvanimError::Icon {
                key: key.into(),
                source: Box::new(other),
            },
        }
    }
}
