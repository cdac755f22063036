use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResError {
    /// `floor(min(cutoff_true, cutoff_pred) * n) == 0`: the smaller cutoff
    /// keeps no items, so the enrichment score is undefined.
    #[error(
        "Degenerate cutoff: floor(min({cutoff_true}, {cutoff_pred}) * {sample_count}) is zero"
    )]
    DegenerateCutoff {
        cutoff_true: f64,
        cutoff_pred: f64,
        sample_count: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot build a mean surface from zero grids")]
    EmptySurface,

    #[error("Grid shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ResError {
    /// True for the per-group recoverable condition.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, ResError::DegenerateCutoff { .. })
    }
}

pub type Result<T> = std::result::Result<T, ResError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_message_names_cell() {
        let err = ResError::DegenerateCutoff {
            cutoff_true: 0.1,
            cutoff_pred: 0.1,
            sample_count: 5,
        };
        assert!(err.is_degenerate());
        let msg = err.to_string();
        assert!(msg.contains("0.1"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_other_errors_not_degenerate() {
        assert!(!ResError::EmptySurface.is_degenerate());
        assert!(!ResError::InvalidArgument("x".into()).is_degenerate());
    }
}
