//! Error types for editor commands
//!
//! Validation errors are raised before a command touches the working set.
//! Edit errors cover reference and ordering failures against the working set.

use super::SubmissionChannel;

/// A form failed validation; the command was not attempted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Points for {channel} must be a non-negative integer no larger than {max}, got {value}", max = u32::MAX)]
    InvalidPoints {
        channel: SubmissionChannel,
        value: i64,
    },

    #[error("Badge points must be a non-negative integer no larger than {max}, got {0}", max = u32::MAX)]
    InvalidBadgePoints(i64),

    #[error("Day order must be a positive integer, got {0}")]
    InvalidDayOrder(i64),

    #[error("Day {day} is outside the configured range 1-{max}")]
    DayOutOfRange { day: u32, max: u32 },

    #[error("Video URL is not a YouTube link: {0}")]
    InvalidVideoUrl(String),

    #[error("Shop button cannot be shown when shop type is 'none'")]
    ShopButtonWithoutShop,

    #[error("Challenge-triggered badge needs at least one challenge")]
    EmptyChallengeTrigger,

    #[error("Action-triggered badge needs an action trigger")]
    MissingActionTrigger,

    #[error("Unknown action trigger type: {0}")]
    UnknownActionTrigger(String),

    #[error("Badge icon must be at most {max} characters, got {len}")]
    IconTooLong { len: usize, max: usize },
}

/// A command could not be applied to the working set
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),

    #[error("Position {position} is out of range for {len} items")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Import entry {index} rejected: {source}")]
    Import {
        index: usize,
        #[source]
        source: Box<EditError>,
    },
}

impl EditError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Check if the error is a form validation failure (directly or inside an import)
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Import { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::InvalidPoints {
            channel: SubmissionChannel::Video,
            value: -2,
        };
        assert_eq!(
            err.to_string(),
            "Points for video must be a non-negative integer no larger than 4294967295, got -2"
        );
    }

    #[test]
    fn test_import_wraps_validation() {
        let err = EditError::Import {
            index: 3,
            source: Box::new(EditError::Validation(ValidationError::MissingField("title"))),
        };
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Import entry 3 rejected"));
        assert!(!EditError::not_found("Challenge", "c1").is_validation());
    }
}
