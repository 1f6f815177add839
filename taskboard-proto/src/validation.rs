//! Input normalization and validation rules shared by every entry point.

use thiserror::Error;

/// Maximum allowed task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 140;

/// Maximum allowed task description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Malformed caller input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming.
    #[error("task title cannot be empty")]
    EmptyTitle,
    /// Title exceeds [`MAX_TITLE_LENGTH`].
    #[error("task title too long (max {max} characters)")]
    TitleTooLong {
        /// The limit that was exceeded.
        max: usize,
    },
    /// Description exceeds [`MAX_DESCRIPTION_LENGTH`].
    #[error("task description too long (max {max} characters)")]
    DescriptionTooLong {
        /// The limit that was exceeded.
        max: usize,
    },
    /// A move was requested without a target status.
    #[error("target status is required")]
    MissingStatus,
    /// A status string did not name a known column.
    #[error("invalid status: {0}")]
    UnknownStatus(String),
    /// A priority string did not name a known priority.
    #[error("invalid priority: {0}")]
    UnknownPriority(String),
    /// A requested position fell outside the target column under the strict policy.
    #[error("position {requested} is outside 0..={len}")]
    PositionOutOfRange {
        /// The position the caller asked for.
        requested: i64,
        /// Length of the target column before insertion.
        len: usize,
    },
    /// The owner identity was blank.
    #[error("owner identity cannot be blank")]
    InvalidOwner,
}

/// Trims a title and checks it is non-empty and within [`MAX_TITLE_LENGTH`].
///
/// # Errors
///
/// Returns [`ValidationError::EmptyTitle`] or [`ValidationError::TitleTooLong`].
pub fn normalize_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong {
            max: MAX_TITLE_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

/// Trims a description; blank input becomes `None`.
///
/// # Errors
///
/// Returns [`ValidationError::DescriptionTooLong`] if the trimmed text
/// exceeds [`MAX_DESCRIPTION_LENGTH`].
pub fn normalize_description(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::DescriptionTooLong {
            max: MAX_DESCRIPTION_LENGTH,
        });
    }
    Ok(Some(trimmed.to_string()))
}
