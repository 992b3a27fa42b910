//! Field-length limits documented by the Media API, shared by the entity
//! builders. Violations surface as [`Error::Validation`] before any network
//! call is made.

use crate::error::{Error, Result};

pub const MAX_NAME_LEN: usize = 60;
pub const MAX_REFERENCE_ID_LEN: usize = 150;
pub const MAX_SHORT_DESCRIPTION_LEN: usize = 250;
pub const MAX_LONG_DESCRIPTION_LEN: usize = 5000;

/// Checks an upper bound on a string field, counted in characters.
pub fn check_max_len(owner: &str, field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::Validation(format!(
            "{owner}.{field} must be {max} characters or less"
        )));
    }
    Ok(())
}

/// Checks that a required string field is present and non-empty.
pub fn check_required(owner: &str, field: &str, value: Option<&str>) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::Validation(format!("{owner}.{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_max_len_boundary() {
        let at_limit = "a".repeat(MAX_NAME_LEN);
        assert!(check_max_len("Video", "name", &at_limit, MAX_NAME_LEN).is_ok());

        let over = "a".repeat(MAX_NAME_LEN + 1);
        let err = check_max_len("Video", "name", &over, MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.to_string(), "Video.name must be 60 characters or less");
    }

    #[test]
    fn test_check_max_len_counts_chars_not_bytes() {
        // 60 multibyte characters are still 60 characters.
        let s = "é".repeat(MAX_NAME_LEN);
        assert!(check_max_len("Video", "name", &s, MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn test_check_required() {
        assert!(check_required("Playlist", "name", Some("x")).is_ok());
        assert!(check_required("Playlist", "name", Some("")).is_err());
        let err = check_required("Playlist", "name", None).unwrap_err();
        assert_eq!(err.to_string(), "Playlist.name is required");
    }
}
