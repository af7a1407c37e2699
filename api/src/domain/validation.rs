/// Rejection produced by the domain rules before anything touches a store.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing parameter: {0}")]
    Missing(&'static str),
    #[error("{0}")]
    Invalid(String),
}

impl ValidationError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ValidationError::Invalid(msg.into())
    }
}

pub fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(trimmed)
    }
}

pub fn check_char_len(
    value: &str,
    field: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::invalid(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_trims_and_rejects_blank() {
        assert_eq!(require("  abc ", "name"), Ok("abc"));
        assert_eq!(require("   ", "name"), Err(ValidationError::Missing("name")));
    }

    #[test]
    fn char_len_counts_unicode_scalars() {
        assert!(check_char_len("知识点", "title", 1, 3).is_ok());
        assert!(check_char_len("知识点四", "title", 1, 3).is_err());
        assert!(check_char_len("", "title", 1, 3).is_err());
    }
}
