use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{ValidationError, check_char_len};

static USER_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{1,32}$").unwrap());
static PASSWORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{8,16}$").unwrap());

pub const NICKNAME_MAX_CHARS: usize = 128;

/// Account role. Higher rank implies every permission of the lower ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Teacher,
    Student,
}

impl UserType {
    pub fn rank(self) -> u8 {
        match self {
            UserType::Admin => 16,
            UserType::Teacher => 8,
            UserType::Student => 4,
        }
    }

    pub fn outranks_or_equals(self, other: UserType) -> bool {
        self.rank() >= other.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Teacher => "teacher",
            UserType::Student => "student",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(UserType::Admin),
            "teacher" => Ok(UserType::Teacher),
            "student" => Ok(UserType::Student),
            other => Err(ValidationError::invalid(format!(
                "unknown user type: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub user_id: String,
    pub nickname: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub account: Account,
    pub password_hash: String,
}

pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    if USER_ID_REGEX.is_match(user_id) {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            "user id must be 1-32 letters, digits or underscores",
        ))
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if PASSWORD_REGEX.is_match(password) {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            "password must be 8-16 letters or digits",
        ))
    }
}

pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    check_char_len(nickname, "nickname", 1, NICKNAME_MAX_CHARS)
}
