use crate::domain::validation::{ValidationError, check_char_len, require};

pub const GROUP_NAME_MAX_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub group_id: i64,
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub user_id: String,
    pub nickname: String,
}

#[derive(Debug, Clone)]
pub struct GroupDetail {
    pub group_id: i64,
    pub name: String,
    pub owner: GroupMember,
    pub users: Vec<GroupMember>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupOverview {
    pub owned: Vec<Group>,
    pub joined: Vec<Group>,
}

pub fn normalize_group_name(name: &str) -> Result<String, ValidationError> {
    let name = require(name, "name")?;
    check_char_len(name, "group name", 1, GROUP_NAME_MAX_CHARS)?;
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_name_is_trimmed_and_bounded() {
        assert_eq!(normalize_group_name("  Class A ").unwrap(), "Class A");
        assert_eq!(
            normalize_group_name(" "),
            Err(ValidationError::Missing("name"))
        );
        assert!(normalize_group_name(&"g".repeat(65)).is_err());
    }
}
