pub mod add_members;
pub mod all_groups;
pub mod create_group;
pub mod delete_group;
pub mod group_detail;
pub mod list_groups;
pub mod remove_members;
pub mod rename_group;

use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::group_repository::GroupRepository;

/// Fails unless the group exists and `caller` owns it.
pub(crate) async fn ensure_owner<R: GroupRepository + ?Sized>(
    repo: &R,
    caller: &Caller,
    group_id: i64,
) -> ServiceResult<()> {
    match repo.owner_of(group_id).await? {
        None => Err(ServiceError::not_found(format!("group {group_id} not found"))),
        Some(owner) if owner == caller.user_id => Ok(()),
        Some(_) => Err(ServiceError::forbidden("only the group owner can do this")),
    }
}

pub(crate) fn normalize_user_ids(user_ids: &[String]) -> ServiceResult<Vec<String>> {
    let ids: Vec<String> = user_ids
        .iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(ServiceError::MissingParam("users".into()));
    }
    Ok(ids)
}
