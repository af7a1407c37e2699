use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::resource_repository::ResourceRepository;
use crate::domain::accounts::account::UserType;
use crate::domain::resources::resource::ResourceKind;

pub struct DeleteResource<'a, R: ResourceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ResourceRepository + ?Sized> DeleteResource<'a, R> {
    /// Only the metadata row is removed; the object stays in its bucket.
    pub async fn execute(
        &self,
        caller: &Caller,
        kind: ResourceKind,
        id: i64,
        point_id: i64,
    ) -> ServiceResult<()> {
        caller.require(UserType::Teacher)?;
        let deleted = match kind {
            ResourceKind::Video => self.repo.delete_video(id, point_id).await?,
            ResourceKind::Courseware => self.repo.delete_courseware(id, point_id).await?,
            ResourceKind::Exercise => self.repo.delete_exercise(id, point_id).await?,
        };
        if !deleted {
            return Err(ServiceError::not_found(format!(
                "{kind} {id} not found under point {point_id}"
            )));
        }
        tracing::info!(kind = %kind, id, point_id, "resource_deleted");
        Ok(())
    }
}
