use crate::application::error::ServiceResult;
use crate::application::ports::resource_repository::ResourceRepository;
use crate::domain::resources::resource::{Courseware, Exercise, Video};

pub struct ListResources<'a, R: ResourceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ResourceRepository + ?Sized> ListResources<'a, R> {
    pub async fn videos(&self, point_id: i64) -> ServiceResult<Vec<Video>> {
        Ok(self.repo.videos_by_point(point_id).await?)
    }

    pub async fn coursewares(&self, point_id: i64) -> ServiceResult<Vec<Courseware>> {
        Ok(self.repo.coursewares_by_point(point_id).await?)
    }

    pub async fn exercises(&self, point_id: i64) -> ServiceResult<Vec<Exercise>> {
        Ok(self.repo.exercises_by_point(point_id).await?)
    }
}
