use async_trait::async_trait;

use crate::domain::resources::resource::{Courseware, Exercise, NewResource, Video};

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn insert_video(&self, res: &NewResource) -> anyhow::Result<i64>;
    async fn insert_courseware(&self, res: &NewResource) -> anyhow::Result<i64>;
    /// `res.difficulty` must be set for exercises.
    async fn insert_exercise(&self, res: &NewResource) -> anyhow::Result<i64>;
    async fn videos_by_point(&self, point_id: i64) -> anyhow::Result<Vec<Video>>;
    async fn coursewares_by_point(&self, point_id: i64) -> anyhow::Result<Vec<Courseware>>;
    async fn exercises_by_point(&self, point_id: i64) -> anyhow::Result<Vec<Exercise>>;
    async fn delete_video(&self, id: i64, point_id: i64) -> anyhow::Result<bool>;
    async fn delete_courseware(&self, id: i64, point_id: i64) -> anyhow::Result<bool>;
    async fn delete_exercise(&self, id: i64, point_id: i64) -> anyhow::Result<bool>;
}
