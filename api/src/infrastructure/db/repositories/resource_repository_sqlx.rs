use async_trait::async_trait;
use sqlx::Row;

use crate::application::ports::resource_repository::ResourceRepository;
use crate::domain::resources::resource::{Courseware, Difficulty, Exercise, NewResource, Video};
use crate::infrastructure::db::PgPool;

pub struct SqlxResourceRepository {
    pub pool: PgPool,
}

impl SqlxResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository for SqlxResourceRepository {
    async fn insert_video(&self, res: &NewResource) -> anyhow::Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO videos (title, play_url, cover_url, description, point_id)
               VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(&res.title)
        .bind(&res.url)
        .bind(&res.cover_url)
        .bind(&res.description)
        .bind(res.point_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn insert_courseware(&self, res: &NewResource) -> anyhow::Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO coursewares (title, courseware_url, description, point_id)
               VALUES ($1, $2, $3, $4) RETURNING id"#,
        )
        .bind(&res.title)
        .bind(&res.url)
        .bind(&res.description)
        .bind(res.point_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn insert_exercise(&self, res: &NewResource) -> anyhow::Result<i64> {
        let difficulty = res
            .difficulty
            .ok_or_else(|| anyhow::anyhow!("exercise without difficulty"))?;
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO exercises (title, exercise_url, description, difficulty, point_id)
               VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(&res.title)
        .bind(&res.url)
        .bind(&res.description)
        .bind(difficulty.as_str())
        .bind(res.point_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn videos_by_point(&self, point_id: i64) -> anyhow::Result<Vec<Video>> {
        let rows = sqlx::query(
            r#"SELECT id, title, play_url, cover_url, description, point_id, created_at, updated_at
               FROM videos WHERE point_id = $1 ORDER BY id"#,
        )
        .bind(point_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| Video {
                id: r.get("id"),
                title: r.get("title"),
                play_url: r.get("play_url"),
                cover_url: r.get("cover_url"),
                description: r.get("description"),
                point_id: r.get("point_id"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })
            .collect())
    }

    async fn coursewares_by_point(&self, point_id: i64) -> anyhow::Result<Vec<Courseware>> {
        let rows = sqlx::query(
            r#"SELECT id, title, courseware_url, description, point_id, created_at, updated_at
               FROM coursewares WHERE point_id = $1 ORDER BY id"#,
        )
        .bind(point_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| Courseware {
                id: r.get("id"),
                title: r.get("title"),
                courseware_url: r.get("courseware_url"),
                description: r.get("description"),
                point_id: r.get("point_id"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })
            .collect())
    }

    async fn exercises_by_point(&self, point_id: i64) -> anyhow::Result<Vec<Exercise>> {
        let rows = sqlx::query(
            r#"SELECT id, title, exercise_url, description, difficulty, point_id, created_at, updated_at
               FROM exercises WHERE point_id = $1 ORDER BY id"#,
        )
        .bind(point_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|r| {
                let difficulty: String = r.get("difficulty");
                Ok(Exercise {
                    id: r.get("id"),
                    title: r.get("title"),
                    exercise_url: r.get("exercise_url"),
                    description: r.get("description"),
                    difficulty: difficulty.parse::<Difficulty>()?,
                    point_id: r.get("point_id"),
                    created_at: r.get("created_at"),
                    updated_at: r.get("updated_at"),
                })
            })
            .collect()
    }

    async fn delete_video(&self, id: i64, point_id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM videos WHERE id = $1 AND point_id = $2")
            .bind(id)
            .bind(point_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_courseware(&self, id: i64, point_id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM coursewares WHERE id = $1 AND point_id = $2")
            .bind(id)
            .bind(point_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_exercise(&self, id: i64, point_id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM exercises WHERE id = $1 AND point_id = $2")
            .bind(id)
            .bind(point_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
