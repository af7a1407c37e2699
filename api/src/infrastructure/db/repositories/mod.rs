pub mod group_repository_sqlx;
pub mod resource_repository_sqlx;
pub mod user_repository_sqlx;
