pub mod analysis;
pub mod auth;
pub mod envelope;
pub mod groups;
pub mod health;
pub mod knowledge;
pub mod params;
pub mod resources;
