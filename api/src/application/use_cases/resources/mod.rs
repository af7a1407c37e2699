pub mod delete_resource;
pub mod list_resources;
pub mod upload_resource;
