pub mod accounts;
pub mod groups;
pub mod knowledge;
pub mod resources;
pub mod validation;
