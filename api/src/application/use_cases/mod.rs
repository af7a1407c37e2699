pub mod auth;
pub mod groups;
pub mod knowledge;
pub mod resources;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;
