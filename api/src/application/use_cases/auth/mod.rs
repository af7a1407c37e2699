pub mod change_password;
pub mod login;
pub mod me;
pub mod password;
pub mod register;
