pub mod global;
pub mod user;
