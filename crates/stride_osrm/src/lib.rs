pub mod client;
pub mod route;
