pub mod activation;
pub mod dtos;
pub mod models;
mod routes;
pub mod services;
pub mod store;

pub use routes::{routes, UsersApi};
