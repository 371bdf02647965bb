mod client;
pub mod dtos;
mod routes;
pub mod services;

pub use client::EmailClient;
pub use routes::{routes, EmailsApi};
