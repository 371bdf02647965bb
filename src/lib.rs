pub mod auth;
pub mod clock;
pub mod config;
pub mod database;
pub mod emails;
pub mod errors;
pub mod http;
pub mod mailing;
pub mod orquestrator;
pub mod service;
pub mod state;
pub mod users;

pub use enrol_macros::Insertable;
pub use errors::AppError;
pub use orquestrator::ServicesOrquestrator;
pub use service::{Service, ServiceExt, StubService};
