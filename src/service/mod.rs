mod responses;
mod router;
mod services;
mod tests;

pub use responses::{AppJson, AppResult, ErrorMessage, Message, ValidJson};
pub use router::get_router;
pub use services::{shutdown_signal, EmailsService, Service, ServiceExt, UsersService};
pub use tests::StubService;
