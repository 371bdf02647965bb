mod orquestrator;
mod tracing;

pub use orquestrator::ServicesOrquestrator;
pub use tracing::{init_tracing, TracingGuards};
