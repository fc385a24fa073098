pub mod health_checks;
mod service_info;

pub use health_checks::*;
pub use service_info::*;
