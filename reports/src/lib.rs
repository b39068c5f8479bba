pub mod error;
pub mod queries;

pub use error::ReportError;
pub use queries::run_all;
