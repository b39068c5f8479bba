pub mod crud;
pub mod error;

pub use crud::{FieldArgs, ModelKind};
pub use error::ServiceError;
