mod app_error;
mod constraint;

pub use app_error::AppError;
pub use constraint::{classify_write_error, constraint_error};

pub type Result<T> = std::result::Result<T, AppError>;
