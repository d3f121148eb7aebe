pub mod error;
pub mod status;

pub use error::{LogError, PersistError, Result};
pub use status::Status;
