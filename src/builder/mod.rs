//! Builder API for ergonomic session construction.

pub mod error;
pub mod session;

pub use error::BuildError;
pub use session::SessionBuilder;
