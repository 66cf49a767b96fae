pub mod assignment;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod store;
pub mod types;

pub use error::{Result, ReviewerError};
pub use lifecycle::{Reassignment, ReviewService};
