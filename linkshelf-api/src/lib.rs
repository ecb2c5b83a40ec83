pub mod client;
pub mod error;
pub mod model;

pub use client::ApiClient;
pub use error::ApiError;
pub use model::{Analysis, Category, CreatedLink, Link, LinkPayload, StatEntry};
