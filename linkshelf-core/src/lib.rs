pub mod category;
pub mod debounce;
pub mod draft;
pub mod report;
pub mod service;
pub mod store;

pub use linkshelf_api::{ApiClient, ApiError, Category, Link, StatEntry};
pub use service::{LinkService, Outcome};
pub use store::{LinkStore, Message, MessageKind};
