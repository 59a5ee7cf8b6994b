//! Single-writer reactive value cells, plus the small tooling around them.

pub mod cell;
pub mod component;
pub mod config;
pub mod demo;
pub mod docs;
pub mod lifecycle;
pub mod observability;
pub mod scheduler;
pub mod service;

pub use cell::{CellReader, NotifyError, Subscription, ValueCell};
pub use config::AppConfig;
pub use lifecycle::Shutdown;
pub use service::StateService;
