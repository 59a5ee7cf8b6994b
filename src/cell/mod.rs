//! Observable value cell.
//!
//! # Data Flow
//! ```text
//! owner ──set(v)──▶ ValueCell ──commit──▶ current
//!                       │
//!                       └──notify(v)──▶ subscriber 1 → subscriber 2 → ...
//!
//! consumer ──reader().subscribe(cb)──▶ cb(current)   (replay)
//!                                   ──▶ cb(v) for every later write
//! ```
//!
//! # Design Decisions
//! - Single-threaded: `Rc`/`RefCell`, no locks, no suspension points
//! - One writer owns the `ValueCell`; consumers get a `CellReader`
//! - Subscriptions hold weak references and never keep a cell alive
//! - Best-effort delivery: failures are collected and returned after every
//!   subscriber has been attempted

pub mod error;
pub mod subscription;
pub mod value_cell;

pub use error::{BoxError, NotifyError, SubscriberFailure};
pub use subscription::{Subscription, SubscriptionGuard, SubscriptionId};
pub use value_cell::{CellReader, ValueCell};
