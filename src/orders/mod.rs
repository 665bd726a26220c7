//! Orders and the delayed-order scheduler

pub mod order;
pub mod queue;

pub use order::{Order, OrderKind, OrderTiming, Quantity};
pub use queue::{apply_order, OrderQueue};
