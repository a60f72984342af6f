//! Core systems for rowbind.
//!
//! This crate provides the foundational components the data-set adapter is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe change notification, direct or queued
//! - **Property System**: Values with change detection, optionally observable
//! - **Dispatch Queue**: The designated UI-thread queue notifications are posted through
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use rowbind_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Cross-thread Delivery Example
//!
//! ```
//! use rowbind_core::{DispatchQueue, Signal};
//! use std::sync::Arc;
//!
//! let queue = DispatchQueue::new();
//! let data_changed = Arc::new(Signal::<()>::new());
//!
//! data_changed.connect_queued(&queue.handle(), |_| {
//!     // Runs on the thread that owns `queue`.
//! });
//!
//! let producer = data_changed.clone();
//! std::thread::spawn(move || producer.emit(())).join().unwrap();
//!
//! assert_eq!(queue.process_pending(), 1);
//! ```

pub mod dispatch;
mod error;
pub mod logging;
pub mod property;
pub mod signal;

pub use dispatch::{DispatchHandle, DispatchQueue, TaskId, ThreadAffinity};
pub use error::{CoreError, Result};
pub use logging::PerfSpan;
pub use property::{ObservableProperty, Property};
pub use signal::{ConnectionId, ConnectionType, Signal};
