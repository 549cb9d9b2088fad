//! Core systems for Horizon DataView.
//!
//! This crate provides the foundational pieces the data view is built on:
//!
//! - **Signal/Slot System**: Type-safe notifications with veto support through
//!   interior-mutable arguments
//! - **Geometry**: Points, sizes and rectangles for row layout and hit-testing
//! - **Logging**: `tracing` targets, performance spans and tree dumps
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_dataview_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(&42);
//! value_changed.disconnect(conn_id);
//! ```

pub mod geometry;
pub mod logging;
pub mod signal;

pub use geometry::{Point, Rect, Size};
pub use logging::{PerfSpan, TreeDebug, TreeFormatOptions, TreeSource, TreeStyle};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
