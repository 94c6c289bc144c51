//! # spark-grid
//!
//! Gutter/track coordination layer for resizable split grids.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals)
//! for the reactive render-request plumbing.
//!
//! ## Architecture
//!
//! A declarative UI describes a grid container with draggable gutters
//! between its tracks. The actual pointer-drag resize math lives in an
//! external engine behind the [`ResizeEngine`] / [`EngineHandle`] seam;
//! this crate is everything around it:
//!
//! ```text
//! GridProps → compile → GridOptions ┐
//!                                   ├→ InteropCoordinator → engine
//! Gutter → register → AxisRegistry  ┘         │
//!                                             ▼
//!                         drag channels → on_drag / start / stop
//! ```
//!
//! Setup flows one way (declarative parameters → compiled options →
//! engine) and events flow one way (engine → structured callback). The
//! coordinator's Uninitialized → Live → Destroyed state machine keeps
//! exactly one engine instance and exactly one forwarding listener per
//! consumed channel over the container's whole lifetime, and turns every
//! out-of-order lifecycle call into a silent no-op.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Axis, GutterItem, TrackConstraints, errors)
//! - [`registry`] - Per-axis gutter registry and track allocation
//! - [`options`] - Declarative parameters and the option compiler
//! - [`engine`] - The resize engine boundary and drag event channels
//! - [`interop`] - The coordinator state machine
//! - [`container`] - The grid container orchestrator
//! - [`gutter`] - The declarative gutter child

pub mod container;
pub mod engine;
pub mod gutter;
pub mod interop;
pub mod options;
pub mod registry;
pub mod types;

// Re-export commonly used items
pub use types::{Axis, DragCallback, DragPayload, GridError, GutterItem, TrackConstraints};

pub use container::GridContainer;

pub use engine::{DragChannel, DragHandler, EngineEvents, EngineHandle, ResizeEngine};

pub use gutter::{Gutter, GutterProps};

pub use interop::{DragCallbacks, InteropCoordinator};

pub use options::{CallbackSet, GridOptions, GridProps, compile};

pub use registry::AxisRegistry;
