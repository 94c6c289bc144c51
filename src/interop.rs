//! Interop Coordinator - Lifetime of the external engine instance.
//!
//! A tagged state machine (Uninitialized → Live → Destroyed, terminal)
//! around exactly one engine handle:
//!
//! - `initialize` creates the handle from the initial gutter snapshot
//!   and compiled options, and attaches exactly one forwarding listener
//!   per drag channel that has a consumer
//! - `add_gutter` / `remove_gutter` keep the engine synchronized with
//!   the registries, and are tolerated (silently ignored) against a
//!   coordinator that is not Live - UI mount order cannot guarantee the
//!   engine exists before children do
//! - `destroy` releases every subscription and the handle, idempotently
//!
//! The state tag - not call-order discipline - is what makes a second
//! `initialize` unable to leak a duplicate handle or subscription.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::engine::{EngineEvents, EngineHandle, ResizeEngine};
use crate::options::GridOptions;
use crate::types::{Axis, DragCallback, GridError, GutterItem};

// =============================================================================
// Callback Slots
// =============================================================================

/// The container's structured drag callbacks, handed to `initialize`.
/// Unattached slots get no forwarding listener at all - the engine was
/// already told via the compiled `has_on_drag*` flags not to wire those
/// channels.
#[derive(Default)]
pub struct DragCallbacks {
    pub on_drag: Option<DragCallback>,
    pub on_drag_start: Option<DragCallback>,
    pub on_drag_stop: Option<DragCallback>,
}

impl DragCallbacks {
    pub fn none() -> Self {
        Self::default()
    }
}

// =============================================================================
// State Machine
// =============================================================================

#[derive(Default)]
struct Subscriptions {
    drag_start: Option<usize>,
    drag: Option<usize>,
    drag_stop: Option<usize>,
}

enum State {
    Uninitialized,
    Live {
        handle: Box<dyn EngineHandle>,
        events: Rc<EngineEvents>,
        subscriptions: Subscriptions,
    },
    Destroyed,
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Uninitialized => "uninitialized",
            State::Live { .. } => "live",
            State::Destroyed => "destroyed",
        }
    }
}

/// Owns the external engine instance for one container.
pub struct InteropCoordinator {
    engine: Box<dyn ResizeEngine>,
    state: State,
}

impl InteropCoordinator {
    pub fn new(engine: Box<dyn ResizeEngine>) -> Self {
        Self {
            engine,
            state: State::Uninitialized,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, State::Live { .. })
    }

    /// Uninitialized → Live: create the engine handle and attach the
    /// forwarding listeners.
    ///
    /// Calling this on a Live or Destroyed coordinator is a programming
    /// error on the caller's side; it is logged and ignored, and never
    /// creates a second handle.
    pub fn initialize(
        &mut self,
        element: &str,
        rows: Vec<GutterItem>,
        columns: Vec<GutterItem>,
        options: &GridOptions,
        callbacks: DragCallbacks,
    ) -> Result<(), GridError> {
        if !matches!(self.state, State::Uninitialized) {
            warn!(
                state = self.state.name(),
                "initialize called again; keeping the existing engine handle"
            );
            return Ok(());
        }

        let handle = self.engine.create(element, rows, columns, options)?;
        let events = handle.events();

        let mut subscriptions = Subscriptions::default();
        if let Some(callback) = callbacks.on_drag_start {
            subscriptions.drag_start = Some(events.drag_start.subscribe(callback));
        }
        if let Some(callback) = callbacks.on_drag {
            subscriptions.drag = Some(events.drag.subscribe(callback));
        }
        if let Some(callback) = callbacks.on_drag_stop {
            subscriptions.drag_stop = Some(events.drag_stop.subscribe(callback));
        }

        debug!(element, "interop coordinator live");
        self.state = State::Live {
            handle,
            events,
            subscriptions,
        };
        Ok(())
    }

    /// Tell the engine to begin tracking a gutter. Silent no-op unless
    /// Live.
    pub fn add_gutter(&mut self, axis: Axis, identity: &str, track: u32) -> Result<(), GridError> {
        match &mut self.state {
            State::Live { handle, .. } => handle.add_gutter(axis, identity, track),
            _ => Ok(()),
        }
    }

    /// Tell the engine to stop tracking a gutter. `immediate` is passed
    /// through uninterpreted. Silent no-op unless Live.
    pub fn remove_gutter(
        &mut self,
        axis: Axis,
        identity: &str,
        track: u32,
        immediate: bool,
    ) -> Result<(), GridError> {
        match &mut self.state {
            State::Live { handle, .. } => handle.remove_gutter(axis, identity, track, immediate),
            _ => Ok(()),
        }
    }

    /// Live → Destroyed: release all subscriptions and the handle.
    /// Idempotent; calling on an Uninitialized or Destroyed coordinator
    /// changes nothing.
    pub fn destroy(&mut self, immediate: bool) -> Result<(), GridError> {
        match std::mem::replace(&mut self.state, State::Destroyed) {
            State::Live {
                mut handle,
                events,
                subscriptions,
            } => {
                if let Some(id) = subscriptions.drag_start {
                    events.drag_start.unsubscribe(id);
                }
                if let Some(id) = subscriptions.drag {
                    events.drag.unsubscribe(id);
                }
                if let Some(id) = subscriptions.drag_stop {
                    events.drag_stop.unsubscribe(id);
                }
                debug!("interop coordinator destroyed");
                handle.destroy(immediate)
            }
            state @ State::Uninitialized => {
                // Not yet live: stay that way rather than poisoning a
                // coordinator the container has not initialized.
                self.state = state;
                Ok(())
            }
            State::Destroyed => Ok(()),
        }
    }
}
