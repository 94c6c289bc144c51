//! Resize Engine Boundary - Traits and drag event channels.
//!
//! The pointer-drag resize algorithm is an external collaborator. This
//! module defines the narrow seam the coordination layer talks through:
//!
//! - [`ResizeEngine`] - factory, creates one live engine instance per
//!   container from the initial gutter snapshot and compiled options
//! - [`EngineHandle`] - the live instance: add/remove gutters, destroy
//! - [`EngineEvents`] / [`DragChannel`] - the three drag telemetry
//!   channels an engine emits on; the coordinator subscribes forwarding
//!   listeners here and releases them on destroy
//!
//! Payloads are engine-specific and flow through unchanged.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::options::GridOptions;
use crate::types::{Axis, DragPayload, GridError, GutterItem};

// =============================================================================
// Drag Channels
// =============================================================================

/// Listener on a drag channel.
pub type DragHandler = Rc<dyn Fn(&DragPayload)>;

/// One drag telemetry channel with subscribe/unsubscribe/emit.
///
/// Subscriptions are identified by the id returned from [`subscribe`],
/// so a listener can be released without comparing function pointers.
///
/// [`subscribe`]: DragChannel::subscribe
#[derive(Default)]
pub struct DragChannel {
    handlers: RefCell<Vec<(usize, DragHandler)>>,
    next_id: Cell<usize>,
}

impl DragChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. Returns the id to unsubscribe with.
    pub fn subscribe(&self, handler: DragHandler) -> usize {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Detach a listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: usize) {
        self.handlers.borrow_mut().retain(|(handler_id, _)| *handler_id != id);
    }

    /// Deliver a payload to every listener.
    pub fn emit(&self, payload: &DragPayload) {
        // Snapshot first so a listener that mutates the subscription
        // list mid-dispatch cannot invalidate the iteration.
        let snapshot: Vec<DragHandler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in snapshot {
            handler(payload);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

/// The three channels an engine instance emits drag telemetry on.
#[derive(Default)]
pub struct EngineEvents {
    pub drag_start: DragChannel,
    pub drag: DragChannel,
    pub drag_stop: DragChannel,
}

impl EngineEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total listeners across all three channels.
    pub fn handler_count(&self) -> usize {
        self.drag_start.handler_count() + self.drag.handler_count() + self.drag_stop.handler_count()
    }
}

// =============================================================================
// Engine Traits
// =============================================================================

/// A live engine instance bound to one container element.
///
/// Track numbers passed here are the registry-assigned declaration-time
/// positions; the coordination layer never renumbers them after a
/// removal. An engine that expects post-removal renumbering must adapt
/// inside its own implementation of this trait.
pub trait EngineHandle {
    /// Begin tracking a new gutter at `track` on `axis`.
    fn add_gutter(&mut self, axis: Axis, identity: &str, track: u32) -> Result<(), GridError>;

    /// Stop tracking a gutter. `immediate` requests synchronous collapse
    /// of the adjacent track space; it is a pass-through hint.
    fn remove_gutter(
        &mut self,
        axis: Axis,
        identity: &str,
        track: u32,
        immediate: bool,
    ) -> Result<(), GridError>;

    /// Tear the instance down.
    fn destroy(&mut self, immediate: bool) -> Result<(), GridError>;

    /// The channels this instance emits drag telemetry on. Shared so
    /// emitters and subscribers can outlive borrows of the handle.
    fn events(&self) -> Rc<EngineEvents>;
}

/// Factory for engine instances. Injected into the container; called
/// exactly once per container lifetime.
pub trait ResizeEngine {
    fn create(
        &mut self,
        element: &str,
        rows: Vec<GutterItem>,
        columns: Vec<GutterItem>,
        options: &GridOptions,
    ) -> Result<Box<dyn EngineHandle>, GridError>;
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    //! Recording engine used across the crate's tests: logs every call
    //! it receives and exposes its event channels for manual emission.

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum EngineCall {
        Create {
            element: String,
            rows: Vec<GutterItem>,
            columns: Vec<GutterItem>,
            options: GridOptions,
        },
        AddGutter {
            axis: Axis,
            identity: String,
            track: u32,
        },
        RemoveGutter {
            axis: Axis,
            identity: String,
            track: u32,
            immediate: bool,
        },
        Destroy {
            immediate: bool,
        },
    }

    pub(crate) struct RecordingEngine {
        pub calls: Rc<RefCell<Vec<EngineCall>>>,
        pub events: Rc<EngineEvents>,
        pub created: Rc<Cell<usize>>,
        pub fail_create: bool,
        pub fail_ops: Rc<Cell<bool>>,
    }

    impl RecordingEngine {
        pub fn new() -> Self {
            Self {
                calls: Rc::new(RefCell::new(Vec::new())),
                events: Rc::new(EngineEvents::new()),
                created: Rc::new(Cell::new(0)),
                fail_create: false,
                fail_ops: Rc::new(Cell::new(false)),
            }
        }

        pub(crate) fn call_log(&self) -> Vec<EngineCall> {
            self.calls.borrow().clone()
        }

        /// Second view onto the same engine state, for asserting after
        /// the original has been boxed away into a coordinator.
        pub(crate) fn probe(&self) -> RecordingEngine {
            RecordingEngine {
                calls: self.calls.clone(),
                events: self.events.clone(),
                created: self.created.clone(),
                fail_create: false,
                fail_ops: self.fail_ops.clone(),
            }
        }
    }

    impl ResizeEngine for RecordingEngine {
        fn create(
            &mut self,
            element: &str,
            rows: Vec<GutterItem>,
            columns: Vec<GutterItem>,
            options: &GridOptions,
        ) -> Result<Box<dyn EngineHandle>, GridError> {
            if self.fail_create {
                return Err(GridError::Engine("create refused".to_string()));
            }
            self.created.set(self.created.get() + 1);
            self.calls.borrow_mut().push(EngineCall::Create {
                element: element.to_string(),
                rows,
                columns,
                options: options.clone(),
            });
            Ok(Box::new(RecordingHandle {
                calls: self.calls.clone(),
                events: self.events.clone(),
                fail_ops: self.fail_ops.clone(),
            }))
        }
    }

    struct RecordingHandle {
        calls: Rc<RefCell<Vec<EngineCall>>>,
        events: Rc<EngineEvents>,
        fail_ops: Rc<Cell<bool>>,
    }

    impl EngineHandle for RecordingHandle {
        fn add_gutter(&mut self, axis: Axis, identity: &str, track: u32) -> Result<(), GridError> {
            if self.fail_ops.get() {
                return Err(GridError::Engine("add refused".to_string()));
            }
            self.calls.borrow_mut().push(EngineCall::AddGutter {
                axis,
                identity: identity.to_string(),
                track,
            });
            Ok(())
        }

        fn remove_gutter(
            &mut self,
            axis: Axis,
            identity: &str,
            track: u32,
            immediate: bool,
        ) -> Result<(), GridError> {
            if self.fail_ops.get() {
                return Err(GridError::Engine("remove refused".to_string()));
            }
            self.calls.borrow_mut().push(EngineCall::RemoveGutter {
                axis,
                identity: identity.to_string(),
                track,
                immediate,
            });
            Ok(())
        }

        fn destroy(&mut self, immediate: bool) -> Result<(), GridError> {
            if self.fail_ops.get() {
                return Err(GridError::Engine("destroy refused".to_string()));
            }
            self.calls.borrow_mut().push(EngineCall::Destroy { immediate });
            Ok(())
        }

        fn events(&self) -> Rc<EngineEvents> {
            self.events.clone()
        }
    }
}
