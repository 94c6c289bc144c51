//! Gutter - The declarative drag-handle child.
//!
//! A gutter mounts against an injected container reference (explicit
//! context passing, never a global lookup), fixes its axis at
//! construction, and asks the container for a track assignment. Its
//! identity is caller-supplied or generated; either way it stays stable
//! for the gutter's whole life and doubles as the engine identifier.
//!
//! Unmounting removes the registration and tells the engine to drop the
//! track. Dropping a still-mounted handle does the same, best effort,
//! so a forgotten gutter cannot leak a registry entry.

use std::cell::RefCell;
use std::rc::Rc;

use crate::container::GridContainer;
use crate::types::{Axis, GridError, GutterItem, TrackConstraints};

thread_local! {
    /// Counter for generated gutter identities.
    static GUTTER_ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };
}

fn next_gutter_id() -> String {
    GUTTER_ID_COUNTER.with(|counter| {
        let mut counter = counter.borrow_mut();
        let id = format!("split-grid-gutter-{}", *counter);
        *counter += 1;
        id
    })
}

// =============================================================================
// Props
// =============================================================================

/// Declarative gutter configuration.
#[derive(Debug, Clone, Default)]
pub struct GutterProps {
    /// Stable identity; generated when not supplied.
    pub id: Option<String>,
    /// Minimum size for the adjacent track, merged into the axis
    /// constraint map under the assigned track.
    pub min_size: Option<u32>,
    /// Maximum size for the adjacent track.
    pub max_size: Option<u32>,
}

// =============================================================================
// Gutter Handle
// =============================================================================

/// A mounted gutter. Holds a back-reference to its container, never
/// ownership; once the container is destroyed, unmounting degrades to a
/// no-op.
pub struct Gutter {
    container: Rc<GridContainer>,
    axis: Axis,
    identity: String,
    item: Option<GutterItem>,
}

impl Gutter {
    /// Mount a gutter on the given axis.
    ///
    /// Registers with the container (allocating the track) and stores
    /// the assignment. Mounting against an already-disposed container
    /// succeeds but carries no track; the handle is inert.
    pub fn mount(
        container: Rc<GridContainer>,
        axis: Axis,
        props: GutterProps,
    ) -> Result<Self, GridError> {
        let identity = props.id.unwrap_or_else(next_gutter_id);
        let constraints = TrackConstraints {
            min_size: props.min_size,
            max_size: props.max_size,
        };

        let item = match axis {
            Axis::Row => container.add_row(&identity, constraints)?,
            Axis::Column => container.add_column(&identity, constraints)?,
        };

        Ok(Self {
            container,
            axis,
            identity,
            item,
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The allocated track, if the mount reached a live container.
    pub fn track(&self) -> Option<u32> {
        self.item.as_ref().map(|item| item.track)
    }

    /// Request a re-render through the container.
    pub fn refresh(&self) {
        self.container.refresh();
    }

    /// Axis/track-derived styling hook, e.g.
    /// `split-grid-gutter split-grid-gutter-row split-grid-gutter-row-2`.
    pub fn class_name(&self) -> String {
        let axis = self.axis.as_str();
        match self.track() {
            Some(track) => format!(
                "split-grid-gutter split-grid-gutter-{axis} split-grid-gutter-{axis}-{track}"
            ),
            None => format!("split-grid-gutter split-grid-gutter-{axis}"),
        }
    }

    /// Unregister and synchronize the engine. `immediate` requests
    /// synchronous collapse of the adjacent track space.
    pub fn unmount(mut self, immediate: bool) -> Result<(), GridError> {
        self.remove(immediate)
    }

    fn remove(&mut self, immediate: bool) -> Result<(), GridError> {
        if self.item.take().is_none() {
            return Ok(());
        }
        match self.axis {
            Axis::Row => self.container.remove_row(&self.identity, immediate),
            Axis::Column => self.container.remove_column(&self.identity, immediate),
        }
    }
}

impl Drop for Gutter {
    fn drop(&mut self) {
        // Best effort: a dropped handle must not leak its registration.
        let _ = self.remove(true);
    }
}
