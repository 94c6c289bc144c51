//! Axis Registry - Gutter bookkeeping and track allocation.
//!
//! One registry per axis, owned by the grid container. Manages:
//! - Identity ↔ GutterItem mapping (O(1) lookup)
//! - Monotonic 1-based track allocation in registration order
//! - Per-track min/max constraint maps, merged in at registration
//! - A reactive revision counter so deriveds/effects that read the
//!   registry re-run when gutters are added or removed
//!
//! Track numbers are stable for the lifetime of the sibling set:
//! removing a gutter never renumbers survivors, and a freed track number
//! is never handed out again. Registrations that happen after a removal
//! therefore cannot collide with a live track.

use std::collections::{BTreeMap, HashMap};

use spark_signals::{Signal, signal};
use tracing::debug;

use crate::types::{Axis, GridError, GutterItem, TrackConstraints};

// =============================================================================
// Axis Registry
// =============================================================================

/// Registry of live gutters on one axis.
pub struct AxisRegistry {
    axis: Axis,
    gutters: HashMap<String, GutterItem>,
    min_sizes: BTreeMap<u32, u32>,
    max_sizes: BTreeMap<u32, u32>,
    /// Count of tracks ever allocated on this axis. Never decreases.
    allocated: u32,
    /// Bumped on register/unregister. Reading it from an effect or
    /// derived creates a reactive dependency on the gutter set.
    revision: Signal<u64>,
    revisions: u64,
}

impl AxisRegistry {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            gutters: HashMap::new(),
            min_sizes: BTreeMap::new(),
            max_sizes: BTreeMap::new(),
            allocated: 0,
            revision: signal(0),
            revisions: 0,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    // =========================================================================
    // Track Allocation
    // =========================================================================

    /// The track the next registration will receive.
    ///
    /// One greater than the number of tracks ever allocated, so a fresh
    /// registry hands out `1..=N` densely in registration order. The
    /// counter is monotonic: unregistering does not lower it, which keeps
    /// surviving tracks stable and collision-free.
    pub fn next_track(&self) -> u32 {
        self.allocated + 1
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a gutter and allocate its track.
    ///
    /// Declared min/max bounds are merged into the axis constraint maps
    /// keyed by the new track. Registering an identity that is already
    /// live on this axis is a caller contract violation.
    pub fn register(
        &mut self,
        identity: &str,
        constraints: TrackConstraints,
    ) -> Result<GutterItem, GridError> {
        if self.gutters.contains_key(identity) {
            return Err(GridError::DuplicateGutter {
                axis: self.axis,
                identity: identity.to_string(),
            });
        }

        let track = self.next_track();
        self.allocated = track;

        if let Some(min) = constraints.min_size {
            self.min_sizes.insert(track, min);
        }
        if let Some(max) = constraints.max_size {
            self.max_sizes.insert(track, max);
        }

        let item = GutterItem::new(identity, track);
        self.gutters.insert(identity.to_string(), item.clone());
        self.bump();

        debug!(axis = %self.axis, identity, track, "gutter registered");
        Ok(item)
    }

    /// Remove a gutter by identity. Returns the removed entry, or `None`
    /// if the identity was not registered.
    ///
    /// Constraint maps are deliberately left untouched: the engine is
    /// also told to drop the track, so a stale entry keyed by a dead
    /// track is never read again.
    pub fn unregister(&mut self, identity: &str) -> Option<GutterItem> {
        let item = self.gutters.remove(identity)?;
        self.bump();

        debug!(axis = %self.axis, identity, track = item.track, "gutter unregistered");
        Some(item)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn get(&self, identity: &str) -> Option<&GutterItem> {
        self.gutters.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.gutters.contains_key(identity)
    }

    /// Snapshot of all live gutters, for engine initialization.
    /// Order-independent.
    pub fn values(&self) -> Vec<GutterItem> {
        self.gutters.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.gutters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gutters.is_empty()
    }

    /// Per-track minimum sizes collected from gutter registrations.
    pub fn min_sizes(&self) -> &BTreeMap<u32, u32> {
        &self.min_sizes
    }

    /// Per-track maximum sizes collected from gutter registrations.
    pub fn max_sizes(&self) -> &BTreeMap<u32, u32> {
        &self.max_sizes
    }

    // =========================================================================
    // Reactivity
    // =========================================================================

    /// Current revision. Reading from an effect subscribes it to
    /// add/remove changes on this axis.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn bump(&mut self) {
        self.revisions += 1;
        self.revision.set(self.revisions);
    }
}
