//! Core types for spark-grid.
//!
//! The shared vocabulary of the coordination layer: the axis a gutter
//! lives on, the registry's view of a registered gutter, the per-gutter
//! size constraints, and the error taxonomy.

use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Axis
// =============================================================================

/// One of the two grid axes. Gutters and tracks are always scoped to
/// exactly one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    /// Lowercase name, used in class-name hooks and log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Gutter Item
// =============================================================================

/// A registered gutter: stable identity plus its allocated track.
///
/// Track numbers are 1-based and assigned in registration order by the
/// axis registry. Once assigned, a track never changes and is never
/// renumbered when siblings unregister. The registry owns the entry;
/// callers receive clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GutterItem {
    pub identity: String,
    pub track: u32,
}

impl GutterItem {
    pub fn new(identity: impl Into<String>, track: u32) -> Self {
        Self {
            identity: identity.into(),
            track,
        }
    }
}

// =============================================================================
// Track Constraints
// =============================================================================

/// Per-gutter size bounds, merged into the axis constraint maps under
/// the gutter's assigned track at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackConstraints {
    pub min_size: Option<u32>,
    pub max_size: Option<u32>,
}

impl TrackConstraints {
    /// No bounds declared.
    pub const fn none() -> Self {
        Self {
            min_size: None,
            max_size: None,
        }
    }

    /// Lower bound only.
    pub const fn min(size: u32) -> Self {
        Self {
            min_size: Some(size),
            max_size: None,
        }
    }

    /// Upper bound only.
    pub const fn max(size: u32) -> Self {
        Self {
            min_size: None,
            max_size: Some(size),
        }
    }

    /// Both bounds.
    pub const fn bounded(min_size: u32, max_size: u32) -> Self {
        Self {
            min_size: Some(min_size),
            max_size: Some(max_size),
        }
    }
}

// =============================================================================
// Drag Telemetry
// =============================================================================

/// Engine-specific drag telemetry, treated opaquely and forwarded
/// unchanged to the attached callbacks.
pub type DragPayload = serde_json::Value;

/// Drag event callback. `Rc` so the container can hand the same slot to
/// the coordinator without giving up ownership.
pub type DragCallback = Rc<dyn Fn(&DragPayload)>;

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced by the coordination layer.
///
/// Lifecycle races (calls against a not-yet-ready or already-destroyed
/// coordinator) are silent no-ops, never errors. Errors are reserved for
/// genuine caller contract violations and for failures raised by the
/// external resize engine, which propagate unchanged.
#[derive(Debug, Error)]
pub enum GridError {
    /// The identity is already live on this axis.
    #[error("gutter `{identity}` is already registered on the {axis} axis")]
    DuplicateGutter { axis: Axis, identity: String },

    /// Failure reported by the external resize engine.
    #[error("resize engine: {0}")]
    Engine(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_names() {
        assert_eq!(Axis::Row.as_str(), "row");
        assert_eq!(Axis::Column.to_string(), "column");
    }

    #[test]
    fn test_constraint_constructors() {
        assert_eq!(TrackConstraints::none(), TrackConstraints::default());
        assert_eq!(TrackConstraints::min(50).min_size, Some(50));
        assert_eq!(TrackConstraints::max(200).max_size, Some(200));

        let both = TrackConstraints::bounded(10, 90);
        assert_eq!(both.min_size, Some(10));
        assert_eq!(both.max_size, Some(90));
    }

    #[test]
    fn test_gutter_item_serializes_flat() {
        let item = GutterItem::new("g1", 3);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({ "identity": "g1", "track": 3 }));
    }
}
