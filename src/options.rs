//! Option Compiler - Declarative parameters to flat engine options.
//!
//! The container is configured with [`GridProps`]: global, per-axis, and
//! per-track size bounds, snap offsets, drag intervals, cursors, and the
//! three drag callback slots. [`compile`] flattens that set, together
//! with the constraint maps both registries collected from per-gutter
//! declarations, into the [`GridOptions`] shape the resize engine
//! consumes.
//!
//! The engine distinguishes "unset" from "zero", so every optional field
//! is omitted from the serialized form unless the caller supplied it,
//! and constraint maps are omitted when empty. Only the three
//! `has_on_drag*` booleans are always present - they tell the engine
//! whether to wire an event channel at all.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::registry::AxisRegistry;
use crate::types::DragCallback;

// =============================================================================
// Callback Set
// =============================================================================

bitflags! {
    /// Which drag callback slots have a consumer attached.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CallbackSet: u8 {
        const DRAG = 1 << 0;
        const DRAG_START = 1 << 1;
        const DRAG_STOP = 1 << 2;
    }
}

// =============================================================================
// Container Parameters
// =============================================================================

/// Declarative configuration of a grid container.
///
/// Every field is optional; unset fields never reach the engine. The
/// per-track maps declared here are merged with the constraints gutters
/// declare at registration (the registry entry wins for its track).
#[derive(Default)]
pub struct GridProps {
    /// Stable element identity handed to the engine at creation. A
    /// container-scoped id is generated when not supplied.
    pub id: Option<String>,

    pub min_size: Option<u32>,
    pub max_size: Option<u32>,

    pub column_min_size: Option<u32>,
    pub column_max_size: Option<u32>,
    pub column_min_sizes: BTreeMap<u32, u32>,
    pub column_max_sizes: BTreeMap<u32, u32>,

    pub row_min_size: Option<u32>,
    pub row_max_size: Option<u32>,
    pub row_min_sizes: BTreeMap<u32, u32>,
    pub row_max_sizes: BTreeMap<u32, u32>,

    pub snap_offset: Option<u32>,
    pub column_snap_offset: Option<u32>,
    pub row_snap_offset: Option<u32>,

    pub drag_interval: Option<u32>,
    pub column_drag_interval: Option<u32>,
    pub row_drag_interval: Option<u32>,

    pub cursor: Option<String>,
    pub column_cursor: Option<String>,
    pub row_cursor: Option<String>,

    pub on_drag: Option<DragCallback>,
    pub on_drag_start: Option<DragCallback>,
    pub on_drag_stop: Option<DragCallback>,
}

impl GridProps {
    /// Which callback slots are attached. Derived from slot presence
    /// only, never from other option values.
    pub fn callbacks(&self) -> CallbackSet {
        let mut set = CallbackSet::empty();
        if self.on_drag.is_some() {
            set |= CallbackSet::DRAG;
        }
        if self.on_drag_start.is_some() {
            set |= CallbackSet::DRAG_START;
        }
        if self.on_drag_stop.is_some() {
            set |= CallbackSet::DRAG_STOP;
        }
        set
    }
}

// =============================================================================
// Compiled Options
// =============================================================================

/// The flat configuration handed to the resize engine.
///
/// Serialization omits unset fields and empty maps; the `has_on_drag*`
/// booleans are always present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_min_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_max_size: Option<u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub column_min_sizes: BTreeMap<u32, u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub column_max_sizes: BTreeMap<u32, u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_min_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_max_size: Option<u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub row_min_sizes: BTreeMap<u32, u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub row_max_sizes: BTreeMap<u32, u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_snap_offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_snap_offset: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_drag_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_drag_interval: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_cursor: Option<String>,

    pub has_on_drag: bool,
    pub has_on_drag_start: bool,
    pub has_on_drag_stop: bool,
}

impl GridOptions {
    /// Flat key/value form for engines that consume a dictionary.
    /// Unset fields are absent, not null.
    pub fn to_interoperable(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // Serializing a plain struct of scalars and maps cannot
            // produce anything else.
            _ => Map::new(),
        }
    }
}

// =============================================================================
// Compilation
// =============================================================================

/// Compile the declarative parameter set and the current registry
/// snapshots into engine options. Pure: reads only.
pub fn compile(props: &GridProps, rows: &AxisRegistry, columns: &AxisRegistry) -> GridOptions {
    let callbacks = props.callbacks();

    GridOptions {
        min_size: props.min_size,
        max_size: props.max_size,

        column_min_size: props.column_min_size,
        column_max_size: props.column_max_size,
        column_min_sizes: merge_tracks(&props.column_min_sizes, columns.min_sizes()),
        column_max_sizes: merge_tracks(&props.column_max_sizes, columns.max_sizes()),

        row_min_size: props.row_min_size,
        row_max_size: props.row_max_size,
        row_min_sizes: merge_tracks(&props.row_min_sizes, rows.min_sizes()),
        row_max_sizes: merge_tracks(&props.row_max_sizes, rows.max_sizes()),

        snap_offset: props.snap_offset,
        column_snap_offset: props.column_snap_offset,
        row_snap_offset: props.row_snap_offset,

        drag_interval: props.drag_interval,
        column_drag_interval: props.column_drag_interval,
        row_drag_interval: props.row_drag_interval,

        cursor: props.cursor.clone(),
        column_cursor: props.column_cursor.clone(),
        row_cursor: props.row_cursor.clone(),

        has_on_drag: callbacks.contains(CallbackSet::DRAG),
        has_on_drag_start: callbacks.contains(CallbackSet::DRAG_START),
        has_on_drag_stop: callbacks.contains(CallbackSet::DRAG_STOP),
    }
}

/// Fresh map layering registry-collected constraints over the
/// container-declared ones. Built immutably so the compiled snapshot
/// never aliases live registry state.
fn merge_tracks(declared: &BTreeMap<u32, u32>, registered: &BTreeMap<u32, u32>) -> BTreeMap<u32, u32> {
    let mut merged = declared.clone();
    for (&track, &size) in registered {
        merged.insert(track, size);
    }
    merged
}
