//! Grid Container - Orchestration of registries, options, and interop.
//!
//! The container owns the two axis registries and the interop
//! coordinator. Child gutters register through [`add_row`] /
//! [`add_column`] during their own mount; the host drives the lifecycle
//! through [`on_after_render`] (initialise exactly once, on first
//! render) and [`destroy`] (teardown, after which stray child calls are
//! silent no-ops).
//!
//! `refresh` is a render request only: it bumps the reactive render
//! epoch and never touches interop state. Hosts that render inside a
//! `spark_signals::effect` re-render on the bump.
//!
//! [`add_row`]: GridContainer::add_row
//! [`add_column`]: GridContainer::add_column
//! [`on_after_render`]: GridContainer::on_after_render
//! [`destroy`]: GridContainer::destroy

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{Signal, signal};
use tracing::debug;

use crate::engine::ResizeEngine;
use crate::interop::{DragCallbacks, InteropCoordinator};
use crate::options::{GridProps, compile};
use crate::registry::AxisRegistry;
use crate::types::{Axis, GridError, GutterItem, TrackConstraints};

thread_local! {
    /// Counter for generated container element ids.
    static CONTAINER_ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };
}

fn next_element_id() -> String {
    CONTAINER_ID_COUNTER.with(|counter| {
        let mut counter = counter.borrow_mut();
        let id = format!("split-grid-{}", *counter);
        *counter += 1;
        id
    })
}

// =============================================================================
// Grid Container
// =============================================================================

/// One resizable grid: two axis registries, one interop coordinator,
/// one engine instance over its whole lifetime.
///
/// Children hold an `Rc` back-reference (explicit context passing);
/// the container is the exclusive owner of everything else.
pub struct GridContainer {
    element_id: String,
    props: GridProps,
    rows: RefCell<AxisRegistry>,
    columns: RefCell<AxisRegistry>,
    coordinator: RefCell<InteropCoordinator>,
    render_epoch: Signal<u64>,
    epochs: Cell<u64>,
    initialised: Cell<bool>,
    disposed: Cell<bool>,
}

impl GridContainer {
    pub fn new(engine: Box<dyn ResizeEngine>, props: GridProps) -> Rc<Self> {
        let element_id = props.id.clone().unwrap_or_else(next_element_id);
        Rc::new(Self {
            element_id,
            props,
            rows: RefCell::new(AxisRegistry::new(Axis::Row)),
            columns: RefCell::new(AxisRegistry::new(Axis::Column)),
            coordinator: RefCell::new(InteropCoordinator::new(engine)),
            render_epoch: signal(0),
            epochs: Cell::new(0),
            initialised: Cell::new(false),
            disposed: Cell::new(false),
        })
    }

    /// Stable identity of the container element, handed to the engine.
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn props(&self) -> &GridProps {
        &self.props
    }

    /// Container styling hook.
    pub fn class_name(&self) -> &'static str {
        "split-grid"
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    // =========================================================================
    // Host Lifecycle
    // =========================================================================

    /// Host render hook. Initialisation happens exactly once, on the
    /// first render; later renders change nothing here.
    pub fn on_after_render(&self, first_render: bool) -> Result<(), GridError> {
        if first_render && !self.initialised.get() {
            self.initialise()?;
        }
        Ok(())
    }

    /// Compile the current parameters and registry snapshots and bring
    /// the engine up. Gutters that mounted before this ran are part of
    /// the snapshot; the coordinator's own guard keeps an accidental
    /// second call from creating a second engine.
    pub fn initialise(&self) -> Result<(), GridError> {
        if self.disposed.get() {
            return Ok(());
        }

        let (options, row_snapshot, column_snapshot) = {
            let rows = self.rows.borrow();
            let columns = self.columns.borrow();
            (compile(&self.props, &rows, &columns), rows.values(), columns.values())
        };

        let callbacks = DragCallbacks {
            on_drag: self.props.on_drag.clone(),
            on_drag_start: self.props.on_drag_start.clone(),
            on_drag_stop: self.props.on_drag_stop.clone(),
        };

        self.coordinator.borrow_mut().initialize(
            &self.element_id,
            row_snapshot,
            column_snapshot,
            &options,
            callbacks,
        )?;
        self.initialised.set(true);

        debug!(element = %self.element_id, "grid container initialised");
        Ok(())
    }

    /// Request a re-render. Never touches interop state.
    pub fn refresh(&self) {
        let epoch = self.epochs.get() + 1;
        self.epochs.set(epoch);
        self.render_epoch.set(epoch);
    }

    /// Reactive render-request counter. Reading it from an effect
    /// subscribes the effect to [`refresh`] calls.
    ///
    /// [`refresh`]: GridContainer::refresh
    pub fn render_epoch(&self) -> u64 {
        self.render_epoch.get()
    }

    /// Tear down the coordinator and mark the container disposed. Stray
    /// child calls afterwards become silent no-ops. Idempotent.
    pub fn destroy(&self, immediate: bool) -> Result<(), GridError> {
        if self.disposed.get() {
            return Ok(());
        }
        self.disposed.set(true);
        debug!(element = %self.element_id, "grid container destroyed");
        self.coordinator.borrow_mut().destroy(immediate)
    }

    // =========================================================================
    // Gutter Registration (used by child Gutter components)
    // =========================================================================

    /// Register a row gutter: allocate its track and synchronize the
    /// engine. Returns `Ok(None)` once the container is disposed.
    pub fn add_row(
        &self,
        identity: &str,
        constraints: TrackConstraints,
    ) -> Result<Option<GutterItem>, GridError> {
        self.add_gutter_on(Axis::Row, identity, constraints)
    }

    /// Register a column gutter. See [`add_row`].
    ///
    /// [`add_row`]: GridContainer::add_row
    pub fn add_column(
        &self,
        identity: &str,
        constraints: TrackConstraints,
    ) -> Result<Option<GutterItem>, GridError> {
        self.add_gutter_on(Axis::Column, identity, constraints)
    }

    /// Remove a row gutter by identity and synchronize the engine.
    /// Unknown identities and disposed containers are silent no-ops.
    pub fn remove_row(&self, identity: &str, immediate: bool) -> Result<(), GridError> {
        self.remove_gutter_on(Axis::Row, identity, immediate)
    }

    /// Remove a column gutter by identity. See [`remove_row`].
    ///
    /// [`remove_row`]: GridContainer::remove_row
    pub fn remove_column(&self, identity: &str, immediate: bool) -> Result<(), GridError> {
        self.remove_gutter_on(Axis::Column, identity, immediate)
    }

    fn add_gutter_on(
        &self,
        axis: Axis,
        identity: &str,
        constraints: TrackConstraints,
    ) -> Result<Option<GutterItem>, GridError> {
        if self.disposed.get() {
            return Ok(None);
        }

        let item = self.registry(axis).borrow_mut().register(identity, constraints)?;
        // Before initialise this is tolerated as a no-op; the gutter
        // still rides in on the initialisation snapshot.
        self.coordinator
            .borrow_mut()
            .add_gutter(axis, identity, item.track)?;
        Ok(Some(item))
    }

    fn remove_gutter_on(&self, axis: Axis, identity: &str, immediate: bool) -> Result<(), GridError> {
        if self.disposed.get() {
            return Ok(());
        }

        let removed = self.registry(axis).borrow_mut().unregister(identity);
        let Some(item) = removed else {
            return Ok(());
        };
        self.coordinator
            .borrow_mut()
            .remove_gutter(axis, identity, item.track, immediate)
    }

    fn registry(&self, axis: Axis) -> &RefCell<AxisRegistry> {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    // =========================================================================
    // Interop Passthroughs
    // =========================================================================
    //
    // Direct engine synchronization for callers that manage identity and
    // track themselves. All of these are silent no-ops unless the
    // coordinator is live.

    pub fn add_row_gutter(&self, identity: &str, track: u32) -> Result<(), GridError> {
        self.coordinator.borrow_mut().add_gutter(Axis::Row, identity, track)
    }

    pub fn add_column_gutter(&self, identity: &str, track: u32) -> Result<(), GridError> {
        self.coordinator.borrow_mut().add_gutter(Axis::Column, identity, track)
    }

    pub fn remove_row_gutter(
        &self,
        identity: &str,
        track: u32,
        immediate: bool,
    ) -> Result<(), GridError> {
        self.coordinator
            .borrow_mut()
            .remove_gutter(Axis::Row, identity, track, immediate)
    }

    pub fn remove_column_gutter(
        &self,
        identity: &str,
        track: u32,
        immediate: bool,
    ) -> Result<(), GridError> {
        self.coordinator
            .borrow_mut()
            .remove_gutter(Axis::Column, identity, track, immediate)
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Snapshot of the live row gutters.
    pub fn row_gutters(&self) -> Vec<GutterItem> {
        self.rows.borrow().values()
    }

    /// Snapshot of the live column gutters.
    pub fn column_gutters(&self) -> Vec<GutterItem> {
        self.columns.borrow().values()
    }

    /// Reactive revision of one axis's gutter set.
    pub fn revision(&self, axis: Axis) -> u64 {
        self.registry(axis).borrow().revision()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::engine::test_support::{EngineCall, RecordingEngine};
    use crate::types::DragPayload;

    fn container_with_engine(props: GridProps) -> (Rc<GridContainer>, RecordingEngine) {
        let engine = RecordingEngine::new();
        let probe = engine.probe();
        (GridContainer::new(Box::new(engine), props), probe)
    }

    #[test]
    fn test_first_render_initialises_exactly_once() {
        let (container, probe) = container_with_engine(GridProps::default());

        container.on_after_render(true).unwrap();
        container.on_after_render(false).unwrap();
        container.on_after_render(false).unwrap();

        assert!(container.is_initialised());
        assert_eq!(probe.created.get(), 1);

        // Even a stray manual initialise cannot create a second engine.
        container.initialise().unwrap();
        assert_eq!(probe.created.get(), 1);
    }

    #[test]
    fn test_premount_gutters_ride_the_initialisation_snapshot() {
        let (container, probe) = container_with_engine(GridProps {
            row_min_sizes: std::collections::BTreeMap::new(),
            ..Default::default()
        });

        // Children mount before the first render completes.
        let g1 = container.add_row("g1", TrackConstraints::min(50)).unwrap().unwrap();
        let g2 = container.add_row("g2", TrackConstraints::none()).unwrap().unwrap();
        assert_eq!((g1.track, g2.track), (1, 2));

        // No engine traffic yet: the coordinator is not live.
        assert!(probe.call_log().is_empty());

        container.on_after_render(true).unwrap();

        let log = probe.call_log();
        let EngineCall::Create { rows, options, .. } = &log[0] else {
            panic!("expected Create, got {:?}", log[0]);
        };
        let mut rows = rows.clone();
        rows.sort_by_key(|item| item.track);
        assert_eq!(rows, vec![GutterItem::new("g1", 1), GutterItem::new("g2", 2)]);
        assert_eq!(options.row_min_sizes.get(&1), Some(&50));
        assert_eq!(options.row_min_sizes.len(), 1);
    }

    #[test]
    fn test_postinit_registration_synchronizes_engine() {
        let (container, probe) = container_with_engine(GridProps::default());
        container.on_after_render(true).unwrap();

        let item = container
            .add_column("c1", TrackConstraints::none())
            .unwrap()
            .unwrap();
        assert_eq!(item.track, 1);
        assert_eq!(
            *probe.call_log().last().unwrap(),
            EngineCall::AddGutter {
                axis: Axis::Column,
                identity: "c1".to_string(),
                track: 1,
            }
        );

        container.remove_column("c1", true).unwrap();
        assert_eq!(
            *probe.call_log().last().unwrap(),
            EngineCall::RemoveGutter {
                axis: Axis::Column,
                identity: "c1".to_string(),
                track: 1,
                immediate: true,
            }
        );
    }

    #[test]
    fn test_removing_unknown_identity_is_a_noop() {
        let (container, probe) = container_with_engine(GridProps::default());
        container.on_after_render(true).unwrap();
        let before = probe.call_log().len();

        container.remove_row("never-mounted", true).unwrap();
        assert_eq!(probe.call_log().len(), before);
    }

    #[test]
    fn test_duplicate_identity_propagates_contract_violation() {
        let (container, _probe) = container_with_engine(GridProps::default());

        container.add_row("g1", TrackConstraints::none()).unwrap();
        let err = container.add_row("g1", TrackConstraints::none()).unwrap_err();
        assert!(matches!(err, GridError::DuplicateGutter { axis: Axis::Row, .. }));
    }

    #[test]
    fn test_drag_callbacks_are_forwarded() {
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let last: Rc<RefCell<Option<DragPayload>>> = Rc::new(RefCell::new(None));
        let last_clone = last.clone();

        let (container, probe) = container_with_engine(GridProps {
            on_drag: Some(Rc::new(move |payload| {
                hits_clone.set(hits_clone.get() + 1);
                *last_clone.borrow_mut() = Some(payload.clone());
            })),
            ..Default::default()
        });
        container.on_after_render(true).unwrap();

        let payload = serde_json::json!({ "direction": "row", "track": 1 });
        probe.events.drag.emit(&payload);

        assert_eq!(hits.get(), 1);
        assert_eq!(last.borrow().as_ref(), Some(&payload));

        // The compiled options told the engine which channels matter.
        let log = probe.call_log();
        let EngineCall::Create { options, .. } = &log[0] else {
            panic!("expected Create");
        };
        assert!(options.has_on_drag);
        assert!(!options.has_on_drag_start);
    }

    #[test]
    fn test_destroy_makes_child_calls_noops() {
        let (container, probe) = container_with_engine(GridProps::default());
        container.add_row("g1", TrackConstraints::none()).unwrap();
        container.on_after_render(true).unwrap();

        container.destroy(true).unwrap();
        assert!(container.is_disposed());
        assert_eq!(*probe.call_log().last().unwrap(), EngineCall::Destroy { immediate: true });
        let after_destroy = probe.call_log().len();

        // Stray child traffic after teardown: tolerated, invisible.
        assert!(container.add_row("late", TrackConstraints::none()).unwrap().is_none());
        container.remove_row("g1", true).unwrap();
        container.destroy(false).unwrap();
        assert_eq!(probe.call_log().len(), after_destroy);
    }

    #[test]
    fn test_interop_passthroughs_forward_when_live() {
        let (container, probe) = container_with_engine(GridProps::default());

        // Not live yet: silently ignored.
        container.add_row_gutter("r9", 9).unwrap();
        assert!(probe.call_log().is_empty());

        container.on_after_render(true).unwrap();
        container.add_column_gutter("c9", 9).unwrap();
        container.remove_row_gutter("r9", 9, false).unwrap();
        container.remove_column_gutter("c9", 9, true).unwrap();

        let log = probe.call_log();
        assert_eq!(
            log[1],
            EngineCall::AddGutter {
                axis: Axis::Column,
                identity: "c9".to_string(),
                track: 9,
            }
        );
        assert_eq!(
            log[2],
            EngineCall::RemoveGutter {
                axis: Axis::Row,
                identity: "r9".to_string(),
                track: 9,
                immediate: false,
            }
        );
    }

    #[test]
    fn test_refresh_bumps_render_epoch_without_interop_traffic() {
        let (container, probe) = container_with_engine(GridProps::default());
        container.on_after_render(true).unwrap();
        let before = probe.call_log().len();

        assert_eq!(container.render_epoch(), 0);
        container.refresh();
        container.refresh();
        assert_eq!(container.render_epoch(), 2);
        assert_eq!(probe.call_log().len(), before);
    }

    #[test]
    fn test_generated_element_ids_are_unique() {
        let (a, _) = container_with_engine(GridProps::default());
        let (b, _) = container_with_engine(GridProps::default());
        assert_ne!(a.element_id(), b.element_id());

        let (c, _) = container_with_engine(GridProps {
            id: Some("my-grid".to_string()),
            ..Default::default()
        });
        assert_eq!(c.element_id(), "my-grid");
    }

    #[test]
    fn test_engine_failure_during_initialise_propagates() {
        let mut engine = RecordingEngine::new();
        engine.fail_create = true;
        let container = GridContainer::new(Box::new(engine), GridProps::default());

        let err = container.on_after_render(true).unwrap_err();
        assert!(matches!(err, GridError::Engine(_)));
        assert!(!container.is_initialised());
    }
}
