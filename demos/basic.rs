//! Basic Example - Container, gutters, and a toy engine
//!
//! This example demonstrates basic usage of the spark-grid coordination
//! layer:
//! - Injecting a resize engine behind the `ResizeEngine` seam
//! - Mounting a container and declarative gutters
//! - Dynamic add/remove keeping the engine synchronized
//! - Drag telemetry flowing back through the structured callbacks
//!
//! Run with: cargo run --example basic

use std::rc::Rc;

use spark_grid::{
    Axis, EngineEvents, EngineHandle, GridContainer, GridError, GridOptions, GridProps, Gutter,
    GutterItem, GutterProps, ResizeEngine,
};

/// A stand-in engine that prints every call it receives. A real
/// implementation would drive pointer capture and track sizing here.
struct PrintingEngine {
    events: Rc<EngineEvents>,
}

struct PrintingHandle {
    events: Rc<EngineEvents>,
}

impl ResizeEngine for PrintingEngine {
    fn create(
        &mut self,
        element: &str,
        rows: Vec<GutterItem>,
        columns: Vec<GutterItem>,
        options: &GridOptions,
    ) -> Result<Box<dyn EngineHandle>, GridError> {
        println!("engine.create({element})");
        println!("  rows:    {} gutter(s)", rows.len());
        println!("  columns: {} gutter(s)", columns.len());
        println!("  options: {}", serde_json::Value::Object(options.to_interoperable()));
        Ok(Box::new(PrintingHandle {
            events: self.events.clone(),
        }))
    }
}

impl EngineHandle for PrintingHandle {
    fn add_gutter(&mut self, axis: Axis, identity: &str, track: u32) -> Result<(), GridError> {
        println!("engine.add_gutter({axis}, {identity}, track {track})");
        Ok(())
    }

    fn remove_gutter(
        &mut self,
        axis: Axis,
        identity: &str,
        track: u32,
        immediate: bool,
    ) -> Result<(), GridError> {
        println!("engine.remove_gutter({axis}, {identity}, track {track}, immediate {immediate})");
        Ok(())
    }

    fn destroy(&mut self, immediate: bool) -> Result<(), GridError> {
        println!("engine.destroy(immediate {immediate})");
        Ok(())
    }

    fn events(&self) -> Rc<EngineEvents> {
        self.events.clone()
    }
}

fn main() -> Result<(), GridError> {
    println!("=== spark-grid Basic Example ===\n");

    // Keep a second reference to the channels so we can play the engine
    // and emit drag telemetry by hand below.
    let events = Rc::new(EngineEvents::new());
    let engine = PrintingEngine {
        events: events.clone(),
    };

    let container = GridContainer::new(
        Box::new(engine),
        GridProps {
            min_size: Some(100),
            column_cursor: Some("col-resize".to_string()),
            on_drag: Some(Rc::new(|payload| println!("on_drag: {payload}"))),
            ..Default::default()
        },
    );

    // Gutters declared before the first render ride the initial
    // snapshot instead of individual add calls.
    let sidebar = Gutter::mount(
        container.clone(),
        Axis::Column,
        GutterProps {
            id: Some("sidebar".to_string()),
            min_size: Some(150),
            ..Default::default()
        },
    )?;
    println!("mounted {} -> {:?}\n", sidebar.identity(), sidebar.class_name());

    // First render brings the engine up.
    container.on_after_render(true)?;

    // A gutter mounted afterwards is synchronized individually.
    let footer = Gutter::mount(container.clone(), Axis::Row, GutterProps::default())?;
    println!("mounted {} at track {:?}", footer.identity(), footer.track());

    // Drag telemetry flows engine -> channel -> structured callback.
    events
        .drag
        .emit(&serde_json::json!({ "direction": "column", "track": 1, "gridTemplate": "150px 10px 1fr" }));

    // Unmounting tells the engine to drop the track.
    footer.unmount(true)?;

    container.destroy(true)?;
    println!("\n=== Example Complete ===");
    Ok(())
}
