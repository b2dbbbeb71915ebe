//! # Revolve Core
//!
//! Headless engine for infinitely rotating carousels (sliders).
//!
//! ## Overview
//!
//! `revolve-core` owns everything about a slider except drawing it:
//!
//! - **Config Store**: single owner of the slider configuration and item
//!   collection, publishing one aggregate change per effective merge
//! - **Geometry**: item and group widths derived from the wrapper width
//! - **Pagination**: fixed-size pages built from the item collection
//! - **Position Tracking**: slot recycling that keeps the loop seamless
//!   without re-rendering
//! - **Cycle Scheduling**: handle-checked repeating timer with hover pause
//! - **Controller**: debounced async actor that ties the pieces together and
//!   emits page notifications
//!
//! The host implements [`ViewportSurface`]: it measures the viewport, mounts
//! what a [`LayoutPlan`] asks for, resizes mounted elements when told of a new
//! [`Geometry`] and applies translate offsets to the handles it returned.
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use revolve_core::{
//!     ConfigStore, ControllerSettings, Direction, Geometry, LayoutPlan,
//!     SliderController, SliderEvent, TransformTarget, ViewportSurface,
//! };
//!
//! struct Track {
//!     width: f64,
//!     mounted: usize,
//! }
//!
//! impl ViewportSurface for Track {
//!     type Item = String;
//!     type Handle = usize;
//!
//!     fn viewport_width(&self) -> f64 {
//!         self.width
//!     }
//!
//!     fn mount(&mut self, plan: &LayoutPlan<'_, String>) {
//!         self.mounted = plan.sequence.len();
//!     }
//!
//!     fn mounted_elements(&self) -> Vec<usize> {
//!         (0..self.mounted).collect()
//!     }
//!
//!     fn apply_geometry(&mut self, _geometry: &Geometry) {}
//!
//!     fn apply_transform(
//!         &mut self,
//!         _target: TransformTarget<'_, usize>,
//!         _percent: f64,
//!     ) {
//!     }
//! }
//!
//! async fn run() -> revolve_core::Result<()> {
//!     let store = Arc::new(ConfigStore::default());
//!     store.set_items(vec![
//!         "one".to_string(),
//!         "two".into(),
//!         "three".into(),
//!         "four".into(),
//!     ]);
//!
//!     let handle = SliderController::spawn(
//!         Track { width: 900.0, mounted: 0 },
//!         Arc::clone(&store),
//!         ControllerSettings::default(),
//!     );
//!     let mut events = handle.subscribe();
//!
//!     handle.turn(Direction::Left).await?;
//!     if let Ok(SliderEvent::CurrentPageChanged(page)) = events.recv().await {
//!         println!("now showing page {page}");
//!     }
//!     handle.shutdown().await
//! }
//! ```

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod pagination;
pub mod registry;
pub mod scheduler;
pub mod store;
pub mod surface;
pub mod tracker;

pub use config::{
    ConfigChange, ConfigFields, Direction, PartialSliderConfig, SliderConfig,
};
pub use controller::{ControllerSettings, SliderController, SliderHandle};
pub use engine::{LayoutOutcome, SliderEngine};
pub use error::{ConfigError, Result, SliderError};
pub use events::{SliderEvent, SliderEventBus};
pub use geometry::{Geometry, compute_geometry};
pub use pagination::{Page, build_pages, pages_quantity};
pub use registry::SliderRegistry;
pub use scheduler::{CycleScheduler, CycleTimer, SchedulerState, TimerHandle};
pub use store::{ConfigStore, OptionsView, StoreEvent, StoreSnapshot};
pub use surface::{ActiveSequence, LayoutPlan, TransformTarget, ViewportSurface};
pub use tracker::{Advance, PositionTracker, SlotState};
