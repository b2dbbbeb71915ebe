//! Settings loading for Revolve sliders.
//!
//! Reads [`SliderSettings`] from a TOML or JSON file, inline JSON or the
//! defaults, applies per-field `REVOLVE_*` environment overrides, and
//! validates the result before handing it to
//! [`revolve_core::SliderController`]. Also hosts the tracing subscriber
//! setup shared by binaries embedding the engine.

pub mod settings;
pub mod telemetry;
pub mod util;

pub use settings::{SettingsError, SettingsSource, SliderSettings};
pub use telemetry::{DEFAULT_DIRECTIVES, init_tracing};
