//! Water rejection for touch panels.
//!
//! Raw touch reports go through [`FilterEngine`], which drops contacts that
//! look like droplets, streaks, or splashes and passes deliberate touches on.
//! Everything is fixed-size and allocation-free so the filter can run inside
//! a firmware control loop.

#![cfg_attr(not(test), no_std)]

pub mod classify;
pub mod config;
pub mod filter;
pub mod gesture;
pub mod history;
pub mod types;
pub mod zones;

mod utils;

pub use config::{ConfigError, FilterConfig, CAPACITIVE_DEFAULTS, RESISTIVE_DEFAULTS};
pub use filter::{
    DebugInfo, FilterEngine, FilterStats, LifecycleTracker, TouchCallbacks, TouchEventHandler,
    TouchListener, RELEASE_TIMEOUT_MS,
};
pub use gesture::{GestureGate, GestureLimits, GesturePhase};
pub use history::{TouchHistory, HISTORY_CAPACITY};
pub use types::{
    BatchOutcome, FilterOutcome, PanelKind, RejectReason, ScreenSize, TouchEvent, TouchSample,
};
pub use zones::{ZoneCell, ZoneCoord, ZoneGrid, GRID_SIZE};
