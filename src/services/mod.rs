pub mod bucketer;
pub mod calendar;
pub mod gap_analyzer;
pub mod lane_packer;
pub mod stats;
pub mod timeline_engine;

pub use timeline_engine::{EngineOptions, TimelineEngine, TimelineView};
