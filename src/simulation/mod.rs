//! Standalone railway simulation module
//!
//! This module contains all the core track geometry and train dynamics that
//! run independently of the Bevy game engine. It can be tested via console
//! without needing to boot up the full game.

mod builder;
mod controls;
mod error;
mod segment;
mod track;
mod train;
mod types;
mod world;

pub use builder::{arc_through, BuildMode, BuildOutcome, TrackBuilder, TrackKind, NEW_STATION_NAME};
pub use controls::{DriverControls, LEVER_MAX, LEVER_STEP};
pub use error::{TrackError, TrackResult};
pub use segment::{SegmentGeometry, SegmentSpec, Signal, Station, TrackSegment};
pub use track::{SignalSighting, Track};
pub use train::{Train, TrainConfig, TrainState};
pub use types::{
    Direction, Position, SegmentId, SignalAspect, AUTO_BRAKE_DISTANCE, GRAVITY, KMH_TO_MS,
    MS_TO_KMH, PICK_THRESHOLD, STEERING_BLEND,
};
pub use world::{Dashboard, GameMode, SimWorld, MAX_MAP_CELLS};
