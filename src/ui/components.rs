//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;
use std::collections::HashMap;

use crate::simulation::{Position, SegmentId, SimWorld};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

/// Marker component for ground plane
#[derive(Component)]
pub struct Ground;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Links a Bevy entity to a simulation track segment
#[derive(Component)]
pub struct SegmentLink(pub SegmentId);

/// Marker for the train body
#[derive(Component)]
pub struct TrainLink;

/// Resource to track Bevy entities mapped to simulation entities
#[derive(Resource, Default)]
pub struct EntityMappings {
    pub segments: HashMap<SegmentId, Entity>,
}

/// Ground-plane point under the mouse cursor
#[derive(Resource, Default)]
pub struct CursorState {
    pub ground: Option<Position>,
}

/// Dashboard text elements
#[derive(Component)]
pub enum HudText {
    Speed,
    Distance,
    NextSignal,
    Mode,
}
