//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI reads state from `SimWorld` and renders it using Bevy's 3D graphics.

mod components;
mod input;
pub mod spawner;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::{EntityMappings, SimWorldResource};

use crate::simulation::{SimWorld, Track, TrainConfig};
use components::CursorState;
use input::{
    draw_build_preview, handle_build_click, handle_build_keyboard, handle_input,
    update_cursor_position,
};
use spawner::{setup_hud, spawn_initial_visuals};
use sync::{draw_track_details, sync_segments, sync_train, tick_simulation, update_hud};
use world::setup_world;

/// Plugin to register all UI systems
pub struct RailSimUIPlugin {
    pub train_config: TrainConfig,
}

impl Plugin for RailSimUIPlugin {
    fn build(&self, app: &mut App) {
        let world = match SimWorld::create_default_world_with(self.train_config.clone()) {
            Ok(world) => world,
            Err(e) => {
                bevy::log::error!("Falling back to an empty track: {:#}", e);
                SimWorld::new(Track::new(), self.train_config.clone())
            }
        };

        app.insert_resource(SimWorldResource(world))
            .init_resource::<EntityMappings>()
            .init_resource::<CursorState>()
            .add_systems(
                Startup,
                (
                    setup_world,
                    spawn_initial_visuals.after(setup_world),
                    setup_hud,
                ),
            )
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    handle_input,
                    handle_build_keyboard,
                    update_cursor_position,
                    handle_build_click.after(update_cursor_position),
                    sync_segments.after(handle_build_click),
                    sync_train,
                    draw_track_details,
                    draw_build_preview,
                    update_hud,
                ),
            );
    }
}
