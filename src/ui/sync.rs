//! Systems for syncing Bevy entities with simulation state

use bevy::prelude::*;
use std::collections::HashSet;

use super::components::{EntityMappings, HudText, SegmentLink, SimWorldResource, TrainLink};
use super::spawner::{spawn_segment_visual, to_vec3};
use crate::simulation::{GameMode, SegmentId, SignalAspect};

/// System to run simulation tick
pub fn tick_simulation(time: Res<Time>, mut sim_world: ResMut<SimWorldResource>) {
    sim_world.0.tick(time.delta());
}

/// System to spawn and despawn segment visuals as the builder edits the track
pub fn sync_segments(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_world: Res<SimWorldResource>,
    mut mappings: ResMut<EntityMappings>,
    segment_query: Query<(Entity, &SegmentLink)>,
) {
    let track = &sim_world.0.track;
    let mut existing: HashSet<SegmentId> = HashSet::new();

    for (entity, link) in segment_query.iter() {
        if track.segment(link.0).is_some() {
            existing.insert(link.0);
        } else {
            commands.entity(entity).despawn();
            mappings.segments.remove(&link.0);
        }
    }

    for segment in track.segments() {
        if !existing.contains(&segment.id()) {
            let entity = spawn_segment_visual(&mut commands, &mut meshes, &mut materials, segment);
            mappings.segments.insert(segment.id(), entity);
        }
    }
}

/// System to move the train body to the simulated position and heading
pub fn sync_train(
    sim_world: Res<SimWorldResource>,
    mut train_query: Query<&mut Transform, With<TrainLink>>,
) {
    let train = &sim_world.0.train;
    for mut transform in train_query.iter_mut() {
        transform.translation = to_vec3(&train.position()) + Vec3::Y * 1.75;
        transform.rotation = Quat::from_rotation_y(train.heading());
    }
}

/// System to draw stations and signals with gizmos
pub fn draw_track_details(sim_world: Res<SimWorldResource>, mut gizmos: Gizmos) {
    for segment in sim_world.0.track.segments() {
        for (pos, _) in segment.station_positions() {
            let base = to_vec3(&pos);
            gizmos.linestrip(
                [
                    base + Vec3::new(-3.0, 0.2, -3.0),
                    base + Vec3::new(3.0, 0.2, -3.0),
                    base + Vec3::new(3.0, 0.2, 3.0),
                    base + Vec3::new(-3.0, 0.2, 3.0),
                    base + Vec3::new(-3.0, 0.2, -3.0),
                ],
                Color::srgb(0.3, 0.6, 1.0),
            );
        }

        for (pos, signal) in segment.signal_positions() {
            let color = match signal.aspect {
                SignalAspect::Red => Color::srgb(1.0, 0.0, 0.0),
                SignalAspect::Yellow => Color::srgb(1.0, 0.8, 0.0),
                SignalAspect::Green => Color::srgb(0.0, 1.0, 0.0),
            };
            let base = to_vec3(&pos);
            gizmos.line(base, base + Vec3::Y * 6.0, color);
        }
    }
}

/// System to update the dashboard text
pub fn update_hud(
    sim_world: Res<SimWorldResource>,
    mut text_query: Query<(&HudText, &mut Text)>,
) {
    let world = &sim_world.0;
    let dashboard = world.dashboard();

    for (kind, mut text) in text_query.iter_mut() {
        match kind {
            HudText::Speed => {
                **text = format!(
                    "Speed: {} km/h (lever {})",
                    dashboard.speed_kmh,
                    world.controls.setting()
                );
            }
            HudText::Distance => {
                **text = format!("Distance: {:.1} km", dashboard.distance_km);
            }
            HudText::NextSignal => {
                **text = match world.last_signal() {
                    Some(signal) => {
                        format!("Next signal: {} in {:.0} m", signal.aspect, signal.distance)
                    }
                    None => "Next signal: none".to_string(),
                };
            }
            HudText::Mode => {
                **text = match world.mode() {
                    GameMode::Drive if world.is_running() => "Mode: drive".to_string(),
                    GameMode::Drive => "Mode: drive (press Enter to start)".to_string(),
                    GameMode::Build => format!(
                        "Mode: build {:?}{} ({:?})",
                        world.builder.mode(),
                        if world.builder.is_delete_mode() { " [delete]" } else { "" },
                        world.builder.kind()
                    ),
                };
            }
        }
    }
}
