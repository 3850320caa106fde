//! Input handling systems
//!
//! Keys and clicks are translated into calls on the simulation world; the
//! simulation itself knows nothing about input devices.

use bevy::prelude::*;

use super::components::{CursorState, MainCamera, SimWorldResource};
use super::spawner::to_vec3;
use crate::simulation::{BuildMode, BuildOutcome, GameMode, Position};

/// Handle driving keys, mode switches and exit
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim_world: ResMut<SimWorldResource>,
    mut exit: MessageWriter<AppExit>,
) {
    let world = &mut sim_world.0;

    if keyboard.just_pressed(KeyCode::KeyB) {
        world.set_mode(GameMode::Build);
    }
    if keyboard.just_pressed(KeyCode::KeyD) {
        world.set_mode(GameMode::Drive);
    }

    match world.mode() {
        GameMode::Drive => {
            if keyboard.just_pressed(KeyCode::Enter) {
                world.start();
            }
            if keyboard.just_pressed(KeyCode::Backspace) {
                world.stop();
            }
            if keyboard.just_pressed(KeyCode::ArrowUp) {
                world.increase_speed();
            }
            if keyboard.just_pressed(KeyCode::ArrowDown) {
                world.decrease_speed();
            }
            if keyboard.just_pressed(KeyCode::Space) {
                world.emergency_brake();
            }
            if keyboard.just_pressed(KeyCode::Escape) {
                exit.write(AppExit::Success);
            }
        }
        GameMode::Build => {
            if keyboard.just_pressed(KeyCode::Escape) {
                world.builder.cancel();
            }
        }
    }
}

/// Handle building tool keys
pub fn handle_build_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim_world: ResMut<SimWorldResource>,
) {
    let builder = &mut sim_world.0.builder;
    if !builder.is_active() {
        return;
    }

    if keyboard.just_pressed(KeyCode::Digit1) {
        builder.set_mode(BuildMode::Track);
    }
    if keyboard.just_pressed(KeyCode::Digit2) {
        builder.set_mode(BuildMode::Station);
    }
    if keyboard.just_pressed(KeyCode::Digit3) {
        builder.set_mode(BuildMode::Signal);
    }
    if keyboard.just_pressed(KeyCode::KeyX) {
        builder.toggle_delete_mode();
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        builder.toggle_track_kind();
    }
}

/// System to update cursor position on ground plane
pub fn update_cursor_position(
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut cursor: ResMut<CursorState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let Some(cursor_position) = window.cursor_position() else {
        cursor.ground = None;
        return;
    };

    // Cast ray from camera through cursor position
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_position) else {
        return;
    };

    // Find intersection with ground plane (y = 0)
    let Some(distance) = ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y)) else {
        return;
    };

    let world_position = ray.get_point(distance);
    cursor.ground = Some(Position::new(world_position.x, 0.0, world_position.z));
}

/// Forward left clicks to the building tool
pub fn handle_build_click(
    mouse: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorState>,
    mut sim_world: ResMut<SimWorldResource>,
) {
    if !mouse.just_pressed(MouseButton::Left) || sim_world.0.mode() != GameMode::Build {
        return;
    }
    let Some(point) = cursor.ground else {
        return;
    };

    match sim_world.0.build_click(point) {
        Ok(BuildOutcome::Nothing) => {}
        Ok(outcome) => bevy::log::info!("Build: {:?}", outcome),
        Err(e) => bevy::log::warn!("Build click at {} rejected: {}", point, e),
    }
}

/// Draw the piece the next click would create
pub fn draw_build_preview(
    sim_world: Res<SimWorldResource>,
    cursor: Res<CursorState>,
    mut gizmos: Gizmos,
) {
    let Some(point) = cursor.ground else {
        return;
    };
    let preview = sim_world.0.builder.preview(&point);
    if preview.len() > 1 {
        gizmos.linestrip(
            preview.iter().map(|pos| to_vec3(pos) + Vec3::Y * 0.2),
            Color::srgb(0.0, 1.0, 0.0),
        );
    }
}
