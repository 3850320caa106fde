//! Scene setup: a camera and ground plane framed around the layout

use bevy::prelude::*;

use super::components::{Ground, MainCamera, SimWorldResource};
use super::spawner::to_vec3;

/// Extra ground around the layout, in meters
const GROUND_MARGIN: f32 = 150.0;

/// Center and extent of the layout on the ground plane
fn layout_bounds(sim: &SimWorldResource) -> (Vec3, f32) {
    let points: Vec<Vec3> = sim
        .0
        .track
        .segments()
        .iter()
        .flat_map(|segment| segment.sample_points(16))
        .chain(std::iter::once(sim.0.train.position()))
        .map(|p| to_vec3(&p))
        .collect();

    let min = points.iter().copied().fold(Vec3::splat(f32::INFINITY), Vec3::min);
    let max = points.iter().copied().fold(Vec3::splat(f32::NEG_INFINITY), Vec3::max);
    let center = Vec3::new((min.x + max.x) / 2.0, 0.0, (min.z + max.z) / 2.0);
    let extent = (max.x - min.x).max(max.z - min.z).max(50.0);
    (center, extent)
}

pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim: Res<SimWorldResource>,
) {
    let (center, extent) = layout_bounds(&sim);

    // High oblique view from the south
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Transform::from_translation(center + Vec3::new(0.0, extent, -extent * 0.6))
            .looking_at(center, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(40.0, 80.0, 40.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let size = extent + GROUND_MARGIN * 2.0;
    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        // Slightly below the rails so the sleepers do not z-fight
        Transform::from_translation(center - Vec3::Y * 0.05),
    ));
}
