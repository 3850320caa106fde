//! Systems for spawning visual entities from simulation state

use bevy::prelude::*;

use super::components::{EntityMappings, HudText, SegmentLink, SimWorldResource, TrainLink};
use crate::simulation::{Position, TrackSegment};

/// Samples per arc when building its bed mesh
const ARC_PIECES: usize = 24;

const TRACK_BED_WIDTH: f32 = 2.5;

pub(super) fn to_vec3(pos: &Position) -> Vec3 {
    Vec3::new(pos.x, pos.y, pos.z)
}

/// System to create initial visual entities from simulation state
pub fn spawn_initial_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_world: Res<SimWorldResource>,
    mut mappings: ResMut<EntityMappings>,
) {
    let world = &sim_world.0;

    for segment in world.track.segments() {
        let entity = spawn_segment_visual(&mut commands, &mut meshes, &mut materials, segment);
        mappings.segments.insert(segment.id(), entity);
    }

    let train = &world.train;
    commands.spawn((
        TrainLink,
        Mesh3d(meshes.add(Cuboid::new(3.0, 3.5, train.config().length))),
        MeshMaterial3d(materials.add(Color::srgb(0.8, 0.2, 0.2))),
        Transform::from_translation(to_vec3(&train.position()) + Vec3::Y * 1.75)
            .with_rotation(Quat::from_rotation_y(train.heading())),
    ));
}

/// Spawn the bed of one segment as a chain of flat cuboids
pub fn spawn_segment_visual(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    segment: &TrackSegment,
) -> Entity {
    let material = materials.add(Color::srgb(0.35, 0.3, 0.25));
    let points = segment.sample_points(ARC_PIECES);

    commands
        .spawn((SegmentLink(segment.id()), Transform::default(), Visibility::default()))
        .with_children(|parent| {
            for pair in points.windows(2) {
                let length = pair[0].distance(&pair[1]);
                if length <= f32::EPSILON {
                    continue;
                }
                let midpoint = pair[0].midpoint(&pair[1]);
                parent.spawn((
                    Mesh3d(meshes.add(Cuboid::new(TRACK_BED_WIDTH, 0.1, length))),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(to_vec3(&midpoint))
                        .with_rotation(Quat::from_rotation_y(pair[0].angle_to(&pair[1]))),
                ));
            }
        })
        .id()
}

/// System to setup the dashboard text
pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Auto,
                height: Val::Auto,
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(5.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|parent| {
            for (kind, label) in [
                (HudText::Speed, "Speed: 0 km/h"),
                (HudText::Distance, "Distance: 0.0 km"),
                (HudText::NextSignal, "Next signal: none"),
                (HudText::Mode, "Mode: drive"),
            ] {
                parent.spawn((
                    Text::new(label),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.9, 0.9, 0.9)),
                    kind,
                ));
            }
        });
}
