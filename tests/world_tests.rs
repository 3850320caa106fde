//! Simulation world, driver controls and building tool tests

use std::f32::consts::PI;
use std::time::Duration;

use rail_sim::simulation::{
    arc_through, BuildMode, BuildOutcome, GameMode, Position, SegmentGeometry, SegmentId,
    SegmentSpec, SignalAspect, SimWorld, Track, TrackBuilder, TrackError, TrackKind,
    TrainConfig, LEVER_MAX, MAX_MAP_CELLS, NEW_STATION_NAME,
};

const FRAME: Duration = Duration::from_millis(100);

fn default_world() -> SimWorld {
    SimWorld::create_default_world().unwrap()
}

fn build_world(mode: BuildMode) -> SimWorld {
    let mut world = default_world();
    world.set_mode(GameMode::Build);
    world.builder.set_mode(mode);
    world
}

#[test]
fn test_tick_is_noop_until_started() {
    let mut world = default_world();
    world.set_speed(60);
    let start = world.train.position();

    for _ in 0..10 {
        world.tick(FRAME);
    }

    assert!(!world.is_running());
    assert_eq!(world.time, Duration::ZERO);
    assert_eq!(world.train.position(), start);
    assert!(world.last_signal().is_none());
}

#[test]
fn test_running_world_advances() {
    let mut world = default_world();
    world.start();
    world.set_speed(60);

    for _ in 0..50 {
        world.tick(FRAME);
    }

    assert!(world.is_running());
    assert_eq!(world.mode(), GameMode::Drive);
    assert_eq!(world.time, Duration::from_secs(5));
    assert!(world.train.speed() > 0.0);
    assert!(world.train.distance_traveled() > 0.0);

    let sighting = world.last_signal().expect("signal ahead on the first straight");
    assert_eq!(sighting.segment, SegmentId(0));
    assert_eq!(sighting.aspect, SignalAspect::Green);
}

#[test]
fn test_lever_steps_and_limits() {
    let mut world = default_world();

    world.increase_speed();
    world.increase_speed();
    assert_eq!(world.controls.setting(), 10);
    assert_eq!(world.train.target_speed(), 10.0);

    for _ in 0..30 {
        world.increase_speed();
    }
    assert_eq!(world.controls.setting(), LEVER_MAX);

    for _ in 0..30 {
        world.decrease_speed();
    }
    assert_eq!(world.controls.setting(), 0);
    assert_eq!(world.train.target_speed(), 0.0);

    world.set_speed(250);
    assert_eq!(world.controls.setting(), LEVER_MAX);
    assert_eq!(world.train.target_speed(), 100.0);
}

#[test]
fn test_emergency_brake_resets_lever() {
    let mut world = default_world();
    world.start();
    world.set_speed(80);
    for _ in 0..100 {
        world.tick(FRAME);
    }
    assert!(world.train.speed() > 0.0);

    world.emergency_brake();
    assert_eq!(world.controls.setting(), 0);
    assert_eq!(world.train.speed(), 0.0);
    assert_eq!(world.train.target_speed(), 0.0);
}

#[test]
fn test_stop_releases_lever() {
    let mut world = default_world();
    world.start();
    world.set_speed(40);
    world.stop();

    assert!(!world.is_running());
    assert_eq!(world.controls.setting(), 0);
    assert_eq!(world.train.target_speed(), 0.0);
}

#[test]
fn test_red_signal_auto_brake() {
    let mut track = Track::new();
    track
        .add_segment(
            SegmentSpec::straight(
                Position::new(-100.0, 0.0, 0.0),
                Position::new(100.0, 0.0, 0.0),
            )
            .with_signal(0.9, SignalAspect::Red),
        )
        .unwrap();

    let mut world = SimWorld::new(
        track,
        TrainConfig {
            start: Position::new(40.0, 0.0, 0.0),
            speed: 50.0,
            ..TrainConfig::default()
        },
    );
    world.start();
    world.set_speed(50);

    world.tick(FRAME);

    let sighting = world.last_signal().unwrap();
    assert_eq!(sighting.aspect, SignalAspect::Red);
    assert!(sighting.distance < 50.0);
    assert_eq!(world.controls.setting(), 45);
    assert_eq!(world.auto_brake_count(), 1);
}

#[test]
fn test_distant_red_signal_is_ignored() {
    let mut world = default_world();
    world.start();
    world.set_speed(60);
    world.tick(FRAME);

    assert_eq!(world.controls.setting(), 60);
    assert_eq!(world.auto_brake_count(), 0);
}

#[test]
fn test_build_mode_pauses_driving() {
    let mut world = default_world();
    world.start();
    world.set_speed(60);

    world.set_mode(GameMode::Build);
    assert_eq!(world.mode(), GameMode::Build);
    assert!(world.builder.is_active());
    assert!(!world.is_running());
    assert_eq!(world.controls.setting(), 0);

    world.set_mode(GameMode::Drive);
    assert!(!world.builder.is_active());
}

#[test]
fn test_inactive_builder_ignores_clicks() {
    let mut world = default_world();
    let outcome = world.build_click(Position::new(0.0, 0.0, 0.0)).unwrap();

    assert_eq!(outcome, BuildOutcome::Nothing);
    assert_eq!(world.track.segment_count(), 3);
}

#[test]
fn test_build_straight_segment() {
    let mut world = build_world(BuildMode::Track);

    let first = world.build_click(Position::new(0.0, 0.0, 50.0)).unwrap();
    assert_eq!(first, BuildOutcome::StartPlaced(Position::new(0.0, 0.0, 50.0)));
    assert_eq!(world.builder.pending_start(), Some(Position::new(0.0, 0.0, 50.0)));

    let second = world.build_click(Position::new(30.0, 0.0, 50.0)).unwrap();
    assert_eq!(second, BuildOutcome::SegmentAdded(SegmentId(3)));
    assert_eq!(world.builder.pending_start(), None);
    assert_eq!(world.track.segment_count(), 4);

    let segment = world.track.segment(SegmentId(3)).unwrap();
    assert!(segment.geometry().is_straight());
    assert!((segment.length() - 30.0).abs() < 1e-4);
}

#[test]
fn test_build_arc_segment() {
    let mut world = build_world(BuildMode::Track);
    world.builder.toggle_track_kind();
    assert_eq!(world.builder.kind(), TrackKind::Arc);

    world.build_click(Position::new(0.0, 0.0, 50.0)).unwrap();
    let outcome = world.build_click(Position::new(0.0, 0.0, 70.0)).unwrap();
    assert_eq!(outcome, BuildOutcome::SegmentAdded(SegmentId(3)));

    let segment = world.track.segment(SegmentId(3)).unwrap();
    match *segment.geometry() {
        SegmentGeometry::Arc {
            center,
            radius,
            sweep_angle,
        } => {
            assert!(center.distance(&Position::new(-10.0, 0.0, 60.0)) < 1e-4);
            assert!((radius - 10.0).abs() < 1e-4);
            assert_eq!(sweep_angle, PI);
        }
        other => panic!("expected an arc, got {:?}", other),
    }
}

#[test]
fn test_arc_through_endpoints() {
    let geometry = arc_through(&Position::new(0.0, 0.0, 0.0), &Position::new(0.0, 0.0, 20.0))
        .unwrap();
    assert_eq!(
        geometry,
        SegmentGeometry::arc(Position::new(-10.0, 0.0, 10.0), 10.0, PI)
    );

    let same = Position::new(5.0, 0.0, 5.0);
    assert!(matches!(
        arc_through(&same, &same),
        Err(TrackError::InvalidGeometry { .. })
    ));
}

#[test]
fn test_degenerate_piece_is_rejected() {
    let mut world = build_world(BuildMode::Track);

    world.build_click(Position::new(0.0, 0.0, 50.0)).unwrap();
    let result = world.build_click(Position::new(0.0, 0.0, 50.0));

    assert!(matches!(result, Err(TrackError::InvalidGeometry { .. })));
    assert_eq!(world.builder.pending_start(), None);
    assert_eq!(world.track.segment_count(), 3);
}

#[test]
fn test_place_station_on_segment() {
    let mut world = build_world(BuildMode::Station);

    let outcome = world.build_click(Position::new(0.0, 0.0, 1.0)).unwrap();
    assert_eq!(
        outcome,
        BuildOutcome::StationAdded {
            segment: SegmentId(0),
            fraction: 0.5,
        }
    );

    let stations = world.track.segment(SegmentId(0)).unwrap().stations();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[1].name, NEW_STATION_NAME);
    assert_eq!(stations[1].fraction, 0.5);
}

#[test]
fn test_place_signal_on_segment() {
    let mut world = build_world(BuildMode::Signal);

    let outcome = world.build_click(Position::new(50.0, 0.0, 0.5)).unwrap();
    assert_eq!(
        outcome,
        BuildOutcome::SignalAdded {
            segment: SegmentId(0),
            fraction: 0.75,
        }
    );

    let signals = world.track.segment(SegmentId(0)).unwrap().signals();
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[1].aspect, SignalAspect::Green);
    assert_eq!(world.track.signal_count(), 4);
}

#[test]
fn test_click_away_from_track_places_nothing() {
    let mut world = build_world(BuildMode::Station);

    let outcome = world.build_click(Position::new(0.0, 0.0, 30.0)).unwrap();
    assert_eq!(outcome, BuildOutcome::Nothing);
    assert_eq!(world.track.segment(SegmentId(0)).unwrap().stations().len(), 1);
}

#[test]
fn test_delete_segment_under_cursor() {
    let mut world = build_world(BuildMode::Track);
    world.builder.toggle_delete_mode();
    assert!(world.builder.is_delete_mode());

    let outcome = world.build_click(Position::new(0.0, 0.0, 0.0)).unwrap();
    assert_eq!(outcome, BuildOutcome::SegmentRemoved(SegmentId(0)));
    assert_eq!(world.track.segment_count(), 2);
    assert!(world.track.segment(SegmentId(0)).is_none());

    let miss = world.build_click(Position::new(0.0, 0.0, -40.0)).unwrap();
    assert_eq!(miss, BuildOutcome::Nothing);
}

#[test]
fn test_mode_changes_cancel_pending_start() {
    let mut builder = TrackBuilder::new();
    let mut track = Track::new();
    builder.activate();

    builder.click(Position::new(1.0, 0.0, 1.0), &mut track).unwrap();
    assert!(builder.pending_start().is_some());

    builder.set_mode(BuildMode::Signal);
    assert!(builder.pending_start().is_none());

    // Arc toggling only applies while laying track
    builder.toggle_track_kind();
    assert_eq!(builder.kind(), TrackKind::Straight);

    builder.set_mode(BuildMode::Track);
    builder.click(Position::new(1.0, 0.0, 1.0), &mut track).unwrap();
    builder.deactivate();
    assert!(builder.pending_start().is_none());
    assert!(!builder.is_active());
}

#[test]
fn test_preview_polylines() {
    let mut builder = TrackBuilder::new();
    let mut track = Track::new();
    let cursor = Position::new(20.0, 0.0, 0.0);

    assert!(builder.preview(&cursor).is_empty());

    builder.activate();
    builder.click(Position::new(0.0, 0.0, 0.0), &mut track).unwrap();
    assert_eq!(
        builder.preview(&cursor),
        vec![Position::new(0.0, 0.0, 0.0), cursor]
    );

    builder.toggle_track_kind();
    let arc = builder.preview(&cursor);
    assert_eq!(arc.len(), 51);
    assert!(arc.iter().all(|p| p.is_finite()));
}

#[test]
fn test_dashboard_values() {
    let world = SimWorld::new(
        Track::default_layout().unwrap(),
        TrainConfig {
            speed: 49.6,
            ..TrainConfig::default()
        },
    );

    let dashboard = world.dashboard();
    assert_eq!(dashboard.speed_kmh, 50.0);
    assert_eq!(dashboard.distance_km, 0.0);
    assert_eq!(dashboard.next_aspect, None);

    let mut world = default_world();
    world.start();
    world.tick(FRAME);
    assert_eq!(world.dashboard().next_aspect, Some(SignalAspect::Green));
}

#[test]
fn test_render_map_marks_layout() {
    let world = default_world();
    let map = world.render_map(5.0);

    assert!(map.contains('T'));
    assert!(map.contains('#'));
    assert!(map.contains('S'));
    assert!(map.contains('R'));
    assert!(map.contains('G'));
    assert_eq!(map.matches('T').count(), 1);
}

#[test]
fn test_invalid_train_config_is_rejected() {
    let result = SimWorld::create_default_world_with(TrainConfig {
        max_speed: -5.0,
        ..TrainConfig::default()
    });

    let error = result.err().expect("negative max speed accepted");
    assert!(
        matches!(
            error.downcast_ref::<TrackError>(),
            Some(TrackError::InvalidTrainConfig { .. })
        ),
        "{:#}",
        error
    );
}

#[test]
fn test_render_map_size_is_bounded() {
    let mut world = default_world();
    world
        .track
        .add_segment(SegmentSpec::straight(
            Position::new(0.0, 0.0, 0.0),
            Position::new(100_000.0, 0.0, 50_000.0),
        ))
        .unwrap();

    let map = world.render_map(1.0);
    let lines: Vec<&str> = map.lines().collect();

    assert!(lines.len() <= MAX_MAP_CELLS);
    assert!(lines.iter().all(|line| line.chars().count() <= MAX_MAP_CELLS));
    assert!(map.contains('#'));
    assert_eq!(map.matches('T').count(), 1);
}
