//! Track collection tests: segment bookkeeping, closest-segment lookup and signal sighting

use rail_sim::simulation::{
    Direction, Position, SegmentId, SegmentSpec, SignalAspect, Track, TrackError,
};

const EPS: f32 = 1e-3;

fn assert_pos_close(actual: Position, expected: Position) {
    assert!(
        actual.distance(&expected) <= EPS,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

fn main_line(aspect: SignalAspect) -> Track {
    let mut track = Track::new();
    track
        .add_segment(
            SegmentSpec::straight(
                Position::new(-100.0, 0.0, 0.0),
                Position::new(100.0, 0.0, 0.0),
            )
            .with_signal(0.9, aspect),
        )
        .unwrap();
    track
}

#[test]
fn test_empty_track_queries_return_none() {
    let track = Track::new();
    let origin = Position::new(0.0, 0.0, 0.0);

    assert!(track.is_empty());
    assert!(track.closest_segment(&origin).is_none());
    assert!(track.next_signal(&origin, &Direction::X).is_none());
    assert!(track.segment_near(&origin, 100.0).is_none());
}

#[test]
fn test_next_signal_scenario() {
    let track = main_line(SignalAspect::Red);

    let sighting = track
        .next_signal(&Position::new(-90.0, 0.0, 0.0), &Direction::X)
        .expect("signal ahead");

    assert_pos_close(sighting.position, Position::new(80.0, 0.0, 0.0));
    assert!((sighting.distance - 170.0).abs() <= EPS);
    assert_eq!(sighting.aspect, SignalAspect::Red);
    assert_eq!(sighting.segment, SegmentId(0));
}

#[test]
fn test_signal_behind_train_is_ignored() {
    let track = main_line(SignalAspect::Red);

    // Past the signal, still heading east
    assert!(track
        .next_signal(&Position::new(90.0, 0.0, 0.0), &Direction::X)
        .is_none());

    // Before the signal, but heading west
    assert!(track
        .next_signal(&Position::new(-90.0, 0.0, 0.0), &Direction::X.reverse())
        .is_none());
}

#[test]
fn test_next_signal_picks_nearest_ahead() {
    let mut track = Track::new();
    track
        .add_segment(
            SegmentSpec::straight(
                Position::new(-100.0, 0.0, 0.0),
                Position::new(100.0, 0.0, 0.0),
            )
            .with_signal(0.9, SignalAspect::Red)
            .with_signal(0.6, SignalAspect::Yellow)
            .with_signal(0.05, SignalAspect::Green),
        )
        .unwrap();

    let sighting = track
        .next_signal(&Position::new(-50.0, 0.0, 0.0), &Direction::X)
        .unwrap();
    assert_eq!(sighting.aspect, SignalAspect::Yellow);
    assert!((sighting.distance - 70.0).abs() <= EPS);
}

#[test]
fn test_next_signal_only_inspects_closest_segment() {
    let mut track = main_line(SignalAspect::Red);
    // A second, signal-free segment further along the same line
    track
        .add_segment(SegmentSpec::straight(
            Position::new(100.0, 0.0, 0.0),
            Position::new(300.0, 0.0, 0.0),
        ))
        .unwrap();

    // On the second segment the red signal behind is irrelevant and nothing lies ahead
    assert!(track
        .next_signal(&Position::new(200.0, 0.0, 0.0), &Direction::X)
        .is_none());
}

#[test]
fn test_closest_segment_prefers_first_on_tie() {
    let mut track = Track::new();
    let east_west = track
        .add_segment(SegmentSpec::straight(
            Position::new(-10.0, 0.0, 0.0),
            Position::new(10.0, 0.0, 0.0),
        ))
        .unwrap();
    let north_south = track
        .add_segment(SegmentSpec::straight(
            Position::new(0.0, 0.0, -10.0),
            Position::new(0.0, 0.0, 10.0),
        ))
        .unwrap();

    let at_crossing = track.closest_segment(&Position::new(0.0, 0.0, 0.0)).unwrap();
    assert_eq!(at_crossing.id(), east_west);

    let diagonal = track.closest_segment(&Position::new(5.0, 0.0, 5.0)).unwrap();
    assert_eq!(diagonal.id(), east_west);

    let near_north = track.closest_segment(&Position::new(1.0, 0.0, 9.0)).unwrap();
    assert_eq!(near_north.id(), north_south);
}

#[test]
fn test_add_then_remove_restores_track() {
    let mut track = Track::default_layout().unwrap();
    let before: Vec<_> = track.segments().to_vec();

    let id = track
        .add_segment(SegmentSpec::arc(Position::new(0.0, 0.0, 80.0), 15.0, 1.0))
        .unwrap();
    assert_eq!(track.segment_count(), before.len() + 1);

    let removed = track.remove_segment(id).expect("segment was added");
    assert_eq!(removed.id(), id);
    assert_eq!(track.segments(), before.as_slice());
}

#[test]
fn test_remove_unknown_segment_is_noop() {
    let mut track = Track::default_layout().unwrap();
    assert!(track.remove_segment(SegmentId(999)).is_none());
    assert_eq!(track.segment_count(), 3);

    // Removing twice only removes once
    assert!(track.remove_segment(SegmentId(1)).is_some());
    assert!(track.remove_segment(SegmentId(1)).is_none());
    assert_eq!(track.segment_count(), 2);
}

#[test]
fn test_rejected_segment_leaves_track_unchanged() {
    let mut track = Track::new();
    let p = Position::new(1.0, 0.0, 1.0);
    let result = track.add_segment(SegmentSpec::straight(p, p));

    assert!(matches!(result, Err(TrackError::InvalidGeometry { .. })));
    assert!(track.is_empty());

    // Ids are not consumed by rejected segments
    let id = track
        .add_segment(SegmentSpec::straight(p, Position::new(2.0, 0.0, 1.0)))
        .unwrap();
    assert_eq!(id, SegmentId(0));
}

#[test]
fn test_segment_mut_reports_unknown_ids() {
    let mut track = Track::new();
    assert_eq!(
        track.segment_mut(SegmentId(4)).err(),
        Some(TrackError::UnknownSegment(SegmentId(4)))
    );
}

#[test]
fn test_default_layout_contents() {
    let track = Track::default_layout().unwrap();

    assert_eq!(track.segment_count(), 3);
    assert_eq!(track.signal_count(), 3);

    let first = &track.segments()[0];
    assert_eq!(first.stations()[0].name, "Central Station");
    assert_eq!(first.signals()[0].aspect, SignalAspect::Green);

    let last = &track.segments()[2];
    assert_eq!(last.stations()[0].name, "North Station");
    assert_eq!(last.signals()[0].aspect, SignalAspect::Red);
}

#[test]
fn test_segment_near_respects_threshold() {
    let track = main_line(SignalAspect::Green);

    assert!(track
        .segment_near(&Position::new(0.0, 0.0, 1.0), 2.0)
        .is_some());
    assert!(track
        .segment_near(&Position::new(0.0, 0.0, 3.0), 2.0)
        .is_none());
}
