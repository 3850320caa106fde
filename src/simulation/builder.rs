//! Track building tool
//!
//! Turns ground-plane clicks into track edits. Hit-testing goes through the
//! segment geometry queries (`is_near`, `closest_point`) so the tool never
//! carries its own copy of the curve math.

use log::{debug, warn};
use std::f32::consts::PI;

use super::error::{TrackError, TrackResult};
use super::segment::{SegmentGeometry, SegmentSpec, TrackSegment};
use super::track::Track;
use super::types::{Position, SegmentId, SignalAspect, PICK_THRESHOLD};

/// Samples used when previewing an arc
const ARC_PREVIEW_STEPS: usize = 50;

/// Name given to stations placed with the tool
pub const NEW_STATION_NAME: &str = "New Station";

/// What a click places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Track,
    Station,
    Signal,
}

/// Shape of the next track piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackKind {
    #[default]
    Straight,
    Arc,
}

/// Result of a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildOutcome {
    /// Tool inactive or no segment under the cursor
    Nothing,
    StartPlaced(Position),
    SegmentAdded(SegmentId),
    SegmentRemoved(SegmentId),
    StationAdded { segment: SegmentId, fraction: f32 },
    SignalAdded { segment: SegmentId, fraction: f32 },
}

/// Half-circle arc whose diameter runs from `start` to `end`.
///
/// The center sits on the left-hand perpendicular at half the chord length.
/// The arc itself always sweeps from angle 0 around that center.
pub fn arc_through(start: &Position, end: &Position) -> TrackResult<SegmentGeometry> {
    let direction = (*end - *start)
        .normalize()
        .ok_or_else(|| TrackError::geometry("arc endpoints coincide"))?;
    let perpendicular = Position::new(-direction.z, 0.0, direction.x);
    let radius = start.distance(end) / 2.0;
    let center = start.midpoint(end) + perpendicular * radius;

    Ok(SegmentGeometry::arc(center, radius, PI))
}

#[derive(Debug, Clone)]
pub struct TrackBuilder {
    active: bool,
    mode: BuildMode,
    delete_mode: bool,
    kind: TrackKind,
    pending_start: Option<Position>,
    /// Max distance from a segment for a click to hit it
    pub pick_threshold: f32,
}

impl Default for TrackBuilder {
    fn default() -> Self {
        Self {
            active: false,
            mode: BuildMode::default(),
            delete_mode: false,
            kind: TrackKind::default(),
            pending_start: None,
            pick_threshold: PICK_THRESHOLD,
        }
    }
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn is_delete_mode(&self) -> bool {
        self.delete_mode
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn pending_start(&self) -> Option<Position> {
        self.pending_start
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.cancel();
    }

    pub fn set_mode(&mut self, mode: BuildMode) {
        self.mode = mode;
        self.delete_mode = false;
        self.cancel();
    }

    pub fn toggle_delete_mode(&mut self) {
        self.delete_mode = !self.delete_mode;
        self.cancel();
    }

    /// Switch between straight and arc; only meaningful while laying track
    pub fn toggle_track_kind(&mut self) {
        if self.mode == BuildMode::Track {
            self.kind = match self.kind {
                TrackKind::Straight => TrackKind::Arc,
                TrackKind::Arc => TrackKind::Straight,
            };
        }
    }

    /// Drop a half-placed piece
    pub fn cancel(&mut self) {
        self.pending_start = None;
    }

    pub fn click(&mut self, point: Position, track: &mut Track) -> TrackResult<BuildOutcome> {
        if !self.active {
            return Ok(BuildOutcome::Nothing);
        }

        if self.delete_mode {
            return Ok(self.delete_at(&point, track));
        }

        match self.mode {
            BuildMode::Track => self.place_track(point, track),
            BuildMode::Station => self.place_on_segment(point, track, |segment, fraction| {
                segment.add_station(NEW_STATION_NAME, fraction)?;
                Ok(BuildOutcome::StationAdded {
                    segment: segment.id(),
                    fraction,
                })
            }),
            BuildMode::Signal => self.place_on_segment(point, track, |segment, fraction| {
                segment.add_signal(fraction, SignalAspect::Green)?;
                Ok(BuildOutcome::SignalAdded {
                    segment: segment.id(),
                    fraction,
                })
            }),
        }
    }

    fn delete_at(&self, point: &Position, track: &mut Track) -> BuildOutcome {
        let Some(id) = track
            .segment_near(point, self.pick_threshold)
            .map(|segment| segment.id())
        else {
            return BuildOutcome::Nothing;
        };

        track.remove_segment(id);
        debug!("Builder removed segment {:?}", id);
        BuildOutcome::SegmentRemoved(id)
    }

    fn place_track(&mut self, point: Position, track: &mut Track) -> TrackResult<BuildOutcome> {
        let Some(start) = self.pending_start.take() else {
            self.pending_start = Some(point);
            return Ok(BuildOutcome::StartPlaced(point));
        };

        let geometry = match self.kind {
            TrackKind::Straight => SegmentGeometry::straight(start, point),
            TrackKind::Arc => arc_through(&start, &point)?,
        };

        match track.add_segment(SegmentSpec::new(geometry)) {
            Ok(id) => {
                debug!("Builder added {:?} segment {:?}", self.kind, id);
                Ok(BuildOutcome::SegmentAdded(id))
            }
            Err(e) => {
                warn!("Rejected track piece from {} to {}: {}", start, point, e);
                Err(e)
            }
        }
    }

    fn place_on_segment<F>(
        &self,
        point: Position,
        track: &mut Track,
        place: F,
    ) -> TrackResult<BuildOutcome>
    where
        F: FnOnce(&mut TrackSegment, f32) -> TrackResult<BuildOutcome>,
    {
        let Some(id) = track
            .segment_near(&point, self.pick_threshold)
            .map(|segment| segment.id())
        else {
            return Ok(BuildOutcome::Nothing);
        };

        let segment = track.segment_mut(id)?;
        let fraction = segment.fraction_of(&point);
        let outcome = place(segment, fraction)?;
        debug!("Builder placed {:?}", outcome);
        Ok(outcome)
    }

    /// Polyline of the piece that the next click would create
    pub fn preview(&self, cursor: &Position) -> Vec<Position> {
        let Some(start) = self.pending_start else {
            return Vec::new();
        };

        match self.kind {
            TrackKind::Straight => vec![start, *cursor],
            TrackKind::Arc => arc_through(&start, cursor)
                .and_then(|geometry| {
                    TrackSegment::new(SegmentId(usize::MAX), SegmentSpec::new(geometry))
                })
                .map(|segment| segment.sample_points(ARC_PREVIEW_STEPS))
                .unwrap_or_default(),
        }
    }
}
