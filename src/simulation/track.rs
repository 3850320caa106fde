//! Track: an insertion-ordered collection of independent segments
//!
//! Standalone implementation that doesn't depend on Bevy. Segments carry no
//! connectivity; every spatial query is a linear scan.

use log::debug;
use ordered_float::OrderedFloat;
use std::f32::consts::FRAC_PI_2;

use super::error::{TrackError, TrackResult};
use super::segment::{SegmentSpec, TrackSegment};
use super::types::{Direction, Position, SegmentId, SignalAspect};

/// A signal found ahead of a train
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSighting {
    pub segment: SegmentId,
    pub position: Position,
    pub aspect: SignalAspect,
    /// Straight-line distance from the query position (meters)
    pub distance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Track {
    segments: Vec<TrackSegment>,

    /// Next ID to assign
    next_id: usize,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// The starter layout: a long straight, a quarter curve and a northbound straight
    pub fn default_layout() -> TrackResult<Self> {
        let mut track = Self::new();

        track.add_segment(
            SegmentSpec::straight(
                Position::new(-100.0, 0.0, 0.0),
                Position::new(100.0, 0.0, 0.0),
            )
            .with_station("Central Station", 0.25)
            .with_signal(0.9, SignalAspect::Green),
        )?;

        track.add_segment(
            SegmentSpec::arc(Position::new(100.0, 0.0, 20.0), 20.0, FRAC_PI_2)
                .with_signal(0.5, SignalAspect::Green),
        )?;

        track.add_segment(
            SegmentSpec::straight(
                Position::new(120.0, 0.0, 20.0),
                Position::new(120.0, 0.0, 120.0),
            )
            .with_station("North Station", 0.7)
            .with_signal(0.95, SignalAspect::Red),
        )?;

        Ok(track)
    }

    /// Construct a segment from `spec` and append it.
    /// Invalid geometry or fractions are rejected and the track is left unchanged.
    pub fn add_segment(&mut self, spec: SegmentSpec) -> TrackResult<SegmentId> {
        let id = SegmentId(self.next_id);
        let segment = TrackSegment::new(id, spec)?;
        self.next_id += 1;

        debug!(
            "Added segment {:?} ({:?}, length {:.1}m)",
            id,
            segment.geometry(),
            segment.length()
        );
        self.segments.push(segment);
        Ok(id)
    }

    /// Remove a segment, returning it. Unknown ids are a no-op.
    pub fn remove_segment(&mut self, id: SegmentId) -> Option<TrackSegment> {
        let index = self.segments.iter().position(|s| s.id() == id)?;
        debug!("Removed segment {:?}", id);
        Some(self.segments.remove(index))
    }

    pub fn segment(&self, id: SegmentId) -> Option<&TrackSegment> {
        self.segments.iter().find(|s| s.id() == id)
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> TrackResult<&mut TrackSegment> {
        self.segments
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(TrackError::UnknownSegment(id))
    }

    /// All segments in insertion order
    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn signal_count(&self) -> usize {
        self.segments.iter().map(|s| s.signals().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment whose curve is nearest to `position`.
    /// The first segment in insertion order wins ties; `None` for an empty track.
    pub fn closest_segment(&self, position: &Position) -> Option<&TrackSegment> {
        // min_by_key keeps the first of equal minima
        self.segments
            .iter()
            .min_by_key(|segment| OrderedFloat(segment.distance_to(position)))
    }

    /// Closest segment, but only if it lies within `threshold` of `position`
    pub fn segment_near(&self, position: &Position, threshold: f32) -> Option<&TrackSegment> {
        self.closest_segment(position)
            .filter(|segment| segment.is_near(position, threshold))
    }

    /// Nearest signal ahead of a train at `position` facing `direction`.
    ///
    /// Only the signals of the closest segment are considered. A signal is ahead
    /// when the dot product of the offset to it with `direction` is positive.
    pub fn next_signal(
        &self,
        position: &Position,
        direction: &Direction,
    ) -> Option<SignalSighting> {
        let segment = self.closest_segment(position)?;

        segment
            .signal_positions()
            .filter(|(signal_pos, _)| direction.dot(&(*signal_pos - *position)) > 0.0)
            .map(|(signal_pos, signal)| SignalSighting {
                segment: segment.id(),
                position: signal_pos,
                aspect: signal.aspect,
                distance: position.distance(&signal_pos),
            })
            .min_by_key(|sighting| OrderedFloat(sighting.distance))
    }
}
