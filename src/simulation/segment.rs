//! Track segment geometry
//!
//! A segment is either a straight piece between two points or a circular arc
//! starting at angle 0 (the +X side of its center) and sweeping towards +Z.
//! Geometry is fixed at construction; stations and signals can be appended later.

use std::f32::consts::TAU;

use super::error::{TrackError, TrackResult};
use super::types::{Direction, Position, SegmentId, SignalAspect};

/// Shape of a single piece of track
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentGeometry {
    Straight {
        start: Position,
        end: Position,
    },
    Arc {
        center: Position,
        radius: f32,
        /// Radians swept from angle 0
        sweep_angle: f32,
    },
}

impl SegmentGeometry {
    pub fn straight(start: Position, end: Position) -> Self {
        SegmentGeometry::Straight { start, end }
    }

    pub fn arc(center: Position, radius: f32, sweep_angle: f32) -> Self {
        SegmentGeometry::Arc {
            center,
            radius,
            sweep_angle,
        }
    }

    /// Rejects shapes that would later produce non-finite directions
    pub fn validate(&self) -> TrackResult<()> {
        match *self {
            SegmentGeometry::Straight { start, end } => {
                if !start.is_finite() || !end.is_finite() {
                    return Err(TrackError::geometry("straight endpoints must be finite"));
                }
                if start.distance(&end) <= f32::EPSILON {
                    return Err(TrackError::geometry(format!(
                        "straight segment has zero length (start == end == {start})"
                    )));
                }
            }
            SegmentGeometry::Arc {
                center,
                radius,
                sweep_angle,
            } => {
                if !center.is_finite() {
                    return Err(TrackError::geometry("arc center must be finite"));
                }
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(TrackError::geometry(format!(
                        "arc radius must be positive, got {radius}"
                    )));
                }
                if !(sweep_angle.is_finite() && sweep_angle > 0.0) {
                    return Err(TrackError::geometry(format!(
                        "arc sweep angle must be positive, got {sweep_angle}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn length(&self) -> f32 {
        match *self {
            SegmentGeometry::Straight { start, end } => start.distance(&end),
            SegmentGeometry::Arc {
                radius,
                sweep_angle,
                ..
            } => radius * sweep_angle,
        }
    }

    pub fn is_straight(&self) -> bool {
        matches!(self, SegmentGeometry::Straight { .. })
    }
}

/// A named stop placed along a segment
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    /// Position along the segment in [0, 1]
    pub fraction: f32,
}

/// A lineside signal placed along a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    /// Position along the segment in [0, 1]
    pub fraction: f32,
    pub aspect: SignalAspect,
}

/// Everything needed to construct a segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSpec {
    pub geometry: SegmentGeometry,
    pub stations: Vec<Station>,
    pub signals: Vec<Signal>,
}

impl SegmentSpec {
    pub fn new(geometry: SegmentGeometry) -> Self {
        Self {
            geometry,
            stations: Vec::new(),
            signals: Vec::new(),
        }
    }

    pub fn straight(start: Position, end: Position) -> Self {
        Self::new(SegmentGeometry::straight(start, end))
    }

    pub fn arc(center: Position, radius: f32, sweep_angle: f32) -> Self {
        Self::new(SegmentGeometry::arc(center, radius, sweep_angle))
    }

    pub fn with_station(mut self, name: impl Into<String>, fraction: f32) -> Self {
        self.stations.push(Station {
            name: name.into(),
            fraction,
        });
        self
    }

    pub fn with_signal(mut self, fraction: f32, aspect: SignalAspect) -> Self {
        self.signals.push(Signal { fraction, aspect });
        self
    }
}

fn check_fraction(fraction: f32) -> TrackResult<f32> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(TrackError::InvalidPosition { fraction })
    }
}

/// A single piece of track with its stations and signals
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSegment {
    id: SegmentId,
    geometry: SegmentGeometry,
    length: f32,
    stations: Vec<Station>,
    signals: Vec<Signal>,
}

impl TrackSegment {
    /// Build a segment, validating geometry and every station/signal fraction
    pub fn new(id: SegmentId, spec: SegmentSpec) -> TrackResult<Self> {
        spec.geometry.validate()?;
        for station in &spec.stations {
            check_fraction(station.fraction)?;
        }
        for signal in &spec.signals {
            check_fraction(signal.fraction)?;
        }

        Ok(Self {
            id,
            length: spec.geometry.length(),
            geometry: spec.geometry,
            stations: spec.stations,
            signals: spec.signals,
        })
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn geometry(&self) -> &SegmentGeometry {
        &self.geometry
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Append a station. Fractions outside [0, 1] are rejected.
    pub fn add_station(&mut self, name: impl Into<String>, fraction: f32) -> TrackResult<()> {
        let fraction = check_fraction(fraction)?;
        self.stations.push(Station {
            name: name.into(),
            fraction,
        });
        Ok(())
    }

    /// Append a signal. Fractions outside [0, 1] are rejected.
    pub fn add_signal(&mut self, fraction: f32, aspect: SignalAspect) -> TrackResult<()> {
        let fraction = check_fraction(fraction)?;
        self.signals.push(Signal { fraction, aspect });
        Ok(())
    }

    /// Nearest point on the segment's curve.
    ///
    /// Arcs project radially onto the full circle; the result is not limited
    /// to the swept range. A query at the exact center maps to the arc start.
    pub fn closest_point(&self, p: &Position) -> Position {
        match self.geometry {
            SegmentGeometry::Straight { start, end } => {
                let line = end - start;
                let t = ((*p - start).dot(&line) / line.dot(&line)).clamp(0.0, 1.0);
                start.lerp(&end, t)
            }
            SegmentGeometry::Arc { center, radius, .. } => match (*p - center).normalize() {
                Some(radial) => center + radial * radius,
                None => self.world_position_of(0.0),
            },
        }
    }

    /// Tangent of the track at the point closest to `p`
    pub fn direction_at(&self, p: &Position) -> Direction {
        match self.geometry {
            SegmentGeometry::Straight { start, end } => {
                Direction::new(end - start).unwrap_or_default()
            }
            SegmentGeometry::Arc { center, .. } => {
                let radial = (self.closest_point(p) - center)
                    .normalize()
                    .unwrap_or(Position::new(1.0, 0.0, 0.0));
                // Directly above or below the center there is no horizontal radius.
                Direction::from_xyz(-radial.z, 0.0, radial.x).unwrap_or(Direction::Z)
            }
        }
    }

    /// World position of a point `fraction` of the way along the segment
    pub fn world_position_of(&self, fraction: f32) -> Position {
        match self.geometry {
            SegmentGeometry::Straight { start, end } => start.lerp(&end, fraction),
            SegmentGeometry::Arc {
                center,
                radius,
                sweep_angle,
            } => {
                let angle = fraction * sweep_angle;
                center + Position::new(angle.cos(), 0.0, angle.sin()) * radius
            }
        }
    }

    /// Fraction of the way along the segment of the point closest to `p`, in [0, 1]
    pub fn fraction_of(&self, p: &Position) -> f32 {
        let closest = self.closest_point(p);
        match self.geometry {
            SegmentGeometry::Straight { start, .. } => {
                (start.distance(&closest) / self.length).clamp(0.0, 1.0)
            }
            SegmentGeometry::Arc {
                center,
                sweep_angle,
                ..
            } => {
                let offset = closest - center;
                let angle = offset.z.atan2(offset.x).rem_euclid(TAU);
                (angle / sweep_angle).clamp(0.0, 1.0)
            }
        }
    }

    /// Distance from `p` to the segment's curve
    pub fn distance_to(&self, p: &Position) -> f32 {
        p.distance(&self.closest_point(p))
    }

    pub fn is_near(&self, p: &Position, threshold: f32) -> bool {
        self.distance_to(p) <= threshold
    }

    /// World positions of all signals in list order
    pub fn signal_positions(&self) -> impl Iterator<Item = (Position, &Signal)> + '_ {
        self.signals
            .iter()
            .map(|signal| (self.world_position_of(signal.fraction), signal))
    }

    /// World positions of all stations in list order
    pub fn station_positions(&self) -> impl Iterator<Item = (Position, &Station)> + '_ {
        self.stations
            .iter()
            .map(|station| (self.world_position_of(station.fraction), station))
    }

    /// Points along the curve for drawing, `steps + 1` samples from start to end
    pub fn sample_points(&self, steps: usize) -> Vec<Position> {
        let steps = if self.geometry.is_straight() { 1 } else { steps.max(1) };
        (0..=steps)
            .map(|i| self.world_position_of(i as f32 / steps as f32))
            .collect()
    }
}
