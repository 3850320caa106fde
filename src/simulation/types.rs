//! Core types for the railway simulation
//!
//! These are standalone types that don't depend on Bevy.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A unique identifier for track segments
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub usize);

/// A 3D position in the simulation (meters, y is up)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ZERO: Position = Position::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        (*other - *self).length()
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Position) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn lerp(&self, other: &Position, t: f32) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    pub fn midpoint(&self, other: &Position) -> Position {
        self.lerp(other, 0.5)
    }

    /// Unit vector pointing the same way, or `None` for a zero or non-finite vector
    pub fn normalize(&self) -> Option<Position> {
        let len = self.length();
        if len > f32::EPSILON && len.is_finite() {
            Some(*self * (1.0 / len))
        } else {
            None
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Calculate the angle from this position to another (Y-axis rotation)
    pub fn angle_to(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        let direction_len = (dx * dx + dz * dz).sqrt();
        if direction_len > 0.0 {
            (dx / direction_len).atan2(dz / direction_len)
        } else {
            0.0
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Position {
    type Output = Position;

    fn mul(self, rhs: f32) -> Position {
        Position::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Position {
    type Output = Position;

    fn neg(self) -> Position {
        Position::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// A unit-length direction vector
///
/// Every constructor renormalizes, so a `Direction` never carries a
/// zero or non-finite vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction(Position);

impl Direction {
    /// Positive X axis, the direction a new train faces
    pub const X: Direction = Direction(Position::new(1.0, 0.0, 0.0));
    pub const Z: Direction = Direction(Position::new(0.0, 0.0, 1.0));

    pub fn new(vector: Position) -> Option<Direction> {
        vector.normalize().map(Direction)
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Option<Direction> {
        Self::new(Position::new(x, y, z))
    }

    pub fn as_vector(&self) -> Position {
        self.0
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    pub fn z(&self) -> f32 {
        self.0.z
    }

    pub fn dot(&self, other: &Position) -> f32 {
        self.0.dot(other)
    }

    pub fn reverse(&self) -> Direction {
        Direction(-self.0)
    }

    /// Blend towards `target` by `t` and renormalize.
    /// Falls back to `self` when the blend cancels out.
    pub fn blend(&self, target: &Direction, t: f32) -> Direction {
        Direction::new(self.0.lerp(&target.0, t)).unwrap_or(*self)
    }

    /// Yaw angle around the Y axis, zero when facing +Z
    pub fn heading(&self) -> f32 {
        Position::ZERO.angle_to(&self.0)
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::X
    }
}

impl From<Direction> for Position {
    fn from(direction: Direction) -> Self {
        direction.0
    }
}

/// The state displayed by a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignalAspect {
    Red,
    Yellow,
    #[default]
    Green,
}

impl fmt::Display for SignalAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAspect::Red => write!(f, "red"),
            SignalAspect::Yellow => write!(f, "yellow"),
            SignalAspect::Green => write!(f, "green"),
        }
    }
}

/// Gravitational acceleration in m/s²
pub const GRAVITY: f32 = 9.81;

/// Multiply km/h by this to get m/s
pub const KMH_TO_MS: f32 = 1000.0 / 3600.0;

/// Multiply m/s (or m/s²) by this to get km/h (or km/h/s)
pub const MS_TO_KMH: f32 = 3.6;

/// Fixed blend ratio applied to the heading once per update
pub const STEERING_BLEND: f32 = 0.1;

/// Distance to a red signal below which the driver model starts braking (meters)
pub const AUTO_BRAKE_DISTANCE: f32 = 50.0;

/// Default distance for picking a segment under the cursor (meters)
pub const PICK_THRESHOLD: f32 = 2.0;
