//! Train movement logic for the railway simulation
//!
//! Standalone implementation that doesn't depend on Bevy. The train holds no
//! reference to the track; a track is handed to every `update` call.

use std::time::Duration;

use super::error::{TrackError, TrackResult};
use super::track::Track;
use super::types::{Direction, Position, GRAVITY, KMH_TO_MS, MS_TO_KMH, STEERING_BLEND};

/// Physical parameters of a train
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Starting position
    pub start: Position,
    /// Initial speed in km/h
    pub speed: f32,
    /// Top speed in km/h
    pub max_speed: f32,
    /// Throttle response in km/h per second
    pub acceleration: f32,
    /// Service brake response in km/h per second
    pub deceleration: f32,
    /// Length in meters
    pub length: f32,
    /// Mass in kg
    pub mass: f32,
    /// Rolling resistance coefficient
    pub rolling_resistance: f32,
    /// Aerodynamic drag coefficient (N per (m/s)²)
    pub air_resistance: f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            start: Position::new(-90.0, 0.0, 0.0),
            speed: 0.0,
            max_speed: 120.0,
            acceleration: 0.5,
            deceleration: 1.0,
            length: 20.0,
            mass: 80_000.0,
            rolling_resistance: 0.002,
            air_resistance: 0.0005,
        }
    }
}

impl TrainConfig {
    /// Reject values the physics cannot run with
    pub fn validate(&self) -> TrackResult<()> {
        if !self.start.is_finite() {
            return Err(TrackError::train_config("start position must be finite"));
        }
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(TrackError::train_config(format!(
                "max speed must be a non-negative number, got {}",
                self.max_speed
            )));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(TrackError::train_config(format!(
                "initial speed must be a non-negative number, got {}",
                self.speed
            )));
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(TrackError::train_config(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }

        let rates = [
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("length", self.length),
            ("rolling resistance", self.rolling_resistance),
            ("air resistance", self.air_resistance),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackError::train_config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Where the train is relative to its target speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainState {
    Idle,
    Accelerating,
    Cruising,
    Decelerating,
}

/// A train in the simulation
#[derive(Debug, Clone)]
pub struct Train {
    config: TrainConfig,
    position: Position,
    direction: Direction,
    /// Body yaw, follows `direction`
    heading: f32,
    /// km/h
    speed: f32,
    /// km/h
    target_speed: f32,
    /// meters
    distance_traveled: f32,
    is_moving: bool,
}

/// Clamp into [0, max_speed]. A negative or NaN limit gives 0.
fn clamp_speed(speed: f32, max_speed: f32) -> f32 {
    speed.min(max_speed).max(0.0)
}

impl Default for Train {
    fn default() -> Self {
        Self::new(TrainConfig::default())
    }
}

impl Train {
    pub fn new(config: TrainConfig) -> Self {
        let direction = Direction::X;
        let speed = clamp_speed(config.speed, config.max_speed);
        Self {
            position: config.start,
            direction,
            heading: direction.heading(),
            speed,
            target_speed: 0.0,
            distance_traveled: 0.0,
            is_moving: speed > 0.0,
            config,
        }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    pub fn max_speed(&self) -> f32 {
        self.config.max_speed
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving || self.speed > 0.0
    }

    pub fn state(&self) -> TrainState {
        if self.speed <= 0.0 && self.target_speed <= 0.0 {
            TrainState::Idle
        } else if self.speed < self.target_speed {
            TrainState::Accelerating
        } else if self.speed > self.target_speed {
            TrainState::Decelerating
        } else {
            TrainState::Cruising
        }
    }

    /// Place the train, e.g. after the layout changed under it
    pub fn set_position(&mut self, position: Position, direction: Direction) {
        self.position = position;
        self.direction = direction;
        self.heading = direction.heading();
    }

    /// Request a new target speed, capped at `max_speed`
    pub fn accelerate(&mut self, target_speed: f32) {
        self.target_speed = clamp_speed(target_speed, self.config.max_speed);
        self.is_moving = self.target_speed > 0.0;
    }

    pub fn brake(&mut self) {
        self.target_speed = 0.0;
    }

    /// Stop dead, skipping the deceleration rate limit
    pub fn emergency_brake(&mut self) {
        self.speed = 0.0;
        self.target_speed = 0.0;
        self.is_moving = false;
    }

    /// Combined rolling and aerodynamic resistance in newtons at the current speed
    pub fn resistance_force(&self) -> f32 {
        let rolling = self.config.rolling_resistance * self.config.mass * GRAVITY;
        let speed_ms = self.speed * KMH_TO_MS;
        let air = self.config.air_resistance * speed_ms * speed_ms;
        rolling + air
    }

    /// Advance one tick: speed control, resistance, integration, then steering
    pub fn update(&mut self, delta: Duration, track: &Track) {
        let dt = delta.as_secs_f32();

        self.approach_target_speed(dt);

        if self.speed > 0.0 {
            // m/s² -> km/h/s
            let resistance = self.resistance_force() / self.config.mass * MS_TO_KMH;
            self.speed -= resistance * dt;
        }
        self.speed = clamp_speed(self.speed, self.config.max_speed);

        let step = self.speed * KMH_TO_MS * dt;
        self.position = self.position + self.direction.as_vector() * step;
        self.distance_traveled += step;

        self.follow_track(track);
    }

    fn approach_target_speed(&mut self, dt: f32) {
        if self.speed < self.target_speed {
            self.speed = (self.speed + self.config.acceleration * dt).min(self.target_speed);
        } else if self.speed > self.target_speed {
            self.speed = (self.speed - self.config.deceleration * dt).max(self.target_speed);
        }
    }

    /// Blend the heading towards the tangent of the nearest segment.
    /// The blend ratio is fixed per call, so turning rate depends on tick rate.
    fn follow_track(&mut self, track: &Track) {
        let Some(segment) = track.closest_segment(&self.position) else {
            return;
        };

        let tangent = segment.direction_at(&self.position);
        self.direction = self.direction.blend(&tangent, STEERING_BLEND);
        self.heading = self.direction.heading();
    }

    /// Point 5 m ahead of the train's center
    pub fn front_position(&self) -> Position {
        self.position + self.direction.as_vector() * 5.0
    }

    /// Driver's eye point: cab height, 4 m ahead of the center
    pub fn driver_view_position(&self) -> Position {
        self.position + Position::new(0.0, 2.5, 0.0) + self.direction.as_vector() * 4.0
    }
}
