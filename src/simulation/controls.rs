//! Driver's speed lever
//!
//! The lever holds the requested speed in 5 km/h notches between 0 and 100
//! and forwards every change to the train.

use super::train::Train;

/// Upper end of the lever in km/h
pub const LEVER_MAX: u32 = 100;

/// km/h per notch
pub const LEVER_STEP: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverControls {
    setting: u32,
}

impl DriverControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested speed in km/h
    pub fn setting(&self) -> u32 {
        self.setting
    }

    pub fn set(&mut self, speed: u32, train: &mut Train) {
        self.setting = speed.min(LEVER_MAX);
        train.accelerate(self.setting as f32);
    }

    pub fn increase(&mut self, train: &mut Train) {
        self.set(self.setting + LEVER_STEP, train);
    }

    pub fn decrease(&mut self, train: &mut Train) {
        self.set(self.setting.saturating_sub(LEVER_STEP), train);
    }

    /// Lever to zero with the service brake
    pub fn release(&mut self, train: &mut Train) {
        self.setting = 0;
        train.brake();
    }

    /// Lever to zero with an emergency stop
    pub fn emergency(&mut self, train: &mut Train) {
        self.setting = 0;
        train.emergency_brake();
    }
}
