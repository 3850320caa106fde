//! Railway Simulation Library
//!
//! Track geometry and train dynamics that can run headless or with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
