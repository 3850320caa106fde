//! Main simulation world that ties everything together
//!
//! This is the entry point for running the railway simulation
//! without any Bevy dependencies. The world owns the track, the train and the
//! driver's lever; an outer loop calls `tick` once per frame.

use anyhow::{Context, Result};
use log::info;
use std::time::Duration;

use super::builder::{BuildOutcome, TrackBuilder};
use super::controls::DriverControls;
use super::error::TrackResult;
use super::track::{SignalSighting, Track};
use super::train::{Train, TrainConfig};
use super::types::{Position, SignalAspect, AUTO_BRAKE_DISTANCE};

/// Largest map side in characters; bigger layouts are drawn at a coarser scale
pub const MAX_MAP_CELLS: usize = 200;

/// Whether the player is driving or editing the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Drive,
    Build,
}

/// Values shown on the driver's dashboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dashboard {
    /// Whole km/h
    pub speed_kmh: f32,
    /// Kilometers, one decimal
    pub distance_km: f32,
    pub next_aspect: Option<SignalAspect>,
}

/// The main simulation world
pub struct SimWorld {
    pub track: Track,

    pub train: Train,

    pub controls: DriverControls,

    pub builder: TrackBuilder,

    mode: GameMode,

    running: bool,

    /// Signal seen on the last tick
    last_signal: Option<SignalSighting>,

    /// Times the driver model eased off for a red signal
    auto_brake_count: u32,

    /// Simulation time
    pub time: Duration,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new(Track::new(), TrainConfig::default())
    }
}

impl SimWorld {
    pub fn new(track: Track, train_config: TrainConfig) -> Self {
        Self {
            track,
            train: Train::new(train_config),
            controls: DriverControls::new(),
            builder: TrackBuilder::new(),
            mode: GameMode::Drive,
            running: false,
            last_signal: None,
            auto_brake_count: 0,
            time: Duration::ZERO,
        }
    }

    /// The starter layout with a train waiting on the first straight
    pub fn create_default_world() -> Result<Self> {
        Self::create_default_world_with(TrainConfig::default())
    }

    pub fn create_default_world_with(train_config: TrainConfig) -> Result<Self> {
        train_config.validate().context("Rejected train configuration")?;
        let track = Track::default_layout().context("Failed to build default layout")?;
        Ok(Self::new(track, train_config))
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_signal(&self) -> Option<&SignalSighting> {
        self.last_signal.as_ref()
    }

    pub fn auto_brake_count(&self) -> u32 {
        self.auto_brake_count
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.set_mode(GameMode::Drive);
        }
    }

    /// Pause the clock and bring the lever back to zero
    pub fn stop(&mut self) {
        self.running = false;
        self.controls.release(&mut self.train);
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        match mode {
            GameMode::Build => {
                self.builder.activate();
                self.stop();
            }
            GameMode::Drive => self.builder.deactivate(),
        }
    }

    pub fn increase_speed(&mut self) {
        self.controls.increase(&mut self.train);
    }

    pub fn decrease_speed(&mut self) {
        self.controls.decrease(&mut self.train);
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.controls.set(speed, &mut self.train);
    }

    pub fn emergency_brake(&mut self) {
        self.controls.emergency(&mut self.train);
    }

    /// Forward a ground-plane click to the building tool
    pub fn build_click(&mut self, point: Position) -> TrackResult<BuildOutcome> {
        self.builder.click(point, &mut self.track)
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, delta: Duration) {
        if !self.running {
            return;
        }
        self.time += delta;

        self.train.update(delta, &self.track);

        self.last_signal = self
            .track
            .next_signal(&self.train.position(), &self.train.direction());

        if let Some(signal) = self.last_signal {
            if signal.aspect == SignalAspect::Red
                && signal.distance < AUTO_BRAKE_DISTANCE
                && self.train.speed() > 0.0
            {
                self.decrease_speed();
                self.auto_brake_count += 1;
                info!(
                    "Red signal {:.0}m ahead, easing lever to {} km/h",
                    signal.distance,
                    self.controls.setting()
                );
            }
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            speed_kmh: self.train.speed().round(),
            distance_km: (self.train.distance_traveled() / 100.0).round() / 10.0,
            next_aspect: self.last_signal.map(|signal| signal.aspect),
        }
    }

    pub fn print_summary(&self) {
        let dashboard = self.dashboard();
        println!("=== Railway Simulation Summary ===");
        println!("Time: {:.2}s", self.time.as_secs_f32());
        println!(
            "Segments: {}, Signals: {}",
            self.track.segment_count(),
            self.track.signal_count()
        );
        println!(
            "Train: position={} heading={:.2}rad state={:?}",
            self.train.position(),
            self.train.heading(),
            self.train.state()
        );
        println!(
            "Speed: {} km/h (lever {} km/h), Distance: {:.1} km",
            dashboard.speed_kmh,
            self.controls.setting(),
            dashboard.distance_km
        );
        match self.last_signal {
            Some(signal) => println!(
                "Next signal: {} in {:.0}m at {}",
                signal.aspect, signal.distance, signal.position
            ),
            None => println!("Next signal: none ahead"),
        }
    }

    /// Statistics block written at the end of a headless run
    pub fn log_statistics(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Elapsed time: {:.2}s", self.time.as_secs_f32());
        info!("Distance traveled: {:.1}m", self.train.distance_traveled());
        info!("Final speed: {:.1} km/h", self.train.speed());
        info!("Auto-brake interventions: {}", self.auto_brake_count);
        info!("Total segments: {}", self.track.segment_count());
        info!("Total signals: {}", self.track.signal_count());
    }

    /// Top-down character map of the layout, one cell per `meters_per_cell`
    pub fn render_map(&self, meters_per_cell: f32) -> String {
        let polylines: Vec<Vec<Position>> = self
            .track
            .segments()
            .iter()
            .map(|segment| segment.sample_points(24))
            .collect();

        // Find bounds of the world
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_z = f32::INFINITY;
        let mut max_z = f32::NEG_INFINITY;

        let train_pos = self.train.position();
        for pos in polylines.iter().flatten().chain(std::iter::once(&train_pos)) {
            min_x = min_x.min(pos.x);
            max_x = max_x.max(pos.x);
            min_z = min_z.min(pos.z);
            max_z = max_z.max(pos.z);
        }

        let extent = (max_x - min_x).max(max_z - min_z).max(0.0);
        let meters_per_cell = meters_per_cell
            .max(0.1)
            .max(extent / (MAX_MAP_CELLS - 2) as f32);
        let scale = 1.0 / meters_per_cell;

        // Add padding
        min_x -= meters_per_cell;
        max_x += meters_per_cell;
        min_z -= meters_per_cell;
        max_z += meters_per_cell;

        let width = (((max_x - min_x) * scale) as usize).clamp(1, MAX_MAP_CELLS);
        let height = (((max_z - min_z) * scale) as usize).clamp(1, MAX_MAP_CELLS);
        let mut grid = vec![vec![' '; width]; height];

        let to_grid = |pos: &Position| -> (usize, usize) {
            let col = ((pos.x - min_x) * scale) as usize;
            // Flip the Z-axis so north is up
            let row = ((max_z - pos.z) * scale) as usize;
            (row.min(height - 1), col.min(width - 1))
        };

        // Draw track, densifying each polyline so there are no gaps between cells
        for polyline in &polylines {
            for pair in polyline.windows(2) {
                let cells = (pair[0].distance(&pair[1]) * scale).ceil().max(1.0) as usize;
                for i in 0..=cells {
                    let (row, col) = to_grid(&pair[0].lerp(&pair[1], i as f32 / cells as f32));
                    grid[row][col] = '#';
                }
            }
        }

        for segment in self.track.segments() {
            for (pos, _) in segment.station_positions() {
                let (row, col) = to_grid(&pos);
                grid[row][col] = 'S';
            }
            for (pos, signal) in segment.signal_positions() {
                let (row, col) = to_grid(&pos);
                grid[row][col] = match signal.aspect {
                    SignalAspect::Red => 'R',
                    SignalAspect::Yellow => 'Y',
                    SignalAspect::Green => 'G',
                };
            }
        }

        let (row, col) = to_grid(&train_pos);
        grid[row][col] = 'T';

        let mut map = String::new();
        for row in grid {
            map.push_str(row.into_iter().collect::<String>().trim_end());
            map.push('\n');
        }
        map
    }

    pub fn draw_map(&self) {
        println!("{}", self.render_map(5.0));
        println!("Legend: # track, S station, R/Y/G signal, T train");
    }
}
