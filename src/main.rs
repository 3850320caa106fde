use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::time::Duration;

use rail_sim::simulation::{SimWorld, TrainConfig};

#[derive(Parser)]
#[command(name = "rail_sim")]
#[command(about = "Railway simulation with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Speed lever setting in km/h (0-100, 5 km/h notches)
    #[arg(long, default_value = "60")]
    target_speed: u32,

    /// Train top speed in km/h
    #[arg(long, default_value = "120")]
    max_speed: f32,

    /// Throttle response in km/h per second
    #[arg(long, default_value = "0.5")]
    acceleration: f32,

    /// Brake response in km/h per second
    #[arg(long, default_value = "1.0")]
    deceleration: f32,

    /// Wall-clock pause after each simulated second in headless mode (0 disables)
    #[arg(long, default_value = "500")]
    pause_ms: u64,
}

impl Cli {
    fn train_config(&self) -> TrainConfig {
        TrainConfig {
            max_speed: self.max_speed,
            acceleration: self.acceleration,
            deceleration: self.deceleration,
            ..TrainConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.ui {
        return launch_ui(&cli);
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,rail_sim=info"),
    )
    .init();
    run_headless(&cli)
}

#[cfg(feature = "ui")]
fn launch_ui(cli: &Cli) -> Result<()> {
    run_with_ui(cli.train_config());
    Ok(())
}

#[cfg(not(feature = "ui"))]
fn launch_ui(_cli: &Cli) -> Result<()> {
    anyhow::bail!("UI feature is not enabled. Rebuild with --features ui")
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    anyhow::ensure!(
        cli.delta.is_finite() && cli.delta > 0.0,
        "Tick delta must be positive, got {}",
        cli.delta
    );

    println!("Running railway simulation in headless mode...");
    println!("Ticks: {}, Delta: {}s", cli.ticks, cli.delta);

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = (1.0 / cli.delta).ceil() as u32;
    println!("Running {} ticks per second (simulated time)", ticks_per_second);
    println!();

    let delta = Duration::try_from_secs_f32(cli.delta)
        .with_context(|| format!("Tick delta {}s is out of range", cli.delta))?;
    let mut world = SimWorld::create_default_world_with(cli.train_config())?;

    println!("Initial state:");
    world.print_summary();
    world.draw_map();
    println!();

    world.start();
    world.set_speed(cli.target_speed);
    info!("Lever set to {} km/h", world.controls.setting());

    let mut tick = 0;
    while tick < cli.ticks {
        // Run ticks_per_second ticks (or remaining ticks if fewer)
        let ticks_to_run = ticks_per_second.min(cli.ticks - tick);

        for _ in 0..ticks_to_run {
            tick += 1;
            world.tick(delta);
        }

        println!(
            "--- After tick {} ({:.1}s simulated time) ---",
            tick,
            tick as f32 * cli.delta
        );
        world.print_summary();
        println!();

        if tick < cli.ticks && cli.pause_ms > 0 {
            std::thread::sleep(Duration::from_millis(cli.pause_ms));
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();
    world.log_statistics();

    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(train_config: TrainConfig) {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    println!("Starting Railway Sim UI...");
    println!();
    println!("Drive Mode:");
    println!("  Enter        - Start the clock");
    println!("  Up/Down      - Raise/lower the speed lever");
    println!("  Space        - Emergency brake");
    println!("  B / D        - Switch to build / drive mode");
    println!("Build Mode:");
    println!("  1 / 2 / 3    - Place track / station / signal");
    println!("  X            - Toggle delete mode");
    println!("  R            - Toggle straight/arc track");
    println!("  Click        - Place or delete");
    println!("  ESC          - Cancel current action, or exit in drive mode");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,rail_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Railway Sim".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(rail_sim::ui::RailSimUIPlugin { train_config })
        .run();
}
