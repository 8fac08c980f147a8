use orrery::{Body, ClockDriver, Engine, LoggingHandle, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "solar_systems.yaml")]
    file_name: String,

    /// Number of clock firings to run
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// Let the clock's own thread fire in real time instead of stepping it
    #[arg(long)]
    realtime: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let scenario_cfg = ScenarioConfig::from_path(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn print_tree(body: &dyn Body, depth: usize) {
    let s = body.state();
    println!(
        "{:indent$}{:<16} x = ({:>12.5e}, {:>12.5e})  v = ({:>12.5e}, {:>12.5e})",
        "",
        s.name,
        s.position.x,
        s.position.y,
        s.velocity.x,
        s.velocity.y,
        indent = depth * 2
    );
    for child in body.children() {
        print_tree(&**child, depth + 1);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;

    let driver = if args.realtime { ClockDriver::Thread } else { ClockDriver::Manual };
    let mut engine = Engine::from_scenario(&scenario_cfg, driver)?;
    engine.lock_root().set_render_handle(LoggingHandle::new());

    engine.start()?;
    if args.realtime {
        let interval = engine.clock().interval();
        thread::sleep(Duration::from_secs_f64(interval * args.ticks as f64 / 1000.0));
        engine.stop();
        if let Some(err) = engine.take_error() {
            return Err(err.into());
        }
    } else {
        for _ in 0..args.ticks {
            engine.step()?;
        }
        engine.stop();
    }
    info!("ran {} ticks", engine.ticks());

    print_tree(&*engine.lock_root(), 0);
    Ok(())
}
