use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hamlet_config::{ConfigFormat, GameConfig};
use hamlet_input::{ActionMap, InputState};
use hamlet_kernel::{Environment, GameSession, HudSnapshot, Notification, Player, SessionEvent};
use hamlet_render::{DebugTextRenderer, RenderView, Renderer};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hamlet-cli", about = "Headless tools for the village walking simulator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (YAML or JSON) overriding the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for ConfigFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => ConfigFormat::Yaml,
            Format::Json => ConfigFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective configuration
    Config {
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: Format,
    },
    /// Run a headless session with scripted input and print the final HUD
    Walk(WalkArgs),
    /// Build the village and print a text dump of the scene
    Scene,
}

#[derive(Args, Clone, Default)]
struct WalkArgs {
    /// Number of ticks to simulate
    #[arg(short, long, default_value = "60")]
    ticks: u64,
    /// Simulated frame time in milliseconds
    #[arg(long, default_value = "16")]
    dt_ms: u64,
    #[arg(long)]
    forward: bool,
    #[arg(long)]
    backward: bool,
    #[arg(long)]
    left: bool,
    #[arg(long)]
    right: bool,
    /// Hold the run key
    #[arg(long)]
    run: bool,
    /// Horizontal pointer movement per tick
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    turn: f32,
    /// Press the interact key at this tick
    #[arg(long)]
    interact_at: Option<u64>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct WalkReport {
    ticks: u64,
    hud: HudSnapshot,
    notifications: Vec<Notification>,
    events: Vec<SessionEvent>,
}

fn walk(config: &GameConfig, args: &WalkArgs) -> anyhow::Result<WalkReport> {
    let keys = &config.keys;
    let map = ActionMap::from_bindings(keys);
    let mut input = InputState::new();
    input.set_pointer_captured(true);
    let held = [
        (args.forward, &keys.forward),
        (args.backward, &keys.backward),
        (args.left, &keys.left),
        (args.right, &keys.right),
        (args.run, &keys.run),
    ];
    for (_, key) in held.iter().filter(|(on, _)| *on) {
        input.key(&map, key, true, false);
    }

    let mut session = GameSession::new(config.clone().shared());
    let mut notifications = session.drain_notifications();
    let mut events = session.drain_events();
    let dt = Duration::from_millis(args.dt_ms);
    for tick in 0..args.ticks {
        if args.interact_at == Some(tick) {
            input.key(&map, &keys.interact, true, false);
            input.key(&map, &keys.interact, false, false);
        }
        input.pointer_moved(args.turn, 0.0);
        session.tick(dt, input.take_frame())?;
        notifications.extend(session.drain_notifications());
        events.extend(session.drain_events());
    }
    session.stop();
    events.extend(session.drain_events());
    tracing::debug!(ticks = session.ticks(), "scripted walk finished");

    Ok(WalkReport {
        ticks: session.ticks(),
        hud: session.hud(),
        notifications,
        events,
    })
}

fn print_report(report: &WalkReport) {
    let hud = &report.hud;
    println!("ticks: {}", report.ticks);
    println!("position: ({:.1}, {:.1})", hud.position.x, hud.position.y);
    println!("nearby: {}", hud.nearby.as_deref().unwrap_or("none"));
    println!("prompt: {}", hud.prompt.as_deref().unwrap_or("-"));
    println!("fps: {}", hud.fps);
    for note in &report.notifications {
        println!("[{:?}] {}", note.severity, note.message);
    }
    println!("events: {}", report.events.len());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("hamlet-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("config: {}", hamlet_config::crate_info());
            println!("input: {}", hamlet_input::crate_info());
            println!("scene: {}", hamlet_scene::crate_info());
            println!("kernel: {}", hamlet_kernel::crate_info());
            println!("render: {}", hamlet_render::crate_info());
            println!(
                "village: {} houses, {} trees",
                config.houses.len(),
                config.trees.len()
            );
        }
        Commands::Config { format } => {
            println!("{}", config.render(format.into())?.trim_end());
        }
        Commands::Walk(args) => {
            let report = walk(&config, &args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Scene => {
            let environment = Environment::new(&config);
            let mut view = RenderView::new(&config.camera);
            view.follow(&Player::new(&config).pose());
            print!(
                "{}",
                DebugTextRenderer::new().render(environment.scene(), &view)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamlet_kernel::Severity;

    #[test]
    fn standing_still_reports_spawn() {
        let report = walk(&GameConfig::default(), &WalkArgs {
            ticks: 10,
            dt_ms: 16,
            ..WalkArgs::default()
        })
        .unwrap();
        assert_eq!(report.ticks, 10);
        assert_eq!(report.hud.position, glam::Vec2::new(0.0, 5.0));
        assert_eq!(report.hud.nearby, None);
        assert_eq!(report.notifications.len(), 1);
    }

    #[test]
    fn walking_forward_moves_north() {
        let report = walk(&GameConfig::default(), &WalkArgs {
            ticks: 20,
            dt_ms: 16,
            forward: true,
            ..WalkArgs::default()
        })
        .unwrap();
        assert!(report.hud.position.y < 5.0);
        assert_eq!(report.hud.position.x, 0.0);
    }

    #[test]
    fn interacting_out_of_range_is_silent() {
        let report = walk(&GameConfig::default(), &WalkArgs {
            ticks: 5,
            dt_ms: 16,
            interact_at: Some(2),
            ..WalkArgs::default()
        })
        .unwrap();
        assert!(report
            .notifications
            .iter()
            .all(|n| n.severity == Severity::Success));
        assert_eq!(report.notifications.len(), 1);
    }

    #[test]
    fn walk_collects_the_session_log() {
        let report = walk(&GameConfig::default(), &WalkArgs {
            ticks: 3,
            dt_ms: 16,
            ..WalkArgs::default()
        })
        .unwrap();
        assert_eq!(
            report.events,
            vec![SessionEvent::Started, SessionEvent::Stopped]
        );
    }

    #[test]
    fn report_serializes() {
        let report = walk(&GameConfig::default(), &WalkArgs {
            ticks: 1,
            dt_ms: 16,
            ..WalkArgs::default()
        })
        .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ticks"], 1);
        assert_eq!(json["notifications"][0]["severity"], "success");
    }
}
