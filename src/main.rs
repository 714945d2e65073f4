use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use torusflow::app::{Flow, Viewer, ViewerConfig};
use torusflow::camera::OrbitControls;
use torusflow::graphics::SoftwareRenderer;
use torusflow::input::{Command, InputState};
use torusflow::shader::BaseColor;
use torusflow::state::ShapeSettings;
use torusflow::terminal::{framebuffer_size, TerminalGuard};

/// A console-based live parametric torus renderer
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Exit after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Tube-angle advance per unit of flow time
    #[arg(long, default_value_t = 1.0)]
    flow_speed: f32,

    /// Initial major radius
    #[arg(long, default_value_t = 1.0)]
    major_radius: f32,

    /// Initial minor radius
    #[arg(long, default_value_t = 1.0)]
    minor_radius: f32,

    /// Initial segment count around the ring
    #[arg(long, default_value_t = 40)]
    radial_segments: u32,

    /// Initial segment count around the tube
    #[arg(long, default_value_t = 40)]
    tubular_segments: u32,

    /// Surface color when rainbow mode is off
    #[arg(long, value_enum, default_value_t = BaseColor::Blue)]
    color: BaseColor,

    /// Disable diffuse lighting
    #[arg(long)]
    unlit: bool,

    /// Log file (the terminal itself is taken by the renderer)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("torusflow.log"));
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let env = env_logger::Env::default().default_filter_or(args.log_level.as_str());
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    log::info!("{:?}", args);

    let config = ViewerConfig {
        shape: ShapeSettings {
            major_radius: args.major_radius,
            minor_radius: args.minor_radius,
            radial_segments: args.radial_segments,
            tubular_segments: args.tubular_segments,
        },
        flow_speed: args.flow_speed,
        base_color: args.color,
        lit: !args.unlit,
    };

    let mut terminal = TerminalGuard::new().context("failed to set up terminal")?;
    let (columns, rows) = terminal.size();
    let (width, height) = framebuffer_size(columns, rows);
    let backend = SoftwareRenderer::new(width, height);
    let mut viewer = Viewer::new(config, backend, OrbitControls::default())?;
    let mut input = InputState::default();
    let frame_budget = Duration::from_secs_f64(1.0 / args.fps.max(1) as f64);

    'frames: loop {
        let frame_start = Instant::now();
        viewer.tick().context("failed to render frame")?;
        terminal.present(
            viewer.backend.framebuffer(),
            &viewer.panel_lines(),
            &viewer.hud_lines(),
        )?;

        if args.frames.is_some_and(|limit| viewer.render_loop.frames() >= limit) {
            break;
        }

        // Input is handled between ticks, for the rest of the frame budget
        let remaining = frame_budget.saturating_sub(frame_start.elapsed());
        for command in input.poll_commands(remaining)? {
            if let Command::Resize { columns, rows } = command {
                terminal.resize(columns, rows)?;
                let (width, height) = framebuffer_size(columns, rows);
                viewer.backend.resize(width, height);
            }
            if viewer.apply(command) == Flow::Quit {
                break 'frames;
            }
        }
    }

    drop(terminal);
    viewer.shutdown()?;
    Ok(())
}
