//! Paint-by-numbers core binary.
//!
//! Runs the core headless against a paint script and writes the result as
//! a PNG and/or a save state, or serves it as an MCP server.

use std::path::PathBuf;
use std::process;

use emu_pbn::capture::{self, UNSCALED};
use emu_pbn::mcp::McpServer;
use emu_pbn::{Operation, PaintScript, Params, Plugin, ScriptHost, Setting};

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

struct CliArgs {
    width: Option<String>,
    height: Option<String>,
    script_path: Option<PathBuf>,
    frames: Option<u32>,
    screenshot_path: Option<PathBuf>,
    scaled: bool,
    save_state_path: Option<PathBuf>,
    load_state_path: Option<PathBuf>,
    paint_limit: Option<u32>,
    mcp: bool,
}

fn print_usage() {
    eprintln!("Usage: emu-pbn [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --width <n>           Canvas width, 1-256 [default: 64]");
    eprintln!("  --height <n>          Canvas height, 1-256 [default: 56]");
    eprintln!("  --script <file>       Paint script (JSON)");
    eprintln!("  --frames <n>          Frames to run [default: one per script frame]");
    eprintln!("  --screenshot <file>   Save a PNG of the canvas");
    eprintln!("  --scaled              Magnify the screenshot by the core's scale factors");
    eprintln!("  --load-state <file>   Restore a save state before painting");
    eprintln!("  --save-state <file>   Write a save state after painting");
    eprintln!("  --paint-limit <n>     Stop each frame after n points");
    eprintln!("  --mcp                 Run as MCP server (JSON-RPC over stdio)");
}

fn parse_number(flag: &str, value: Option<&String>) -> u32 {
    match value.map(|s| s.parse()) {
        Some(Ok(n)) => n,
        _ => {
            eprintln!("{flag} needs a non-negative integer");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        width: None,
        height: None,
        script_path: None,
        frames: None,
        screenshot_path: None,
        scaled: false,
        save_state_path: None,
        load_state_path: None,
        paint_limit: None,
        mcp: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                cli.width = args.get(i).cloned();
            }
            "--height" => {
                i += 1;
                cli.height = args.get(i).cloned();
            }
            "--script" => {
                i += 1;
                cli.script_path = args.get(i).map(PathBuf::from);
            }
            "--frames" => {
                i += 1;
                cli.frames = Some(parse_number("--frames", args.get(i)));
            }
            "--screenshot" => {
                i += 1;
                cli.screenshot_path = args.get(i).map(PathBuf::from);
            }
            "--scaled" => {
                cli.scaled = true;
            }
            "--save-state" => {
                i += 1;
                cli.save_state_path = args.get(i).map(PathBuf::from);
            }
            "--load-state" => {
                i += 1;
                cli.load_state_path = args.get(i).map(PathBuf::from);
            }
            "--paint-limit" => {
                i += 1;
                cli.paint_limit = Some(parse_number("--paint-limit", args.get(i)));
            }
            "--mcp" => {
                cli.mcp = true;
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

// ---------------------------------------------------------------------------
// Headless mode
// ---------------------------------------------------------------------------

fn run_headless(cli: &CliArgs) {
    let script = match &cli.script_path {
        Some(path) => PaintScript::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load script {}: {e}", path.display());
            process::exit(1);
        }),
        None => PaintScript::default(),
    };
    let frames = cli
        .frames
        .unwrap_or_else(|| u32::try_from(script.frames.len().max(1)).unwrap_or(u32::MAX));
    log::info!("{} points over {} script frames", script.point_count(), script.frames.len());

    let mut plugin = Plugin::new().with_paint_limit(cli.paint_limit);
    let mut enumerate = Params::EnumerateCores {
        host: Some(ScriptHost::new(script)),
        sysregions: None,
    };
    run_op(&mut plugin, Operation::EnumerateCores, &mut enumerate);

    let mut settings = Vec::new();
    if let Some(w) = &cli.width {
        settings.push(Setting::new("width", w.as_str()));
    }
    if let Some(h) = &cli.height {
        settings.push(Setting::new("height", h.as_str()));
    }
    run_op(
        &mut plugin,
        Operation::LoadRom,
        &mut Params::LoadRom {
            image: &[0],
            settings: &settings,
        },
    );

    if let Some(path) = &cli.load_state_path {
        let data = capture::read_state_file(path).unwrap_or_else(|e| {
            eprintln!("Failed to read state {}: {e}", path.display());
            process::exit(1);
        });
        run_op(&mut plugin, Operation::LoadState, &mut Params::LoadState { data: &data });
    }

    let mut total = 0u64;
    for _ in 0..frames {
        let mut params = Params::Emulate { points: None };
        run_op(&mut plugin, Operation::Emulate, &mut params);
        if let Params::Emulate { points: Some(n) } = params {
            total += u64::from(n);
        }
    }
    eprintln!("Painted {total} points in {frames} frames");

    if let Some(path) = &cli.save_state_path {
        let mut params = Params::SaveState { data: Vec::new() };
        run_op(&mut plugin, Operation::SaveState, &mut params);
        if let Params::SaveState { data } = params {
            if let Err(e) = capture::write_state_file(path, &data) {
                eprintln!("Save state error: {e}");
                process::exit(1);
            }
            eprintln!("Save state written to {}", path.display());
        }
    }

    if let Some(path) = &cli.screenshot_path {
        let core = plugin.core();
        let scale = if cli.scaled { core.compute_scale() } else { UNSCALED };
        if let Err(e) = capture::save_screenshot(core.canvas(), scale, path) {
            eprintln!("Screenshot error: {e}");
            process::exit(1);
        }
        eprintln!("Screenshot saved to {}", path.display());
    }
}

/// Run one entrypoint operation; a failure is fatal for the CLI.
fn run_op(plugin: &mut Plugin<ScriptHost>, operation: Operation, params: &mut Params<'_, ScriptHost>) {
    if let Err(e) = plugin.dispatch(operation.code(), params) {
        eprintln!("{operation:?} failed: {e}");
        process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let cli = parse_args();

    if cli.mcp {
        McpServer::new(cli.paint_limit).run();
        return;
    }

    run_headless(&cli);
}
