//! CLI tool for photogrid - resolves the visible tile window and outputs JSON
//!
//! Usage:
//!   photogrid_cli <photos.json>                          # Window at the origin, 1920x1080
//!   photogrid_cli <photos.json> --x -500 --y 120 --seed 7
//!   photogrid_cli <rows.json> --api https://example.org  # Backend rows ({ id, filename, ... })
//!   photogrid_cli <photos.json> -o window.json           # Output JSON to file
//!
//! Set `RUST_LOG` to control log output (default `warn,photogrid=info`).

#![allow(clippy::exit)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::str::FromStr;

use photogrid::render::{MemorySurface, TileSurface};
use photogrid::types::read_photo_file;
use photogrid::{GridOptions, GridSession, PhotoGridError, ScrollOffset, ViewportSize};

const USAGE: &str = "Usage: photogrid_cli <photos.json> [--width W] [--height H] [--x X] [--y Y] \
                     [--seed S] [--buffer B] [--api BASE_URL] [-o output.json]";

#[derive(Debug)]
struct Args {
    input: String,
    width: f64,
    height: f64,
    x: f64,
    y: f64,
    seed: u32,
    buffer: Option<u32>,
    api_base: Option<String>,
    output: Option<String>,
}

fn parse_value<T: FromStr>(flag: &str, value: Option<&String>) -> Result<T, PhotoGridError> {
    let value = value.ok_or_else(|| PhotoGridError::InvalidArgument(format!("{flag} needs a value")))?;
    value
        .parse()
        .map_err(|_| PhotoGridError::InvalidArgument(format!("{flag}: cannot parse '{value}'")))
}

fn parse_args(args: &[String]) -> Result<Args, PhotoGridError> {
    let mut parsed = Args {
        input: String::new(),
        width: 1920.0,
        height: 1080.0,
        x: 0.0,
        y: 0.0,
        seed: 0,
        buffer: None,
        api_base: None,
        output: None,
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--width" => parsed.width = parse_value(arg, iter.next())?,
            "--height" => parsed.height = parse_value(arg, iter.next())?,
            "--x" => parsed.x = parse_value(arg, iter.next())?,
            "--y" => parsed.y = parse_value(arg, iter.next())?,
            "--seed" => parsed.seed = parse_value(arg, iter.next())?,
            "--buffer" => parsed.buffer = Some(parse_value(arg, iter.next())?),
            "--api" => parsed.api_base = Some(parse_value(arg, iter.next())?),
            "-o" => parsed.output = Some(parse_value(arg, iter.next())?),
            other if other.starts_with('-') => {
                return Err(PhotoGridError::InvalidArgument(format!("unknown flag {other}")));
            }
            other => parsed.input = other.to_string(),
        }
    }
    if parsed.input.is_empty() {
        return Err(PhotoGridError::InvalidArgument("missing photo list".to_string()));
    }
    Ok(parsed)
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,photogrid=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {}

fn run(args: Args) -> Result<(), PhotoGridError> {
    let photos = read_photo_file(&args.input, args.api_base.as_deref())?;

    let mut options = GridOptions {
        seed: args.seed,
        ..GridOptions::default()
    };
    if let Some(buffer) = args.buffer {
        options.buffer_cells = buffer;
    }

    let mut session = GridSession::new(ViewportSize::new(args.width, args.height), options);
    session.set_photos(photos);
    session
        .controller_mut()
        .set_offset(ScrollOffset::new(args.x, args.y));

    // Drive a headless surface the same way the browser view does
    let mut surface = MemorySurface::new();
    surface.set_offset(session.offset());
    if let Some(plan) = session.refresh() {
        surface.apply_plan(&plan)?;
    }
    let eager = session.tiles_to_load();
    surface.begin_loading(&eager)?;
    tracing::info!(
        mounted = surface.len(),
        eager_loads = surface.loading().len(),
        transform = surface.transform(),
        "window resolved"
    );

    let json = serde_json::to_string_pretty(&session.snapshot())?;

    match args.output {
        Some(path) => {
            fs::write(&path, &json)?;
            eprintln!("Written: {}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let input = args.input.clone();
    if let Err(e) = run(args) {
        eprintln!("Error processing {input}: {e}");
        std::process::exit(1);
    }
}
