//! `cursor-dump`: write decoded cursors out as PNG files.
//!
//! Handy for checking what the loader produces for a given cursor theme
//! without wiring it into a capture pipeline.

use clap::Parser;
use cursor_loader::error::{OptionExt, ResultExt};
use cursor_loader::{
    CursorLoader, CursorResult, CursorSource, DecodedCursor, LoaderConfig, SystemCursor,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cursor-dump")]
#[command(about = "Dump decoded cursor bitmaps as PNG files")]
#[command(version)]
struct Args {
    /// Directory the PNG files are written to
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Dump every system cursor instead of the one currently shown
    #[arg(long)]
    system: bool,

    /// Loader configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(err) = run(&args) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(windows)]
fn run(args: &Args) -> CursorResult<()> {
    dump(args, cursor_loader::WindowsCursorSource::new())
}

#[cfg(not(windows))]
fn run(_args: &Args) -> CursorResult<()> {
    Err(cursor_loader::CursorError::Other(
        "cursor-dump reads cursors through GDI and only runs on Windows".to_string(),
    ))
}

#[cfg_attr(not(windows), allow(dead_code))]
fn dump<S: CursorSource>(args: &Args, source: S) -> CursorResult<()> {
    let config = match &args.config {
        Some(path) => LoaderConfig::load(path)?,
        None => LoaderConfig::default(),
    };
    fs::create_dir_all(&args.output)?;

    let mut loader = CursorLoader::with_config(source, config);

    if args.system {
        for shape in SystemCursor::ALL {
            let Some(handle) = loader.source().system_cursor(shape) else {
                log::warn!("[CURSOR] System cursor {} is not available", shape);
                continue;
            };
            match loader.get(handle) {
                Some(cursor) => write_cursor(&args.output, &shape.name().to_lowercase(), &cursor)?,
                None => log::warn!("[CURSOR] Could not decode system cursor {}", shape),
            }
        }
    } else {
        let cursor = loader
            .get_current()
            .context("no cursor could be read from the screen")?;
        write_cursor(&args.output, "current", &cursor)?;
    }

    loader.dispose();
    Ok(())
}

#[cfg_attr(not(windows), allow(dead_code))]
fn write_cursor(dir: &Path, name: &str, cursor: &DecodedCursor) -> CursorResult<()> {
    let primary = dir.join(format!("{name}.png"));
    cursor
        .primary_image
        .save(&primary)
        .with_context(|| format!("writing {}", primary.display()))?;

    if let Some(invert) = &cursor.invert_image {
        let path = dir.join(format!("{name}-invert.png"));
        invert
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    log::info!(
        "[CURSOR] {}: {:?} {}x{}, hotspot ({}, {}) -> {}",
        name,
        cursor.encoding,
        cursor.width,
        cursor.height,
        cursor.hotspot_x,
        cursor.hotspot_y,
        primary.display()
    );
    Ok(())
}
