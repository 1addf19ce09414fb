use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::Colorize;
use eframe::egui;
use parking_lot::Mutex;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use tagflow::app::{theme_icon, TagFlowApp};
use tagflow::{ClipboardInjector, Config, TagStore, Theme};

#[derive(Parser, Debug)]
#[command(name = "tagflow", version, about = "Paste tags from a file with global hotkeys")]
struct Args {
    /// Path to a JSON config file (defaults to ./tagflow.json when present)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the tag file from the config
    #[arg(long)]
    tags_file: Option<PathBuf>,

    /// Override the startup theme file from the config
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(tags_file) = args.tags_file {
        config.tags_file = tags_file;
    }
    if let Some(theme_file) = args.theme {
        config.theme_file = theme_file;
    }
    config.validate()?;

    // Probe the paste backend before the window opens; without it every
    // hotkey would be a silent no-op.
    match ClipboardInjector::new(&config) {
        Ok(probe) => drop(probe),
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            eprintln!(
                "TagFlow needs clipboard access and keystroke injection to work. \
                 On Linux this requires a running display server; on macOS grant \
                 the app accessibility permission."
            );
            return Err(anyhow!("paste backend unavailable"));
        }
    }

    println!("{}", "TagFlow — global hotkey tag paster".bold());
    println!("  tags file:  {}", config.tags_file.display().to_string().cyan());
    println!("  theme file: {}", config.theme_file.display().to_string().cyan());
    println!("{}", "✔ clipboard and keystroke backends available".green());

    let tags = Arc::new(Mutex::new(TagStore::new()));
    if let Err(e) = tags.lock().reload_from(&config.tags_file) {
        // Not fatal: the watcher or a manual F8 picks the file up later.
        error!("{e}");
    }

    let theme = Theme::load(&config.theme_file).unwrap_or_else(|e| {
        warn!("{e}; falling back to the built-in theme");
        Theme::default()
    });
    let colors = theme
        .colors()
        .context("built-in theme must parse")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([400.0, 320.0])
            .with_icon(theme_icon(&colors)),
        ..Default::default()
    };

    eframe::run_native(
        "TagFlow",
        options,
        Box::new(move |cc| Ok(Box::new(TagFlowApp::new(cc, config, tags, theme)))),
    )
    .map_err(|e| anyhow!("window error: {e}"))
}
