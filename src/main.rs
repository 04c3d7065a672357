//! Smartmark - type into a markdown file with smart quotes.
//!
//! # Usage
//!
//! ```bash
//! smartmark notes.md --type 'He said "hi"'
//! smartmark notes.md --cursor 12 --type '"' --write
//! smartmark notes.md --select 4..9 --type "'"
//! smartmark notes.md --cursor 30 --context
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};

use smartmark::app::Model;
use smartmark::config::{
    QuoteSettings, clear_config, cli_overlay, global_config_path, load_config, load_layered,
    local_override_path, merge, save_config,
};

/// Type text into a markdown file, turning straight quotes into smart ones
#[derive(Parser, Debug)]
#[command(name = "smartmark", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Text to type at the cursor
    #[arg(short = 't', long = "type", value_name = "TEXT", default_value = "")]
    text: String,

    /// Cursor position as a char offset (defaults to the end of the file)
    #[arg(short, long, value_name = "OFFSET", conflicts_with = "select")]
    cursor: Option<usize>,

    /// Select a char range before typing, e.g. 4..9
    #[arg(short, long, value_name = "FROM..TO", value_parser = parse_span)]
    select: Option<(usize, usize)>,

    /// Extra JSON config merged over the global and local files
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Type straight quotes
    #[arg(long)]
    no_smart_quotes: bool,

    /// Write the result back to FILE instead of printing it
    #[arg(short, long)]
    write: bool,

    /// Print the syntax context at the cursor and exit
    #[arg(long)]
    context: bool,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

fn parse_span(s: &str) -> Result<(usize, usize), String> {
    let (from, to) = s
        .split_once("..")
        .ok_or_else(|| format!("expected FROM..TO, got {s:?}"))?;
    let from = from
        .trim()
        .parse()
        .map_err(|err| format!("invalid start {from:?}: {err}"))?;
    let to = to
        .trim()
        .parse()
        .map_err(|err| format!("invalid end {to:?}: {err}"))?;
    Ok((from, to))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_values = cli_overlay(cli.no_smart_quotes);

    if cli.clear {
        clear_config(&global_path)?;
    }
    if cli.save {
        save_config(&global_path, &cli_values)?;
    }

    let mut config = if cli.clear {
        Value::Object(Map::new())
    } else {
        load_layered(&global_path, &local_path)?
    };
    if let Some(path) = &cli.config {
        if !path.exists() {
            anyhow::bail!("Config not found: {}", path.display());
        }
        merge(&mut config, load_config(path)?);
    }
    merge(&mut config, cli_values);
    let settings = QuoteSettings::resolve(&config);

    // Verify file exists
    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    let mut model = Model::new(&source, &settings);
    match (cli.select, cli.cursor) {
        (Some((anchor, head)), _) => model.buffer.select(anchor, head),
        (None, Some(offset)) => model.buffer.move_to(offset),
        (None, None) => model.buffer.move_to(model.buffer.len_chars()),
    }

    if cli.context {
        println!("{}", model.context_at_cursor().join(" > "));
        return Ok(());
    }

    model.type_text(&cli.text);

    if cli.write {
        fs::write(&cli.file, model.buffer.text())
            .with_context(|| format!("Failed to write {}", cli.file.display()))?;
        model.buffer.mark_clean();
    } else {
        print!("{}", model.buffer.text());
    }
    Ok(())
}
