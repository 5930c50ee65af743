use std::path::PathBuf;

use anyhow::Context;
use chord_render::{ChordLibrary, RenderParams};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "chord_cli")]
#[command(about = "Render a guitar chord diagram to PNG", long_about = None)]
struct Cli {
    /// Chord name, e.g. C, Em7, Bm7b5
    #[arg(required_unless_present = "list")]
    chord: Option<String>,

    /// Output PNG path. Defaults to '<CHORD>.png' in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON chord definitions merged over the built-in table
    #[arg(long)]
    library: Option<PathBuf>,

    /// Print the known chord names and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    env_logger::Builder::from_default_env().filter_level(level).init();

    let mut library = ChordLibrary::builtin();
    if let Some(path) = &cli.library {
        let user = ChordLibrary::from_json_path(path)
            .with_context(|| format!("failed to load chord library: {}", path.display()))?;
        log::info!("loaded {} chords from {}", user.len(), path.display());
        library.merge(user);
    }

    if cli.list {
        for name in library.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(chord) = cli.chord else {
        anyhow::bail!("a chord name is required");
    };
    let chord = chord.trim();

    let diagram = library.lookup(chord).context("chord lookup failed")?;
    let image = chord_render::render(&diagram, &RenderParams::default())
        .with_context(|| format!("failed to render: {chord}"))?;

    let out_path = cli.output.unwrap_or_else(|| default_output_path(chord));
    chord_render::write_png(&image, &out_path)
        .with_context(|| format!("failed to write: {}", out_path.display()))?;

    println!("Saved diagram for {chord} to {}", out_path.display());
    Ok(())
}

fn default_output_path(chord: &str) -> PathBuf {
    PathBuf::from(format!("{chord}.png"))
}
