mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use setlist_builder_core::{
    AppConfig, AssemblyConfig, Catalog, EnergyTiers, Setlist, SetlistAssembler, SetlistError,
};
use tracing_subscriber::EnvFilter;

use crate::render::OutputFormat;

fn main() -> setlist_builder_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { source, options } => run_build(&source, &options),
        Commands::Tiers { source } => run_tiers(&source),
    }
}

fn run_build(source: &SourceArgs, options: &BuildArgs) -> setlist_builder_core::Result<()> {
    let mut config = match &options.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    options.apply(&mut config);

    let (catalog, setlist) = assemble(source.load()?, &config.assembly);
    tracing::info!(
        tracks = setlist.len(),
        requested = setlist.plan().total(),
        "setlist assembled"
    );

    let output = render::render(&setlist, &catalog, options.format())?;
    println!("{output}");
    Ok(())
}

/// Shuffling applies to every catalog source, not just the demo catalog.
/// The shuffle and the first pick share one random source, so a seed fixes
/// both.
fn assemble(catalog: Catalog, assembly: &AssemblyConfig) -> (Catalog, Setlist) {
    let mut rng = assembly.rng();
    let catalog = if assembly.shuffle {
        catalog.shuffled(&mut rng)
    } else {
        catalog
    };
    let setlist = SetlistAssembler::new(rng).assemble(&catalog, assembly.length);
    (catalog, setlist)
}

fn run_tiers(source: &SourceArgs) -> setlist_builder_core::Result<()> {
    let catalog = source.load()?;
    let tiers = EnergyTiers::classify(&catalog);
    println!("{}", render::tiers(&tiers, &catalog));
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Arrange tracks into a paced concert setlist", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a setlist following the opener / dip / build / closer arc.
    Build {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        options: BuildArgs,
    },
    /// Show how the catalog splits into energy tiers.
    Tiers {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Use the built-in sample of 90s rock tracks.
    #[arg(long)]
    demo: bool,
    /// Load tracks from a JSON file: `[{"name": "Song", "artist": "Artist", "bpm": 120}]`.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
}

impl SourceArgs {
    fn load(&self) -> setlist_builder_core::Result<Catalog> {
        let catalog = match &self.input {
            Some(path) => Catalog::load(path)?,
            None => Catalog::demo(),
        };
        if catalog.is_empty() {
            return Err(SetlistError::msg("no tracks loaded"));
        }
        tracing::info!(tracks = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Number of songs; 0 uses the whole catalog.
    #[arg(short = 'n', long)]
    length: Option<usize>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Shuffle the catalog before building.
    #[arg(short, long)]
    shuffle: bool,
    /// JSON config file providing defaults for the options above.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Show BPM, energy and transition scores.
    #[arg(short, long)]
    details: bool,
    /// Output as markdown.
    #[arg(short, long, conflicts_with = "json")]
    markdown: bool,
    /// Output as JSON.
    #[arg(short, long)]
    json: bool,
}

impl BuildArgs {
    /// Command line flags win over config file values.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(length) = self.length {
            config.assembly.length = length;
        }
        if self.seed.is_some() {
            config.assembly.seed = self.seed;
        }
        config.assembly.shuffle |= self.shuffle;
    }

    fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.markdown {
            OutputFormat::Markdown
        } else {
            OutputFormat::Text {
                details: self.details,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["setlist", "build", "--demo", "-n", "8", "--seed", "4"]);
        let Commands::Build { options, .. } = cli.command else {
            panic!("expected build command");
        };
        let mut config = AppConfig::default();
        config.assembly.length = 3;
        options.apply(&mut config);

        assert_eq!(config.assembly.length, 8);
        assert_eq!(config.assembly.seed, Some(4));
    }

    #[test]
    fn shuffle_applies_to_loaded_catalogs() {
        let loaded = Catalog::from_json_str(
            r#"[{"name": "a", "bpm": 90}, {"name": "b", "bpm": 120},
                {"name": "c", "bpm": 150}, {"name": "d", "bpm": 175}]"#,
        )
        .unwrap();
        let assembly = AssemblyConfig {
            seed: Some(21),
            shuffle: true,
            ..Default::default()
        };

        let (catalog, setlist) = assemble(loaded.clone(), &assembly);
        let expected = loaded.shuffled(&mut assembly.rng());

        assert_eq!(catalog, expected);
        assert_eq!(setlist.plan().total(), 4);
    }

    #[test]
    fn unshuffled_catalog_keeps_its_order() {
        let loaded = Catalog::demo();
        let assembly = AssemblyConfig {
            seed: Some(21),
            ..Default::default()
        };

        let (catalog, setlist) = assemble(loaded.clone(), &assembly);
        assert_eq!(catalog, loaded);
        assert_eq!(setlist.len(), 15);
    }

    #[test]
    fn source_is_required() {
        assert!(Cli::try_parse_from(["setlist", "build"]).is_err());
        assert!(Cli::try_parse_from(["setlist", "build", "--demo", "-i", "x.json"]).is_err());
    }
}
