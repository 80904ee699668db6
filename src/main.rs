use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hemo_core::constants::DEFAULT_BUNDLE_COUNT;
use hemo_core::{generate_batch, resolve_output_dir, GeneratorConfig};

#[derive(Parser)]
#[command(name = "hemograma")]
#[command(about = "Generate sample FHIR hemogram bundles for use as test fixtures")]
struct Cli {
    /// Number of bundles to generate
    #[arg(long, default_value_t = DEFAULT_BUNDLE_COUNT)]
    count: u32,
    /// Output directory (default: test-data/json-examples in the workspace)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
    /// Use this scenario for every bundle instead of picking one at random
    #[arg(long)]
    scenario: Option<String>,
}

/// Main entry point for the hemogram generator
///
/// With no arguments, writes 20 bundles with random scenarios and neighbourhoods into
/// `test-data/json-examples` under the workspace root, creating it if needed. The workspace root
/// is taken from `CARGO_MANIFEST_DIR` at build time, so a relocated binary still writes into the
/// checkout it was built from; pass `--output-dir` to write elsewhere.
///
/// # Environment Variables
/// - `RUST_LOG`: log filter (default: info for the generator crates)
///
/// # Returns
/// * `Ok(())` - If every bundle was written
/// * `Err(anyhow::Error)` - On invalid arguments or the first write failure
fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hemograma=info".parse()?)
                .add_directive("hemo_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let cfg = GeneratorConfig::new(
        output_dir(cli.output_dir),
        cli.count,
        cli.seed,
        cli.scenario.as_deref(),
    )?;

    tracing::info!(
        "++ Generating {} hemogram bundles into {}",
        cfg.bundle_count(),
        cfg.output_dir().display()
    );

    let report = generate_batch(&cfg, chrono::Utc::now())?;

    tracing::info!(
        "++ All {} bundles were generated in {}",
        report.len(),
        cfg.output_dir().display()
    );

    Ok(())
}

/// Output directory for this run, defaulting under the checkout the binary was built from.
fn output_dir(override_dir: Option<PathBuf>) -> PathBuf {
    resolve_output_dir(override_dir, Path::new(env!("CARGO_MANIFEST_DIR")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_default_batch() {
        let cli = Cli::try_parse_from(["hemograma"]).expect("parse empty args");

        assert_eq!(cli.count, 20);
        assert!(cli.output_dir.is_none());
        assert!(cli.seed.is_none());
        assert!(cli.scenario.is_none());
    }

    #[test]
    fn default_output_dir_is_inside_build_checkout() {
        let dir = output_dir(None);

        assert!(dir.starts_with(env!("CARGO_MANIFEST_DIR")));
        assert!(dir.ends_with("test-data/json-examples"));
        assert_eq!(
            output_dir(Some(PathBuf::from("/tmp/hemo"))),
            PathBuf::from("/tmp/hemo")
        );
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "hemograma",
            "--count",
            "3",
            "--output-dir",
            "/tmp/hemo",
            "--seed",
            "99",
            "--scenario",
            "dengue",
        ])
        .expect("parse flags");

        assert_eq!(cli.count, 3);
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/hemo")));
        assert_eq!(cli.seed, Some(99));
        assert_eq!(cli.scenario.as_deref(), Some("dengue"));
    }
}
