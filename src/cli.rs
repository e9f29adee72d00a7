use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::types::Category;

/// Ward equality scores from census NS-SeC counts, mapped as choropleths
#[derive(Parser, Debug)]
#[command(name = "wardmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML configuration file; every setting has a default
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute equality scores and write them as CSV
    Scores(ScoresArgs),

    /// Join scores to boundaries and draw a choropleth
    Render(RenderArgs),

    /// Sample points inside each region and locate them with the point-in-polygon join
    Sample(SampleArgs),
}

/// Input files, overriding the `[input]` section of the configuration.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Ward boundaries (.geojson, .json or .shp)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub boundaries: Option<PathBuf>,

    /// Delimited statistics file with NS-SeC counts by sex
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub statistics: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ScoresArgs {
    /// Statistics file (overrides the configuration)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub statistics: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
pub enum OutputFormat { Svg, Html, Geojson }

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Category to map, C1..C8
    #[arg(short = 'k', long, default_value = "C1", value_parser = parse_category)]
    pub category: Category,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Restrict the map to one council area (overrides the configuration)
    #[arg(long)]
    pub council: Option<String>,

    /// Output file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Ward boundaries (overrides the configuration)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub boundaries: Option<PathBuf>,

    /// Points drawn inside each region
    #[arg(short = 'n', long, default_value_t = 10)]
    pub per_region: usize,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Output CSV file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(s).ok_or_else(|| format!("expected C1..C8, got {s:?}"))
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};
    use crate::types::Category;

    #[test]
    fn schema_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_arguments() {
        let cli = Cli::try_parse_from([
            "wardmap", "-vv", "render", "-b", "wards.geojson", "-s", "nssec.csv",
            "-k", "c3", "--format", "html", "-o", "map.html", "--council", "City of Edinburgh",
        ]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Render(args) = cli.command else { panic!("expected render") };
        assert_eq!(args.category, Category::C3);
        assert_eq!(args.format, OutputFormat::Html);
        assert_eq!(args.council.as_deref(), Some("City of Edinburgh"));
        assert!(!args.force);
    }

    #[test]
    fn bad_category_is_rejected() {
        assert!(Cli::try_parse_from(["wardmap", "render", "-k", "C9", "-o", "map.svg"]).is_err());
    }
}
