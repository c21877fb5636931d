use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::analysis::plot::ImageFormat;
use crate::models::Selection;

#[derive(Parser, Debug)]
#[command(
    name = "burtin-dashboard",
    version,
    about = "Antibiotic effectiveness dashboard for Burtin's MIC dataset"
)]
pub struct Cli {
    /// JSON config file; defaults to $PROJECT_ROOT/dashboard.json when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the page for one selection.
    Render(RenderArgs),
    /// Render all four pages.
    Site(SiteArgs),
    /// Write the long-form observations as CSV.
    Export(ExportArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Input dataset (.json or .csv).
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<ImageFormat>,

    /// Also write a Vega-Lite spec next to each chart image.
    #[arg(long, default_value_t = false)]
    pub vega: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[arg(long, value_enum, default_value_t = Selection::All)]
    pub selection: Selection,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, default_value = "long_form.csv")]
    pub out: PathBuf,
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
    fn render_parses_selection_and_output_flags() {
        let cli = Cli::try_parse_from([
            "burtin-dashboard",
            "render",
            "--selection",
            "streptomycin",
            "--format",
            "png",
            "--vega",
            "--out",
            "site",
        ])
        .unwrap();

        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.selection, Selection::Streptomycin);
        assert_eq!(args.output.format, Some(ImageFormat::Png));
        assert!(args.output.vega);
        assert_eq!(args.output.out, Some(PathBuf::from("site")));
        assert_eq!(args.source.data, None);
    }

    #[test]
    fn render_defaults_to_all() {
        let cli = Cli::try_parse_from(["burtin-dashboard", "render"]).unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.selection, Selection::All);
        assert_eq!(args.output.format, None);
    }

    #[test]
    fn config_is_global() {
        let cli =
            Cli::try_parse_from(["burtin-dashboard", "export", "--config", "d.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("d.json")));
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.out, PathBuf::from("long_form.csv"));
    }

    #[test]
    fn unknown_selection_is_rejected() {
        assert!(Cli::try_parse_from(["burtin-dashboard", "render", "--selection", "ampicillin"])
            .is_err());
    }
}
