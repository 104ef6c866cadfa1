use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mta_rust_exportdocs_core::{format_output, DocGenerator, DocsConfig, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exportdocs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate Markdown reference docs from exported TypeScript declarations")]
#[command(long_about = "Scans the files matched by the project's tsconfig.json `include` patterns \
    for `export type` blocks and `export function` headers, together with the /** */ comments \
    preceding them, and writes one Markdown file per source file under the output directory.\n\n\
    Each entry links back to its source lines at <homepage>/blob/main/<file>#L<start>-L<end>, \
    where <homepage> comes from package.json.")]
pub struct Args {
    /// Project root directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Project configuration with `include` patterns (relative to the root)
    #[arg(long, default_value = "tsconfig.json")]
    pub config: PathBuf,

    /// Package metadata with `homepage` and `name` (relative to the root)
    #[arg(long, default_value = "package.json")]
    pub package: PathBuf,

    /// Output directory for generated docs (relative to the root)
    #[arg(short, long, default_value = "docs")]
    pub out_dir: PathBuf,

    /// Include patterns to use instead of the project configuration's
    #[arg(long, action = clap::ArgAction::Append)]
    pub include: Vec<String>,

    /// Additional ignore patterns (glob style)
    #[arg(long, action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Skip node_modules, .git and build output directories
    #[arg(long)]
    pub skip_deps: bool,

    /// Skip files listed in the root .gitignore
    #[arg(long)]
    pub respect_gitignore: bool,

    /// Render docs without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Print a run report in the given format
    #[arg(short, long, value_enum)]
    pub report: Option<ReportFormatArg>,

    /// Exit with an error if any file could not be documented
    #[arg(long)]
    pub strict: bool,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Show debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Parallel threads (0 = auto)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum ReportFormatArg {
    Json,
    Yaml,
    Summary,
}

impl From<ReportFormatArg> for OutputFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Json => OutputFormat::Json,
            ReportFormatArg::Yaml => OutputFormat::Yaml,
            ReportFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = DocsConfig::new(args.path.clone())
        .with_project_config(args.config)
        .with_package_manifest(args.package)
        .with_output_dir(args.out_dir)
        .with_ignore_patterns(args.ignore)
        .with_skip_deps(args.skip_deps)
        .with_respect_gitignore(args.respect_gitignore)
        .with_threads(args.threads)
        .with_dry_run(args.dry_run);

    if !args.include.is_empty() {
        config = config.with_include(args.include);
    }

    let generator = DocGenerator::new(config)
        .with_context(|| format!("Failed to load project in {}", args.path.display()))?;

    let files = generator.find_source_files();

    let progress = if args.progress && !files.is_empty() {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.green} {pos}/{len} {msg}")
                .context("Invalid progress template")?,
        );
        Some(pb)
    } else {
        None
    };

    let report = generator
        .generate_with(&files, |file| {
            if let Some(ref pb) = progress {
                pb.set_message(file.relative.clone());
                pb.inc(1);
            }
        })
        .context("Failed to generate docs")?;

    if let Some(ref pb) = progress {
        pb.finish_with_message(format!("Documented {} files", report.stats.files_written));
    }

    info!(
        "Wrote {} of {} files ({} exported units) to {} in {}ms",
        report.stats.files_written,
        report.stats.files_found,
        report.stats.total_units,
        report.output_dir.display(),
        report.metadata.duration_ms
    );

    if let Some(format) = args.report {
        println!("{}", format_output(&report, format.into())?);
    }

    if args.strict && report.has_failures() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
