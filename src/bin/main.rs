//! Folio CLI - Generate reports from report files
//!
//! Usage:
//!   folio generate <report.toml> [--format <fmt> | --all] [--persist] [--db <file>]
//!   folio sql <report.toml> [--dialect <dialect>]
//!   folio formats
//!
//! Examples:
//!   folio generate reports/members.toml --format html > members.html
//!   folio generate reports/members.toml --all --persist
//!   folio sql reports/members.toml --dialect postgres --param region=West

use clap::{Parser, Subcommand, ValueEnum};
use folio::assemble::{QueryCompiler, ReportAssembler};
use folio::config::{ReportFile, Settings};
use folio::model::ArtifactContent;
use folio::registry::FieldRegistry;
use folio::render::RendererRegistry;
use folio::source::SqliteSource;
use folio::sql::{Dialect, SelectQuery};
use folio::store::FsArtifactStore;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio - Configurable tabular reports rendered to multiple formats")]
#[command(version)]
struct Cli {
    /// Path to a folio.toml settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report artifact
    Generate {
        /// Path to the report file
        file: PathBuf,

        /// Output format (defaults to the first enabled format)
        #[arg(short, long, conflicts_with = "all")]
        format: Option<String>,

        /// Generate every enabled format
        #[arg(long)]
        all: bool,

        /// Write artifacts to the configured output directory
        #[arg(long)]
        persist: bool,

        /// SQLite database (overrides [source] sqlite)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Request parameter for `param:` values, as name=value
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Print the compiled query and its bind values
    Sql {
        /// Path to the report file
        file: PathBuf,

        /// SQL dialect (overrides [source] dialect)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Request parameter for `param:` values, as name=value
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// List the formats that can be generated
    Formats,
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Sqlite,
    Postgres,
    Mysql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
        }
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = folio::telemetry::init_logging(&settings.logging) {
        eprintln!("Error initialising logging: {}", e);
        return ExitCode::FAILURE;
    }

    let mut renderers = RendererRegistry::with_builtins();
    if let Err(e) = settings.register_converters(&mut renderers) {
        eprintln!("Error in converter configuration: {}", e);
        return ExitCode::FAILURE;
    }

    match cli.command {
        Commands::Generate {
            file,
            format,
            all,
            persist,
            db,
            params,
        } => cmd_generate(&settings, &renderers, file, format, all, persist, db, params),
        Commands::Sql {
            file,
            dialect,
            params,
        } => cmd_sql(&settings, file, dialect, params),
        Commands::Formats => cmd_formats(&renderers),
    }
}

fn load_report(file: &PathBuf) -> Result<(ReportFile, FieldRegistry), ExitCode> {
    let report = ReportFile::from_file(file).map_err(|e| {
        eprintln!("Error reading report '{}': {}", file.display(), e);
        ExitCode::FAILURE
    })?;
    let registry = FieldRegistry::for_report_type(&report.report).map_err(|e| {
        eprintln!("Invalid report type '{}': {}", report.report.name, e);
        ExitCode::FAILURE
    })?;
    Ok((report, registry))
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    settings: &Settings,
    renderers: &RendererRegistry,
    file: PathBuf,
    format: Option<String>,
    all: bool,
    persist: bool,
    db: Option<PathBuf>,
    params: Vec<(String, String)>,
) -> ExitCode {
    let (report, registry) = match load_report(&file) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let definition = &report.definition;

    let db_path = match db {
        Some(path) => path,
        None => match settings.source.resolved_sqlite_path() {
            Ok(Some(path)) => path,
            Ok(None) => {
                eprintln!("Error: no database given (use --db or [source] sqlite)");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };
    let source = match SqliteSource::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening '{}': {}", db_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let persist = persist || settings.output.persist;
    let store = match settings.output.resolved_directory() {
        Ok(dir) => FsArtifactStore::new(dir),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let params: BTreeMap<String, String> = params.into_iter().collect();

    let assembler = ReportAssembler::new(&registry, &source, renderers)
        .with_store(&store)
        .with_parameters(&params);

    if all {
        let batch = assembler.generate_all(definition, persist);
        for outcome in &batch.outcomes {
            match &outcome.result {
                Ok(artifact) => match &artifact.content {
                    ArtifactContent::Stored(path) => {
                        println!("{}\t{}", outcome.format, path.display())
                    }
                    ArtifactContent::Inline(bytes) => {
                        println!("{}\t{} ({} bytes)", outcome.format, artifact.name, bytes.len())
                    }
                },
                Err(e) => eprintln!("{}\terror: {}", outcome.format, e),
            }
        }
        return if batch.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let Some(format) = format.or_else(|| definition.formats.first().cloned()) else {
        eprintln!("Error: no format given and the report enables none");
        return ExitCode::FAILURE;
    };

    match assembler.generate(definition, &format, persist) {
        Ok(artifact) => match artifact.content {
            ArtifactContent::Stored(path) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            ArtifactContent::Inline(bytes) => {
                if let Err(e) = std::io::stdout().write_all(&bytes) {
                    eprintln!("Error writing output: {}", e);
                    return ExitCode::FAILURE;
                }
                ExitCode::SUCCESS
            }
        },
        Err(e) => {
            eprintln!("Generation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_sql(
    settings: &Settings,
    file: PathBuf,
    dialect: Option<DialectArg>,
    params: Vec<(String, String)>,
) -> ExitCode {
    let (report, registry) = match load_report(&file) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let dialect = match dialect {
        Some(d) => d.into(),
        None => match settings.source.dialect() {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let params: BTreeMap<String, String> = params.into_iter().collect();
    let compiled = QueryCompiler::new(&registry).compile(&report.definition, &params);
    let built = SelectQuery::from_request(&compiled.request).build(dialect);

    println!("{}", built.sql);
    for (i, bind) in built.binds.iter().enumerate() {
        println!("-- ${} = '{}'", i + 1, bind.replace('\'', "''"));
    }
    ExitCode::SUCCESS
}

fn cmd_formats(renderers: &RendererRegistry) -> ExitCode {
    for format in renderers.formats() {
        match renderers.conversion_via(&format) {
            Some(via) => println!("{} (via {})", format, via),
            None => println!("{}", format),
        }
    }
    ExitCode::SUCCESS
}
