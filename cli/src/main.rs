use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use routine_import_catalog::{CatalogIndex, load_catalog};
use routine_import_core::{RoutineConfig, RoutineEnvelope, validate_routine};
use routine_import_parser::{
    OutputFormat, ParseReport, ParserConfig, detect_format, format_report, format_routine,
    looks_like_routine_suggestion, parse_routine_with_report,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit code for `parse --strict` when the routine is not submission-ready.
const EXIT_NOT_READY: i32 = 2;

/// File name of the summary written by `batch`.
const BATCH_REPORT_FILE: &str = "batch-report.json";

#[derive(Debug, Parser)]
#[command(name = "routine-import")]
#[command(about = "Turn workout routines from chat text or JSON into API-ready payloads")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract a routine from a file or stdin.
    Parse(ParseArgs),
    /// Check a routine JSON or YAML file for submission problems.
    Validate(ValidateArgs),
    /// Resolve exercise names against a catalog.
    Resolve(ResolveArgs),
    /// Parse many inputs in parallel and write one routine per input.
    Batch(BatchArgs),
    /// Print the detected input format and whether the text looks like a workout.
    Detect(DetectArgs),
    /// Write a parser configuration file with the built-in defaults.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Exercise catalog file (JSON or YAML). Without one, nothing resolves.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Parser configuration file (YAML).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Input file; reads stdin when omitted or `-`.
    input: Option<PathBuf>,
    #[command(flatten)]
    source: SourceArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Output both routine and parse report.
    #[arg(long)]
    with_report: bool,
    /// Exit with status 2 when the routine has validation problems.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Routine file in model form (.json, .yaml or .yml).
    input: PathBuf,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Exercise names to resolve.
    #[arg(required = true)]
    names: Vec<String>,
    /// Exercise catalog file (JSON or YAML).
    #[arg(long)]
    catalog: PathBuf,
    /// Print JSON instead of tab-separated lines.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Input files and/or directories of .txt, .md and .json files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    #[command(flatten)]
    source: SourceArgs,
    /// Output directory for routines and the batch report.
    #[arg(long)]
    output: PathBuf,
    /// Write API request bodies instead of routine models.
    #[arg(long)]
    wire: bool,
    /// Number of parallel jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct DetectArgs {
    /// Input file; reads stdin when omitted or `-`.
    input: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Destination file (YAML).
    path: PathBuf,
    /// Folder new routines are created in.
    #[arg(long)]
    folder: Option<String>,
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "warn" });

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Validate(args) => run_validate(args),
        Command::Resolve(args) => run_resolve(args),
        Command::Batch(args) => run_batch(args),
        Command::Detect(args) => run_detect(args),
        Command::InitConfig(args) => run_init_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// parse command
// ---------------------------------------------------------------------------

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let text = read_input(args.input.as_deref())?;
    let (index, config) = load_sources(&args.source)?;

    let run = parse_routine_with_report(&text, &index, &config);

    if args.with_report {
        match args.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&run)
                    .map_err(|e| format!("Failed to serialize output: {e}"))?;
                println!("{json}");
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(&run)
                    .map_err(|e| format!("Failed to serialize output: {e}"))?;
                println!("{yaml}");
            }
            format => {
                if let Some(ref routine) = run.routine {
                    println!("{}", format_routine(routine, format)?);
                    println!();
                }
                print!("{}", format_report(&run.report, format)?);
            }
        }
    } else {
        match &run.routine {
            Some(routine) => println!("{}", format_routine(routine, args.format)?),
            None => {
                let mut detail = format!(
                    "No routine found in input (tried: {})",
                    run.report.strategies_tried.join(", ")
                );
                if !run.report.warnings.is_empty() {
                    detail.push_str(&format!("; {}", run.report.warnings.join("; ")));
                }
                return Err(detail);
            }
        }
    }

    if args.strict && !run.report.submission_ready {
        for problem in &run.report.validation_problems {
            eprintln!("problem: {problem}");
        }
        if run.routine.is_none() {
            eprintln!("problem: no routine found");
        }
        std::process::exit(EXIT_NOT_READY);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// validate command
// ---------------------------------------------------------------------------

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;

    let routine: RoutineConfig = if is_yaml(&args.input) {
        serde_yaml::from_str(&raw)
            .map_err(|err| format!("Invalid routine '{}': {err}", args.input.display()))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|err| format!("Invalid routine '{}': {err}", args.input.display()))?
    };

    let problems = validate_routine(&routine);
    if problems.is_empty() {
        println!(
            "Routine '{}' is ready: {} exercise(s), {} set(s).",
            routine.title,
            routine.exercises.len(),
            routine.total_sets()
        );
        return Ok(());
    }

    for problem in &problems {
        println!("- {problem}");
    }
    Err(format!(
        "Routine '{}' has {} problem(s)",
        args.input.display(),
        problems.len()
    ))
}

// ---------------------------------------------------------------------------
// resolve command
// ---------------------------------------------------------------------------

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.catalog)
        .map_err(|e| format!("Failed to load catalog '{}': {e}", args.catalog.display()))?;
    let index = CatalogIndex::new(&catalog);

    #[derive(serde::Serialize)]
    struct ResolveOutput<'a> {
        query: &'a str,
        #[serde(flatten)]
        resolution: Option<routine_import_catalog::Resolution>,
    }

    let outputs: Vec<ResolveOutput<'_>> = args
        .names
        .iter()
        .map(|name| ResolveOutput {
            query: name,
            resolution: index.resolve_match(name),
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&outputs)
            .map_err(|e| format!("Failed to serialize output: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    for output in &outputs {
        match &output.resolution {
            Some(hit) => println!(
                "{}\t{}\t{}\t{}",
                output.query, hit.template_id, hit.tier, hit.matched_name
            ),
            None => println!("{}\t-\tunresolved\t-", output.query),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// batch command
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct BatchEntry {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    routine_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ParseReport>,
}

#[derive(Debug, serde::Serialize)]
struct BatchReport {
    generated_at: String,
    total: usize,
    parsed: usize,
    submission_ready: usize,
    entries: Vec<BatchEntry>,
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    use rayon::prelude::*;

    let inputs = collect_input_paths(&args.inputs)?;
    let (index, config) = load_sources(&args.source)?;

    fs::create_dir_all(&args.output).map_err(|e| {
        format!(
            "Failed to create output directory '{}': {e}",
            args.output.display()
        )
    })?;

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let index = &index;
    let config = &config;
    let output_dir = args.output.as_path();
    let wire = args.wire;

    let mut entries: Vec<BatchEntry> = pool.install(|| {
        inputs
            .par_iter()
            .map(|path| parse_one(path, index, config, output_dir, wire))
            .collect()
    });
    entries.sort_by(|a, b| a.input.cmp(&b.input));

    let report = BatchReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        total: entries.len(),
        parsed: entries.iter().filter(|e| e.routine_file.is_some()).count(),
        submission_ready: entries
            .iter()
            .filter(|e| e.report.as_ref().is_some_and(|r| r.submission_ready))
            .count(),
        entries,
    };

    let report_path = args.output.join(BATCH_REPORT_FILE);
    let raw = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Failed to serialize batch report: {e}"))?;
    fs::write(&report_path, raw)
        .map_err(|e| format!("Failed to write '{}': {e}", report_path.display()))?;

    println!(
        "Parsed {}/{} input(s), {} ready for submission. Report: '{}'.",
        report.parsed,
        report.total,
        report.submission_ready,
        report_path.display()
    );

    let failures: Vec<&BatchEntry> = report.entries.iter().filter(|e| e.error.is_some()).collect();
    if !failures.is_empty() {
        eprintln!("\nFailures:");
        for entry in failures {
            if let Some(err) = &entry.error {
                eprintln!("  {}: {err}", entry.input);
            }
        }
    }

    Ok(())
}

fn parse_one(
    path: &Path,
    index: &CatalogIndex,
    config: &ParserConfig,
    output_dir: &Path,
    wire: bool,
) -> BatchEntry {
    let input = path.display().to_string();

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            return BatchEntry {
                input,
                routine_file: None,
                error: Some(format!("Failed to read: {err}")),
                report: None,
            };
        }
    };

    let run = parse_routine_with_report(&text, index, config);
    debug!(input = %input, success = run.report.success, "Parsed batch input");

    let Some(routine) = run.routine else {
        return BatchEntry {
            input,
            routine_file: None,
            error: Some("no routine found".to_string()),
            report: Some(run.report),
        };
    };

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(sanitize_filename_segment)
        .unwrap_or_else(|| "routine".to_string());
    let routine_file = format!("{stem}.json");

    let serialized = if wire {
        serde_json::to_string_pretty(&RoutineEnvelope::new(routine.to_payload()))
    } else {
        serde_json::to_string_pretty(&routine)
    };
    let written = serialized
        .map_err(|e| format!("Failed to serialize routine: {e}"))
        .and_then(|json| {
            fs::write(output_dir.join(&routine_file), json)
                .map_err(|e| format!("Failed to write '{routine_file}': {e}"))
        });

    match written {
        Ok(()) => BatchEntry {
            input,
            routine_file: Some(routine_file),
            error: None,
            report: Some(run.report),
        },
        Err(err) => BatchEntry {
            input,
            routine_file: None,
            error: Some(err),
            report: Some(run.report),
        },
    }
}

// ---------------------------------------------------------------------------
// detect command
// ---------------------------------------------------------------------------

fn run_detect(args: DetectArgs) -> Result<(), String> {
    let text = read_input(args.input.as_deref())?;
    println!("format: {}", detect_format(&text));
    println!("looks_like_routine: {}", looks_like_routine_suggestion(&text));
    Ok(())
}

// ---------------------------------------------------------------------------
// init-config command
// ---------------------------------------------------------------------------

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.path.exists() && !args.force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            args.path.display()
        ));
    }

    let config = ParserConfig {
        folder_id: args.folder,
        ..ParserConfig::default()
    };
    config
        .save(&args.path)
        .map_err(|e| format!("Failed to write config '{}': {e}", args.path.display()))?;

    println!("Wrote {}", args.path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn read_input(input: Option<&Path>) -> Result<String, String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            Ok(text)
        }
    }
}

fn load_sources(source: &SourceArgs) -> Result<(CatalogIndex, ParserConfig), String> {
    let index = match &source.catalog {
        Some(path) => {
            let catalog = load_catalog(path)
                .map_err(|e| format!("Failed to load catalog '{}': {e}", path.display()))?;
            info!(records = catalog.len(), "Loaded catalog");
            CatalogIndex::new(&catalog)
        }
        None => CatalogIndex::default(),
    };

    let config = match &source.config {
        Some(path) => ParserConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => ParserConfig::default(),
    };

    Ok((index, config))
}

fn collect_input_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut paths = BTreeSet::new();

    for input in inputs {
        if input.is_dir() {
            let entries = fs::read_dir(input)
                .map_err(|e| format!("Failed to read directory '{}': {e}", input.display()))?;
            for entry in entries {
                let path = entry
                    .map_err(|e| format!("Failed to read directory '{}': {e}", input.display()))?
                    .path();
                if path.is_file() && is_batch_input(&path) {
                    paths.insert(path);
                }
            }
            continue;
        }

        if input.is_file() {
            paths.insert(input.clone());
            continue;
        }

        return Err(format!("Input path '{}' does not exist", input.display()));
    }

    if paths.is_empty() {
        return Err("No input files found".to_string());
    }
    Ok(paths.into_iter().collect())
}

fn is_batch_input(path: &Path) -> bool {
    let is_report = path.file_name() == Some(OsStr::new(BATCH_REPORT_FILE));
    let has_input_ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "txt" | "md" | "json"));
    has_input_ext && !is_report
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

fn sanitize_filename_segment(raw: &str) -> String {
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "routine".to_string()
    } else {
        trimmed.to_string()
    }
}
