use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use slate::{
    load_merge_input, merge_documents, merged_file_name, parse_document, read_document_file,
    render_report, validate_document, write_merged_file, Section, Stage1Document,
};

#[derive(Parser)]
#[command(name = "slate")]
#[command(author, version, about = "Stage 1 film production document toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a Stage 1 document and print its diagnostics
    Validate {
        /// Input document (Stage 1 JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Emit the raw validation report as JSON
        #[arg(long)]
        json: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Merge several Stage 1 documents sharing one film_id
    Merge {
        /// Input documents; the scenario-bearing file may appear anywhere
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,

        /// Output file (defaults to <film_id>_stage1_v1.1.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize a document: step, viewable sections, content counts
    Inspect {
        /// Input document (Stage 1 JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            input,
            json,
            verbose,
        } => {
            setup_logging(verbose);
            validate_file(input, json)
        }
        Commands::Merge {
            input,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            merge_files(&input, output)
        }
        Commands::Inspect { input, verbose } => {
            setup_logging(verbose);
            inspect_file(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn validate_file(input: PathBuf, as_json: bool) -> Result<ExitCode> {
    info!("Validating {:?}", input);
    let (_, raw) = read_document_file(&input)?;

    let (mut report, document) = parse_document(&raw);
    if let Some(document) = &document {
        report.diagnostics.extend(validate_document(document));
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report(&report));
    }

    Ok(if report.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn merge_files(paths: &[PathBuf], output: Option<PathBuf>) -> Result<ExitCode> {
    let mut inputs = Vec::new();
    for path in paths {
        let (report, input) = load_merge_input(path)?;
        match input {
            Some(input) => {
                if report.repair_count > 0 {
                    info!(
                        "{}: {} syntax fix(es) applied during load",
                        input.name, report.repair_count
                    );
                }
                inputs.push(input);
            }
            None => {
                warn!("Skipping {:?}: not parseable as JSON", path);
                for diagnostic in &report.diagnostics {
                    warn!("  {}", diagnostic.message);
                }
            }
        }
    }

    if inputs.is_empty() {
        anyhow::bail!("none of the input files could be parsed");
    }

    info!("Merging {} file(s)", inputs.len());
    let outcome = merge_documents(&inputs);

    for warning in &outcome.warnings {
        warn!("{warning}");
    }
    if !outcome.success {
        for error in &outcome.errors {
            eprintln!("merge failed: {error}");
        }
        return Ok(ExitCode::from(1));
    }

    let merged = match outcome.merged {
        Some(merged) => merged,
        None => anyhow::bail!("merge reported success without a document"),
    };

    // The merged document re-enters the validation path
    let (mut report, _) = parse_document(&merged.to_value().to_string());
    report.diagnostics.extend(validate_document(&merged));
    println!("{}", render_report(&report));

    let output = output.unwrap_or_else(|| PathBuf::from(merged_file_name(&merged)));
    write_merged_file(&merged, &output)?;
    info!("Merged document written to {:?}", output);

    Ok(ExitCode::SUCCESS)
}

fn inspect_file(input: PathBuf) -> Result<ExitCode> {
    let (name, raw) = read_document_file(&input)?;
    let (report, document) = parse_document(&raw);

    let document = match document {
        Some(document) => document,
        None => {
            println!("{}", render_report(&report));
            return Ok(ExitCode::from(1));
        }
    };

    println!("Document Summary");
    println!("================");
    println!("File: {name}");
    println!("Film: {}", document.film_id().unwrap_or("(missing)"));
    match document.step() {
        Some(step) => println!("Step: {step}"),
        None => println!("Step: (missing or unrecognized)"),
    }
    if report.repair_count > 0 {
        println!("Auto-repair: {} syntax fix(es) applied", report.repair_count);
    }
    println!();

    println!("Sections");
    println!("--------");
    for section in Section::ALL {
        let status = match document.step() {
            None => "locked (no recognized step)",
            Some(step) if step < section.available_from() => "locked (later step)",
            Some(_) if !section_has_content(&document, section) => "empty",
            Some(_) => "viewable",
        };
        println!("{:<12} {status}", section.label());
    }
    println!();

    let work = document.current_work();
    if let Some(scenario) = &work.scenario {
        println!(
            "Scenario: {} ({} scenes)",
            scenario.scenario_title.as_deref().unwrap_or("(untitled)"),
            scenario.scenes.len()
        );
    }
    let blocks = document.visual_blocks();
    println!(
        "Assets: {} characters, {} locations, {} props",
        blocks.characters.len(),
        blocks.locations.len(),
        blocks.props.len()
    );

    Ok(ExitCode::SUCCESS)
}

/// Whether a section has anything to show, mirroring viewer gating
fn section_has_content(document: &Stage1Document, section: Section) -> bool {
    let work = document.current_work();
    let blocks = document.visual_blocks();
    match section {
        Section::Metadata => true,
        Section::Synopsis => work.logline.is_some() || work.synopsis.is_some(),
        Section::Treatment => work.treatment.as_ref().is_some_and(|treatment| {
            treatment.treatment_title.is_some() || !treatment.sequences.is_empty()
        }),
        Section::Scenario => work
            .scenario
            .as_ref()
            .is_some_and(|scenario| !scenario.scenes.is_empty()),
        Section::Characters => !blocks.characters.is_empty(),
        Section::Locations => !blocks.locations.is_empty(),
        Section::Props => !blocks.props.is_empty(),
    }
}
