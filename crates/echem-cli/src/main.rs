//! CLI mínima sobre el núcleo:
//! `echem-cli validate <FILE>`, `echem-cli generate --format <FMT> <FILE>`,
//! `echem-cli import <FILE>` y `echem-cli catalog`.
//!
//! FILE puede ser un documento de ingesta JSON (`{metadata, steps}`), un
//! ECDL generado (`_procedure`) o un protocolo YAML.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use echem_adapters::{generate, import_ecdl, import_yaml, ingest_document, ImportReport, OutputFormat};
use echem_core::{summarize_issues, validate_all};
use echem_domain::{catalog, ValidationIssue};
use echemflow::config::CONFIG;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "echem-cli", version, about = "Valida y exporta protocolos electroquímicos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Valida el procedimiento; sale con 1 si hay errores.
    Validate {
        file: PathBuf,
        /// Emite los issues como JSON.
        #[arg(long)]
        json: bool,
    },
    /// Genera el procedimiento en el formato pedido.
    Generate {
        #[arg(short, long, default_value = "yaml")]
        format: OutputFormat,
        file: PathBuf,
        /// Archivo de salida (por defecto stdout). Si es un directorio, el
        /// nombre sale del archivo de entrada más la extensión del formato.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Genera aunque la validación encuentre errores.
        #[arg(long)]
        force: bool,
    },
    /// Reconstruye steps desde YAML/ECDL y emite el documento de ingesta.
    Import { file: PathBuf },
    /// Lista las técnicas por categoría.
    Catalog,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[echem-cli] {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Validate { file, json } => {
            let report = load(&file)?;
            let issues = validate_all(&report.steps, &report.metadata);
            if json {
                println!("{}", serde_json::to_string_pretty(&issues)?);
            } else {
                print_issues(&issues);
            }
            Ok(exit_for(&issues))
        }
        Command::Generate { format, file, output, force } => {
            let report = load(&file)?;
            let issues = validate_all(&report.steps, &report.metadata);
            if summarize_issues(&issues).has_errors() && !force {
                print_issues(&issues);
                return Ok(ExitCode::from(1));
            }
            let text = generate(format, &report.metadata, &report.steps, &CONFIG.generator_options())?;
            match output {
                Some(path) => {
                    let path = output_path(path, &file, format);
                    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
                    log::info!("wrote {format} to {}", path.display());
                }
                None => println!("{text}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Import { file } => {
            let report = load(&file)?;
            let doc = json!({ "metadata": report.metadata, "steps": report.steps });
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Catalog => {
            for (category, techniques) in catalog().list_by_category() {
                println!("{category}");
                for def in techniques {
                    println!("  {:<10} {} ({})", def.id, def.name, def.abbreviation);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Carga el archivo según su extensión y contenido.
fn load(path: &Path) -> Result<ImportReport> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let is_yaml = matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"));
    let report = if is_yaml {
        import_yaml(&text)?
    } else {
        let doc: Value = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        if doc.get("_procedure").is_some() {
            import_ecdl(&text)?
        } else if doc.get("steps").is_some() {
            ingest_document(&doc)?
        } else {
            bail!("{}: neither an ingestion document nor an ECDL record", path.display());
        }
    };
    for skipped in &report.skipped {
        eprintln!("[echem-cli] skipped step {}: {}", skipped.index, skipped.reason);
    }
    Ok(report)
}

fn output_path(output: PathBuf, input: &Path, format: OutputFormat) -> PathBuf {
    if !output.is_dir() {
        return output;
    }
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("procedure");
    output.join(format!("{stem}.{}", format.extension()))
}

fn print_issues(issues: &[ValidationIssue]) {
    if issues.is_empty() {
        println!("OK: sin issues");
        return;
    }
    for issue in issues {
        let at = issue.step_index.map(|i| format!("step {i} ")).unwrap_or_default();
        let param = issue.param.as_deref().map(|p| format!(" ({p})")).unwrap_or_default();
        println!("{at}{:?} {}: {}{param}", issue.level, issue.code, issue.message);
    }
    let summary = summarize_issues(issues);
    println!("{} errores, {} advertencias", summary.errors.len(), summary.warnings.len());
}

fn exit_for(issues: &[ValidationIssue]) -> ExitCode {
    if summarize_issues(issues).has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
