use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use menu_parser::parser::lines::{classify, LineContext};
use menu_parser::parser::normalize::normalize;
use menu_parser::{Acquirer, MenuParser, ParseResult, Settings, SourceType};

const BATCH_CHUNK: usize = 64;

#[derive(Parser)]
#[command(name = "menu-parser", about = "Turn menu documents into structured JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one document and print the result as JSON
    Parse {
        file: PathBuf,
        /// Override the source type guessed from the file extension
        #[arg(short = 't', long, value_enum)]
        source_type: Option<SourceType>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Show how each cleaned line is classified
    Lines {
        file: PathBuf,
        #[arg(short = 't', long, value_enum)]
        source_type: Option<SourceType>,
    },
    /// Parse many documents in parallel and print a summary table
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write every result to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("loading settings")?;
    let parser = MenuParser::from_settings(&settings);
    let acquirer = Acquirer::from_settings(&settings);

    let result = match cli.command {
        Commands::Parse {
            file,
            source_type,
            compact,
        } => {
            let source_type = resolve_source_type(&file, source_type)?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let result = parser.parse_document(bytes, source_type, &acquirer).await;
            let json = if compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            println!("{json}");
            Ok(())
        }
        Commands::Lines { file, source_type } => {
            let source_type = resolve_source_type(&file, source_type)?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let acquired = acquirer.acquire(bytes, source_type).await?;
            for note in &acquired.diagnostics {
                println!("# {note}");
            }

            let cleaned = normalize(&acquired.text, acquired.source_type);
            let lines: Vec<&str> = cleaned.lines().collect();
            for (i, line) in lines.iter().enumerate() {
                let kind = classify(line, LineContext::at(&lines, i));
                println!("{:>4} | {:<12} | {}", i + 1, format!("{kind:?}"), truncate(line, 80));
            }
            Ok(())
        }
        Commands::Batch { files, report } => {
            let rows = tokio::task::spawn_blocking(move || parse_batch(&parser, &acquirer, &files))
                .await
                .context("batch worker panicked")??;
            print_table(&rows);
            if let Some(path) = report {
                write_report(&path, &rows)?;
                println!("\nReport written to {}", path.display());
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn resolve_source_type(file: &Path, explicit: Option<SourceType>) -> anyhow::Result<SourceType> {
    if let Some(source_type) = explicit {
        return Ok(source_type);
    }
    let ext = file.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match SourceType::from_extension(ext) {
        Some(source_type) => Ok(source_type),
        None => bail!(
            "cannot tell the document type of {}; pass --source-type",
            file.display()
        ),
    }
}

#[derive(Serialize)]
struct BatchRow {
    file: String,
    result: ParseResult,
}

fn parse_one(parser: &MenuParser, acquirer: &Acquirer, file: &Path) -> BatchRow {
    let name = file.display().to_string();
    let source_type = match resolve_source_type(file, None) {
        Ok(t) => t,
        Err(e) => {
            return BatchRow {
                file: name,
                result: ParseResult::failed(
                    menu_parser::parser::METHOD,
                    SourceType::Text,
                    1,
                    e.to_string(),
                    None,
                ),
            }
        }
    };

    let acquired = std::fs::read(file)
        .map_err(|e| e.to_string())
        .and_then(|bytes| {
            acquirer
                .acquire_blocking(&bytes, source_type)
                .map_err(|e| e.to_string())
        });
    let result = match acquired {
        Ok(acquired) => parser.parse_text(&acquired.text, acquired.source_type),
        Err(e) => ParseResult::failed(menu_parser::parser::METHOD, source_type, 1, e, None),
    };
    BatchRow { file: name, result }
}

fn parse_batch(
    parser: &MenuParser,
    acquirer: &Acquirer,
    files: &[PathBuf],
) -> anyhow::Result<Vec<BatchRow>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut rows = Vec::with_capacity(files.len());
    for chunk in files.chunks(BATCH_CHUNK) {
        let results: Vec<BatchRow> = chunk
            .par_iter()
            .map(|file| parse_one(parser, acquirer, file))
            .collect();
        rows.extend(results);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(rows)
}

fn print_table(rows: &[BatchRow]) {
    println!(
        "{:>3} | {:<32} | {:<5} | {:>8} | {:>5} | {:>5} | {:<9} | {:<30}",
        "#", "File", "Type", "Sections", "Items", "Conf", "Quality", "Error"
    );
    println!("{}", "-".repeat(115));

    for (i, row) in rows.iter().enumerate() {
        let r = &row.result;
        let error = r.error.as_deref().map(|e| truncate(e, 30)).unwrap_or_default();
        println!(
            "{:>3} | {:<32} | {:<5} | {:>8} | {:>5} | {:>5.1} | {:<9} | {:<30}",
            i + 1,
            truncate(&row.file, 32),
            r.parsing_info.source_type.as_str(),
            r.total_sections,
            r.total_items,
            r.parsing_info.confidence,
            r.summary.parsing_quality.to_string(),
            error
        );
    }

    let ok = rows.iter().filter(|r| r.result.success).count();
    let items: usize = rows.iter().map(|r| r.result.total_items).sum();
    println!("\n{} documents | {} parsed | {} failed | {} items", rows.len(), ok, rows.len() - ok, items);
}

#[derive(Serialize)]
struct BatchReport<'a> {
    generated_at: DateTime<Utc>,
    documents: usize,
    succeeded: usize,
    results: &'a [BatchRow],
}

fn write_report(path: &Path, rows: &[BatchRow]) -> anyhow::Result<()> {
    let report = BatchReport {
        generated_at: Utc::now(),
        documents: rows.len(),
        succeeded: rows.iter().filter(|r| r.result.success).count(),
        results: rows,
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
