//! Melee match capture CLI
//!
//! A command-line interface for replaying, validating, and summarizing
//! captured match streams.
//!
//! ## Commands
//!
//! - `info` - Display quick capture metadata
//! - `replay` - Replay a capture and print per-player statistics
//! - `validate` - Validate capture framing and decoding (exit codes for scripting)
//! - `batch` - Process multiple captures from a directory

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use melee_stats::capture::CaptureIterator;
use melee_stats::ids::{character_name, stage_name};
use melee_stats::session::{replay, Outcome, Replay, Session};
use melee_stats::summary::{MatchSummary, SummaryOptions};
use melee_stats::Config;

/// Captured Melee match stream tool
#[derive(Parser)]
#[command(name = "melee-stats")]
#[command(about = "Melee match capture decoder and statistics", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display capture information
    Info {
        /// Path to the capture file
        file: PathBuf,
    },
    /// Replay a capture and compute statistics
    Replay {
        /// Path to the capture file
        file: PathBuf,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
        /// Include every combo string
        #[arg(long)]
        combos: bool,
        /// Include every recovery
        #[arg(long)]
        recoveries: bool,
    },
    /// Validate capture format
    Validate {
        /// Path to the capture file
        file: PathBuf,
        /// Verbose error reporting
        #[arg(short, long)]
        verbose: bool,
    },
    /// Replay multiple capture files
    Batch {
        /// Directory containing capture files
        directory: PathBuf,
        /// Output directory for JSON files
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Generate summary report
        #[arg(long)]
        summary: bool,
        /// Continue on errors
        #[arg(long)]
        continue_on_error: bool,
    },
}

/// Output format options
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

/// File extension of capture files picked up by `batch`.
const CAPTURE_EXTENSION: &str = "bin";

// ============================================================================
// Serializable Output Structures
// ============================================================================

#[derive(Serialize)]
struct ReplayOutput {
    file_size: usize,
    records: usize,
    ignored_records: usize,
    matches: Vec<MatchSummary>,
}

#[derive(Serialize)]
struct BatchSummary {
    total_files: usize,
    successful: usize,
    failed: usize,
    total_matches: usize,
    stage_distribution: HashMap<String, usize>,
    character_distribution: HashMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    average_duration_seconds: Option<f32>,
}

// ============================================================================
// Validation Result Structure
// ============================================================================

struct ValidationResult {
    framing_valid: bool,
    decoding_valid: bool,
    records: usize,
    matches: usize,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn is_valid(&self) -> bool {
        self.framing_valid && self.decoding_valid
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Info { file } => cmd_info(&file, &config),
        Commands::Replay {
            file,
            output,
            combos,
            recoveries,
        } => cmd_replay(
            &file,
            &config,
            &output,
            SummaryOptions {
                combo_strings: combos,
                recoveries,
            },
        ),
        Commands::Validate { file, verbose } => cmd_validate(&file, &config, verbose),
        Commands::Batch {
            directory,
            output,
            summary,
            continue_on_error,
        } => cmd_batch(&directory, &config, output, summary, continue_on_error),
    }
}

// ============================================================================
// Info Command Implementation
// ============================================================================

fn cmd_info(file: &Path, config: &Config) -> ExitCode {
    let data = match std::fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let replayed = match replay(&data, config.clone()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error replaying capture: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_info(&replayed, data.len(), config);
    ExitCode::SUCCESS
}

#[allow(clippy::cast_precision_loss)]
fn print_info(replayed: &Replay, file_size: usize, config: &Config) {
    println!("=== Capture Information ===\n");

    println!("File:");
    println!(
        "  Size: {} bytes ({:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );
    println!("  Records: {}", replayed.records);
    println!("  Ignored records: {}", replayed.ignored);
    println!("  Matches: {}", replayed.matches.len());

    for (index, game) in replayed.matches.iter().enumerate() {
        println!("\nMatch {}:", index + 1);
        println!(
            "  Stage: {} ({})",
            stage_name(game.stage_id()).unwrap_or("Unknown"),
            game.stage_id()
        );
        println!(
            "  Frames: {} ({:.1}s), {} missed",
            game.frame_counter(),
            game.frame_counter() as f32 / config.frames_per_second as f32,
            game.frames_missed()
        );
        match game.win_condition() {
            Some(condition) => println!("  Win condition: {}", condition),
            None => println!("  Win condition: (no End message)"),
        }
        for player in game.players() {
            println!(
                "  Port {}: {} (color {})",
                player.controller_port(),
                character_name(player.character_id()).unwrap_or("Unknown"),
                player.identity().character_color
            );
        }
    }
}

// ============================================================================
// Replay Command Implementation
// ============================================================================

fn cmd_replay(
    file: &Path,
    config: &Config,
    output: &OutputFormat,
    options: SummaryOptions,
) -> ExitCode {
    let data = match std::fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output_data = match build_output(&data, config, options) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        OutputFormat::Json => print_json(&output_data),
        OutputFormat::Pretty => print_pretty(&output_data),
    }

    ExitCode::SUCCESS
}

fn build_output(
    data: &[u8],
    config: &Config,
    options: SummaryOptions,
) -> Result<ReplayOutput, String> {
    let replayed = replay(data, config.clone()).map_err(|e| format!("Replay failed: {}", e))?;

    Ok(ReplayOutput {
        file_size: data.len(),
        records: replayed.records,
        ignored_records: replayed.ignored,
        matches: replayed
            .matches
            .iter()
            .map(|game| MatchSummary::from_match(game, config, options))
            .collect(),
    })
}

fn print_json(output: &ReplayOutput) {
    match serde_json::to_string_pretty(output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}

fn print_pretty(output: &ReplayOutput) {
    println!("=== Capture ===");
    println!("File Size: {} bytes", output.file_size);
    println!("Records: {} ({} ignored)", output.records, output.ignored_records);

    for (index, game) in output.matches.iter().enumerate() {
        println!("\n=== Match {} ===", index + 1);
        println!("Stage: {}", game.stage_name.unwrap_or("Unknown"));
        println!(
            "Duration: {:.1}s ({} frames, {} missed)",
            game.duration_seconds, game.frames, game.frames_missed
        );
        if let Some(condition) = game.win_condition {
            println!("Win condition: {}", condition);
        }

        for player in &game.players {
            println!(
                "\nPort {} ({}):",
                player.port,
                player.character_name.unwrap_or("Unknown")
            );
            println!("  Stocks remaining: {}", player.stocks_remaining);
            println!("  APM: {:.1}", player.apm);
            println!("  Openings: {}", player.number_of_openings);
            println!(
                "  Avg string: {:.1}% / {:.1} hits / {:.2}s",
                player.average_damage_per_string,
                player.average_hits_per_string,
                player.average_seconds_per_string
            );
            println!(
                "  Best string: {:.1}% / {} hits / {:.2}s",
                player.most_damage_string, player.most_hits_string, player.most_seconds_string
            );
            println!(
                "  Recoveries: {}/{} (avg {:.1}% taken)",
                player.successful_recoveries,
                player.recovery_attempts,
                player.average_edgeguard_damage_taken
            );
            println!(
                "  Edgeguards: {}/{}",
                player.edgeguard_conversions, player.edgeguard_chances
            );
            println!(
                "  Rolls: {}, spot dodges: {}, air dodges: {}",
                player.roll_count, player.spot_dodge_count, player.air_dodge_count
            );
            println!("  Time in shield: {:.1}%", player.percent_time_in_shield);
            println!(
                "  Above opponent: {:.1}%, closest to center: {:.1}% (avg distance {:.1})",
                player.percent_time_above_opponent,
                player.percent_time_closest_center,
                player.average_distance_from_center
            );
            if player.character_usage.len() > 1 {
                for (id, share) in &player.character_usage {
                    println!("  Internal character 0x{:02X}: {:.1}%", id, share);
                }
            }

            for (stock_index, stock) in player.stocks.iter().enumerate() {
                if stock.is_stock_lost {
                    println!(
                        "  Stock {}: lost at {:.1}s, {:.1}%, {} openings allowed",
                        stock_index + 1,
                        stock.time_seconds,
                        stock.percent,
                        stock.openings_allowed
                    );
                }
            }

            if let Some(combos) = &player.combo_strings {
                println!("  Combo strings ({}):", combos.len());
                for combo in combos {
                    println!(
                        "    [frame {}-{}] {} hits, {:.1}% -> {:.1}%",
                        combo.start_frame,
                        combo.end_frame,
                        combo.hit_count,
                        combo.start_percent,
                        combo.end_percent
                    );
                }
            }

            if let Some(recoveries) = &player.recoveries {
                println!("  Recoveries ({}):", recoveries.len());
                for recovery in recoveries {
                    println!(
                        "    [frame {}-{}] {} {:.1}% -> {:.1}%",
                        recovery.start_frame,
                        recovery.end_frame,
                        if recovery.is_successful { "made it" } else { "died" },
                        recovery.start_percent,
                        recovery.end_percent
                    );
                }
            }
        }
    }
}

// ============================================================================
// Validate Command Implementation
// ============================================================================

fn cmd_validate(file: &Path, config: &Config, verbose: bool) -> ExitCode {
    let result = validate_capture(file, config);

    if verbose {
        print_validation_details(&result, file);
    } else {
        print_validation_summary(&result, file);
    }

    if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn validate_capture(file: &Path, config: &Config) -> ValidationResult {
    let mut result = ValidationResult {
        framing_valid: false,
        decoding_valid: false,
        records: 0,
        matches: 0,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    // Step 1: Read file
    let data = match std::fs::read(file) {
        Ok(d) => d,
        Err(e) => {
            result.errors.push(format!("Failed to read file: {}", e));
            return result;
        }
    };

    // Step 2: Validate framing
    let mut payloads = Vec::new();
    let mut records = CaptureIterator::new(&data);
    loop {
        let offset = records.current_offset();
        match records.next() {
            None => break,
            Some(Ok(payload)) => payloads.push(payload),
            Some(Err(e)) => {
                result
                    .errors
                    .push(format!("Framing error at offset 0x{:X}: {}", offset, e));
                return result;
            }
        }
    }
    result.framing_valid = true;
    result.records = payloads.len();

    // Step 3: Validate decoding
    let mut session = Session::new(config.clone());
    let mut decode_errors = 0;
    for (index, payload) in payloads.iter().enumerate() {
        match session.process(payload) {
            Ok(Outcome::Started) => {
                if session
                    .current_match()
                    .is_some_and(|game| game.stage().bounds().is_none())
                {
                    result
                        .warnings
                        .push(format!("Record {}: stage has no boundary data", index));
                }
                result.matches += 1;
            }
            Ok(Outcome::Ignored(reason)) => {
                result
                    .warnings
                    .push(format!("Record {}: ignored ({})", index, reason.to_error()));
            }
            Ok(_) => {}
            Err(e) => {
                decode_errors += 1;
                result.errors.push(format!("Record {}: {}", index, e));
            }
        }
    }
    result.decoding_valid = decode_errors == 0;

    if result.matches == 0 {
        result.warnings.push("No matches found in capture".to_string());
    }
    if let Some(game) = session.current_match() {
        if !game.is_finished() {
            result
                .warnings
                .push("Last match has no End message".to_string());
        }
        if game.frames_missed() > 0 {
            result
                .warnings
                .push(format!("Last match missed {} frames", game.frames_missed()));
        }
    }

    result
}

fn print_validation_summary(result: &ValidationResult, file: &Path) {
    let status = if result.is_valid() { "VALID" } else { "INVALID" };
    println!("{}: {}", file.display(), status);
}

fn print_validation_details(result: &ValidationResult, file: &Path) {
    println!("Validating: {}\n", file.display());

    println!("Checks:");
    println!("  Record framing:    {}", status_icon(result.framing_valid));
    println!("  Message decoding:  {}", status_icon(result.decoding_valid));
    println!("  Records:           {}", result.records);
    println!("  Matches:           {}", result.matches);

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in &result.errors {
            println!("  - {}", error);
        }
    }

    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    println!(
        "\nResult: {}",
        if result.is_valid() { "VALID" } else { "INVALID" }
    );
}

fn status_icon(valid: bool) -> &'static str {
    if valid {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

// ============================================================================
// Batch Command Implementation
// ============================================================================

fn cmd_batch(
    directory: &Path,
    config: &Config,
    output_dir: Option<PathBuf>,
    summary: bool,
    continue_on_error: bool,
) -> ExitCode {
    let captures = find_captures(directory);

    if captures.is_empty() {
        eprintln!("No .{} files found in {}", CAPTURE_EXTENSION, directory.display());
        return ExitCode::FAILURE;
    }

    eprintln!("Found {} capture files", captures.len());

    if let Some(ref dir) = output_dir {
        if !dir.exists() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Failed to create output directory: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let mut results: Vec<ReplayOutput> = Vec::new();
    let mut error_count = 0;

    for capture in &captures {
        eprint!(
            "Processing {}... ",
            capture.file_name().unwrap_or_default().to_string_lossy()
        );

        match process_capture(capture, config, output_dir.as_deref()) {
            Ok(output) => {
                eprintln!("OK ({} matches)", output.matches.len());
                results.push(output);
            }
            Err(e) => {
                eprintln!("ERROR: {}", e);
                error_count += 1;
                if !continue_on_error {
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    eprintln!(
        "\nProcessed: {} success, {} errors",
        results.len(),
        error_count
    );

    if summary {
        generate_summary(&results, error_count, output_dir.as_deref());
    }

    ExitCode::SUCCESS
}

fn find_captures(directory: &Path) -> Vec<PathBuf> {
    let mut captures = Vec::new();
    if let Ok(entries) = std::fs::read_dir(directory) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == CAPTURE_EXTENSION) {
                captures.push(path);
            }
        }
    }
    captures.sort();
    captures
}

fn process_capture(
    capture: &Path,
    config: &Config,
    output_dir: Option<&Path>,
) -> Result<ReplayOutput, String> {
    let data = std::fs::read(capture).map_err(|e| e.to_string())?;
    let output = build_output(&data, config, SummaryOptions::default())?;

    if let Some(dir) = output_dir {
        let output_file = dir
            .join(capture.file_stem().unwrap_or_default())
            .with_extension("json");
        let content = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
        std::fs::write(&output_file, content).map_err(|e| e.to_string())?;
    }

    Ok(output)
}

#[allow(clippy::cast_precision_loss)]
fn generate_summary(results: &[ReplayOutput], failed: usize, output_dir: Option<&Path>) {
    let matches: Vec<&MatchSummary> = results.iter().flat_map(|r| &r.matches).collect();

    let mut stage_distribution: HashMap<String, usize> = HashMap::new();
    let mut character_distribution: HashMap<String, usize> = HashMap::new();
    for game in &matches {
        let stage = game.stage_name.unwrap_or("Unknown").to_string();
        *stage_distribution.entry(stage).or_insert(0) += 1;
        for player in &game.players {
            let character = player.character_name.unwrap_or("Unknown").to_string();
            *character_distribution.entry(character).or_insert(0) += 1;
        }
    }

    let average_duration_seconds = if matches.is_empty() {
        None
    } else {
        Some(matches.iter().map(|m| m.duration_seconds).sum::<f32>() / matches.len() as f32)
    };

    let summary = BatchSummary {
        total_files: results.len() + failed,
        successful: results.len(),
        failed,
        total_matches: matches.len(),
        stage_distribution,
        character_distribution,
        average_duration_seconds,
    };

    println!("\n=== Batch Summary ===");
    println!("Files processed: {}", summary.total_files);
    println!("Successful: {}", summary.successful);
    println!("Matches: {}", summary.total_matches);

    println!("\nStage distribution:");
    for (stage, count) in &summary.stage_distribution {
        println!("  {}: {}", stage, count);
    }

    println!("\nCharacter distribution:");
    for (character, count) in &summary.character_distribution {
        println!("  {}: {}", character, count);
    }

    if let Some(avg) = summary.average_duration_seconds {
        let minutes = (avg / 60.0).floor();
        let seconds = avg - minutes * 60.0;
        println!("\nAverage duration: {:02}:{:02.0}", minutes, seconds);
    }

    if let Some(dir) = output_dir {
        let summary_file = dir.join("summary.json");
        if let Ok(json) = serde_json::to_string_pretty(&summary) {
            if std::fs::write(&summary_file, json).is_ok() {
                println!("\nSummary written to: {}", summary_file.display());
            }
        }
    }
}
