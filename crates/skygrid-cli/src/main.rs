// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use skygrid_core::forecast::ForecastReport;
use skygrid_core::render::{self, MapKind};
use skygrid_core::{ConfigParser, IngestSession};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario configuration file to process at startup
    #[arg(short, long, env = "SKYGRID_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let mut session = match &cli.config {
        Some(path) => load_scenario(path),
        None => None,
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print_menu();
        let Some(line) = read_line(&mut input)? else {
            break;
        };
        let choice = line.trim();

        match choice {
            "1" => {
                print!("Please enter file name: ");
                io::stdout().flush()?;
                let Some(name) = read_line(&mut input)? else {
                    break;
                };
                session = load_scenario(Path::new(name.trim()));
            }
            "2" | "3" | "4" | "5" | "6" => {
                let Some(active) = session.as_ref() else {
                    refuse();
                    continue;
                };
                let kind = match choice {
                    "2" => MapKind::City,
                    "3" => MapKind::CloudIndex,
                    "4" => MapKind::CloudLevel,
                    "5" => MapKind::PressureIndex,
                    _ => MapKind::PressureLevel,
                };
                println!("Display {}", kind.title());
                print!("{}", render::render_map(&active.grid, kind));
                wait_for_enter(&mut input)?;
            }
            "7" => {
                let Some(active) = session.as_ref() else {
                    refuse();
                    continue;
                };
                print!("{}", render::render_summary(&active.registry));
                wait_for_enter(&mut input)?;
            }
            "8" => {
                let Some(active) = session.as_ref() else {
                    refuse();
                    continue;
                };
                if let Err(e) = export_summary(&mut input, active) {
                    println!("Error: {e:#}\n");
                }
            }
            "9" => {
                println!("Exiting...");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }

    Ok(())
}

fn print_menu() {
    println!("--------------------------------------------------");
    println!(" Welcome to Weather Information Processing System");
    println!("1.\tRead and Process configuration file");
    println!("2.\tDisplay City Map");
    println!("3.\tDisplay Cloud Coverage Map (Cloudiness Index)");
    println!("4.\tDisplay Cloud Coverage Map (LMH Symbol)");
    println!("5.\tDisplay Atmospheric Pressure Map (Pressure Index)");
    println!("6.\tDisplay Atmospheric Pressure Map (LMH Symbol)");
    println!("7.\tShow Weather Forecast Summary");
    println!("8.\tExport Weather Forecast Summary (JSON)");
    println!("9.\tExit");
    print!("Please enter your choice (1-9): ");
    let _ = io::stdout().flush();
}

fn refuse() {
    println!("Error: you must read and process a configuration file first (option 1)!\n");
}

/// Parses the configuration and runs the full ingestion pass, narrating
/// progress the way the menu user expects. Every failure is reported and
/// leaves the menu running.
fn load_scenario(path: &Path) -> Option<IngestSession> {
    let config = match ConfigParser::parse_file(path) {
        Ok(config) => config,
        Err(e) => {
            println!("Error: unable to open file ({e})! Please try again!\n");
            return None;
        }
    };

    println!(
        "Reading in GridX_IdxRange: {}-{} ... done!",
        config.bounds.x_min, config.bounds.x_max
    );
    println!(
        "Reading in GridY_IdxRange: {}-{} ... done!",
        config.bounds.y_min, config.bounds.y_max
    );
    println!();
    println!("Storing data from input file:");

    let mut session = IngestSession::new(config.bounds);
    for (kind, source) in config.sources() {
        let Some(source) = source else {
            println!("{} not found in configuration", kind.file_name());
            continue;
        };
        match session.ingest_file(source, kind) {
            Ok(stats) => println!(
                "{}...done ({} records, {} skipped)",
                kind.file_name(),
                stats.stored,
                stats.skipped
            ),
            Err(e) => println!("{}...failed: {}", kind.file_name(), e),
        }
    }
    session.finalize();

    println!();
    println!("All records successfully stored. Going back to main menu ...");
    println!();
    Some(session)
}

fn export_summary<R: BufRead>(input: &mut R, session: &IngestSession) -> Result<()> {
    print!("Enter output path [forecast_summary.json]: ");
    io::stdout().flush()?;
    let Some(line) = read_line(input)? else {
        return Ok(());
    };
    let trimmed = line.trim();
    let path = if trimmed.is_empty() {
        Path::new("forecast_summary.json")
    } else {
        Path::new(trimmed)
    };

    let report = ForecastReport::from_registry(&session.registry);
    report
        .save(path)
        .with_context(|| format!("exporting forecast summary to {}", path.display()))?;
    println!("Forecast summary written to {}\n", path.display());
    Ok(())
}

fn wait_for_enter<R: BufRead>(input: &mut R) -> Result<()> {
    println!();
    print!("Press <Enter> to go back to main menu ... ");
    io::stdout().flush()?;
    let _ = read_line(input)?;
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf))
}
