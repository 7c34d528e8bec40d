//! JawSense engine CLI.
//!
//! Analyze recorded sleep sessions or drive a live one against the
//! synthetic simulator / a JSON-lines stream on stdin.

use chrono::Utc;
use clap::{Parser, Subcommand};
use jawsense_engine::{
    config::Config,
    core::{build_live_stats, build_report, Report},
    ingest::{load_session, Sample, SampleError, SessionBuffer, SessionSimulator, SimulatorConfig},
    narrative::session_context,
    telemetry::create_shared_counters_with_persistence,
    VERSION,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "jawsense")]
#[command(author = "JawSense")]
#[command(version = VERSION)]
#[command(about = "Bruxism episode classification engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recorded session and build its report
    Analyze {
        /// JSON-lines sample file, one {"t","emg","bpm"[,"temp"]} row per line
        #[arg(long, short)]
        input: PathBuf,

        /// Where to write the report JSON (defaults to the export directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Also print the narrative session context
        #[arg(long)]
        narrative: bool,
    },

    /// Run a live session and print a snapshot every tick
    Live {
        /// Generate synthetic samples instead of reading stdin
        #[arg(long)]
        simulate: bool,

        /// Seed for the simulator (deterministic session)
        #[arg(long)]
        seed: Option<u64>,

        /// Snapshot cadence in milliseconds (defaults to the configured tick)
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Stop automatically after this many seconds
        #[arg(long)]
        max_secs: Option<u64>,
    },

    /// Show cumulative telemetry and key configuration values
    Status,

    /// Show the resolved configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            narrative,
        } => cmd_analyze(&input, output, narrative),
        Commands::Live {
            simulate,
            seed,
            tick_ms,
            max_secs,
        } => cmd_live(simulate, seed, tick_ms, max_secs),
        Commands::Status => cmd_status(),
        Commands::Config => cmd_config(),
    }
}

fn cmd_analyze(input: &PathBuf, output: Option<PathBuf>, narrative: bool) {
    let config = Config::load().unwrap_or_default();

    let buffer = match load_session(input) {
        Ok(buffer) => buffer,
        Err(e) => {
            eprintln!("Error reading {input:?}: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Loaded {} samples ({} rejected) from {:?}",
        buffer.len(),
        buffer.rejected(),
        input
    );

    let report = build_report(
        buffer.session_id(),
        buffer.samples(),
        buffer.elapsed_secs(),
        &config.engine,
    );

    println!();
    println!("Session {}", report.session_id);
    println!("  Episodes:        {}", report.episode_count);
    println!("  Arousal-only:    {}", report.arousal_only.len());
    println!("  Stress:          {}%", report.stress_likelihood_pct);
    println!("  Quality score:   {}/100", report.sleep_quality_score);
    println!(
        "  Heart rate:      {:.1} bpm mean, {:.2} std dev",
        report.hr_mean, report.hr_std_dev
    );
    println!("  Peak EMG:        {:.0}", report.peak_emg);

    if narrative {
        println!();
        println!("{}", session_context(&report));
    }

    let output_path = output.unwrap_or_else(|| {
        config
            .export_path
            .join(format!("report_{}.json", Utc::now().format("%Y%m%d_%H%M%S")))
    });
    write_report(&report, &output_path);
}

fn cmd_live(simulate: bool, seed: Option<u64>, tick_ms: Option<u64>, max_secs: Option<u64>) {
    println!("JawSense Engine v{VERSION}");
    println!();

    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: could not create directories: {e}");
    }

    let tick_interval = tick_ms
        .map(Duration::from_millis)
        .unwrap_or(config.tick_interval);

    let counters =
        create_shared_counters_with_persistence(config.data_path.join("telemetry.json"));

    println!("Starting live session...");
    println!(
        "  Source: {}",
        if simulate { "simulator" } else { "stdin (JSON lines)" }
    );
    println!("  Tick interval: {}ms", tick_interval.as_millis());
    println!(
        "  Clench threshold: {} ADC for {}ms",
        config.engine.clench.threshold, config.engine.clench.min_duration_ms
    );
    println!();
    println!("Press Ctrl+C to stop and build the session report");
    println!();

    // Producer thread: simulator or stdin, feeding a bounded channel.
    // Sample ingestion never waits on classification.
    let (sender, receiver) = crossbeam_channel::bounded::<Sample>(10_000);
    if simulate {
        let sim_config = SimulatorConfig::default();
        let period = Duration::from_millis(sim_config.sample_period_ms);
        let mut simulator = match seed {
            Some(seed) => SessionSimulator::with_seed(sim_config, seed),
            None => SessionSimulator::new(sim_config),
        };
        thread::spawn(move || loop {
            if sender.send(simulator.next_sample()).is_err() {
                break;
            }
            thread::sleep(period);
        });
    } else {
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(_) => break,
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Sample>(line.trim()) {
                    Ok(sample) => {
                        if sender.send(sample).is_err() {
                            break;
                        }
                    }
                    Err(e) => eprintln!("[ingest] skipping malformed row: {e}"),
                }
            }
        });
    }

    let mut buffer = SessionBuffer::new();
    println!("Session ID: {}", buffer.session_id());

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let started = Instant::now();
    let mut last_tick = Instant::now();

    while running.load(Ordering::SeqCst) {
        if let Some(max) = max_secs {
            if started.elapsed() >= Duration::from_secs(max) {
                break;
            }
        }

        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(sample) => match buffer.push(sample) {
                Ok(()) => counters.record_sample_ingested(),
                Err(e @ SampleError::NonFinite { .. }) => {
                    counters.record_sample_rejected();
                    eprintln!("[ingest] dropped sample: {e}");
                }
                Err(e @ SampleError::OutOfOrder { .. }) => {
                    counters.record_sample_rejected();
                    eprintln!("[ingest] stream corrupt: {e}");
                    break;
                }
            },
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                println!("[ingest] stream ended");
                break;
            }
        }

        // Snapshot cadence is independent of sample arrival
        if last_tick.elapsed() >= tick_interval {
            let stats = build_live_stats(buffer.samples(), &config.engine);
            counters.record_tick_computed();

            println!(
                "[{}] {} samples | quality {} | stress {}% | hr {:.1} | {}{}",
                Utc::now().format("%H:%M:%S"),
                stats.sample_count,
                stats.sleep_quality_score,
                stats.stress_likelihood_pct,
                stats.current_hr,
                stats.current_band,
                if stats.is_clenching { " | CLENCHING" } else { "" }
            );
            last_tick = Instant::now();
        }
    }

    // Finalize: one-shot report over the closed buffer
    println!();
    println!("Building session report...");

    let report = build_report(
        buffer.session_id(),
        buffer.samples(),
        buffer.elapsed_secs(),
        &config.engine,
    );
    counters.record_report_built();

    let report_path = config.export_path.join(format!(
        "session_{}.json",
        Utc::now().format("%Y%m%d_%H%M%S")
    ));
    write_report(&report, &report_path);

    println!();
    println!("{}", session_context(&report));

    if let Err(e) = counters.save() {
        eprintln!("Warning: could not save telemetry: {e}");
    }
    println!("{}", counters.summary());
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("JawSense Engine Status");
    println!("======================");
    println!();
    println!("Configuration:");
    println!(
        "  Clench threshold: {} ADC for {}ms",
        config.engine.clench.threshold, config.engine.clench.min_duration_ms
    );
    println!(
        "  Arousal floor: {}% above baseline for {}ms",
        config.engine.arousal.activation_floor_pct, config.engine.arousal.min_duration_ms
    );
    println!("  Tick interval: {}ms", config.tick_interval.as_millis());
    println!("  Export path: {:?}", config.export_path);
    println!();

    let stats_path = config.data_path.join("telemetry.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative telemetry:");
                if let Some(n) = stats.get("samples_ingested") {
                    println!("  Samples ingested: {n}");
                }
                if let Some(n) = stats.get("samples_rejected") {
                    println!("  Samples rejected: {n}");
                }
                if let Some(n) = stats.get("ticks_computed") {
                    println!("  Snapshots computed: {n}");
                }
                if let Some(n) = stats.get("reports_built") {
                    println!("  Reports built: {n}");
                }
            }
        }
    } else {
        println!("No previous session telemetry found.");
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

fn write_report(report: &Report, path: &PathBuf) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match serde_json::to_string_pretty(report) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Error writing report: {e}");
            } else {
                println!("Report written to {path:?}");
            }
        }
        Err(e) => eprintln!("Error serializing report: {e}"),
    }
}
