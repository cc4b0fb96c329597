//! # daq_latency_cli
//!
//! Part of the daq_latency crate family.
//!
//! Measure trigger latencies from a DAQ log and plot them.
//!
//! ## Use
//!
//! ```bash
//! daq_latency_cli tp-td -f daq.log -o saved_plots
//! daq_latency_cli ta-dr -f daq.log
//! daq_latency_cli tp-display -f tps.txt
//! daq_latency_cli new -p config.yml
//! daq_latency_cli run -p config.yml
//! ```
use clap::{Arg, ArgMatches, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use libdaq_latency::analysis::{process, stage_count};
use libdaq_latency::config::{Analysis, Config};
use libdaq_latency::error::ConfigError;

fn file_args(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .required(true)
                .help("DAQ log file input"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Plot output directory (must exist)"),
        )
}

fn config_args(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(
        Arg::new("path")
            .short('p')
            .long("path")
            .required(true)
            .help("Path to the config file"),
    )
}

fn config_from_file_args(matches: &ArgMatches, analysis: Analysis) -> Config {
    // file is required by clap
    let log_path = matches
        .get_one::<String>("file")
        .map(PathBuf::from)
        .unwrap_or_default();
    let plot_path = matches.get_one::<String>("output").map(PathBuf::from);
    Config::new(&log_path, plot_path.as_deref(), analysis)
}

fn make_template_config(path: &Path) -> Result<(), ConfigError> {
    Config::default().write_config_file(path)
}

fn main() -> ExitCode {
    // Create a cli
    let matches = Command::new("daq_latency_cli")
        .about("Sterilize DAQ log to get the latency timestamps")
        .arg_required_else_help(true)
        .subcommand(file_args(
            "tp-td",
            "Measure TP insertion -> TD send-out latencies",
        ))
        .subcommand(file_args(
            "ta-dr",
            "Measure TA buffer insertion -> data request latencies and TPSet lateness",
        ))
        .subcommand(file_args("tp-display", "Plot a TP dump as channel vs. time"))
        .subcommand(config_args("new", "Make a template configuration yaml file"))
        .subcommand(config_args("run", "Run the analysis described by a configuration yaml file"))
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
        return ExitCode::FAILURE;
    }
    log::set_max_level(simplelog::LevelFilter::Info);

    // Parse the cli
    let config = match matches.subcommand() {
        Some(("tp-td", sub)) => config_from_file_args(sub, Analysis::TpToTd),
        Some(("ta-dr", sub)) => config_from_file_args(sub, Analysis::TaToDr),
        Some(("tp-display", sub)) => config_from_file_args(sub, Analysis::TpDisplay),
        Some(("new", sub)) => {
            let config_path = sub
                .get_one::<String>("path")
                .map(PathBuf::from)
                .unwrap_or_default();
            log::info!(
                "Making a template config at {}...",
                config_path.to_string_lossy()
            );
            return match make_template_config(&config_path) {
                Ok(()) => {
                    log::info!("Done.");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    log::error!("{e}");
                    ExitCode::FAILURE
                }
            };
        }
        Some(("run", sub)) => {
            let config_path = sub
                .get_one::<String>("path")
                .map(PathBuf::from)
                .unwrap_or_default();
            log::info!("Loading config from {}...", config_path.to_string_lossy());
            match Config::read_config_file(&config_path) {
                Ok(c) => c,
                Err(e) => {
                    log::error!("{e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        _ => return ExitCode::FAILURE,
    };

    log::info!("Input Path: {}", config.log_path.to_string_lossy());
    log::info!("Plot Path: {}", config.plot_path.to_string_lossy());
    log::info!("Analysis: {:?}", config.analysis);

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(stage_count(config.analysis)));
    if let Ok(style) = ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        pb.set_style(style);
    }

    let result = process(&config, &mut |stage| {
        pb.set_message(stage.to_string());
        pb.inc(1);
    });
    pb.finish();

    match result {
        Ok(written) => {
            log::info!("Wrote {} plots.", written.len());
            log::info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Latency measurement failed with error: {e}");
            ExitCode::FAILURE
        }
    }
}
