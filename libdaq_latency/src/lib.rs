//! # daq_latency
//!
//! daq_latency measures trigger latencies from DAQ log files, written in Rust. It scans
//! the plain-text logs of the trigger applications for the lines which announce trigger
//! primitives (TP), trigger activities (TA), trigger decisions (TD) and data requests (DR),
//! pairs up records of the same data timestamp, and plots the latencies between them.
//!
//! ## Building & Install
//!
//! To build and install the CLI use `cargo install --path ./daq_latency_cli` from the top
//! level daq_latency repository. The binary will be installed to your cargo install
//! location (typically something like `~/.cargo/bin/`).
//!
//! ## Measurements
//!
//! - TP -> TD: the time from a TP being inserted into the prescale trigger
//! (`tp_prescale_lat_start`) to the TD with the same timestamp leaving the MLT
//! (`tp_prescale_lat_end`).
//! - TA -> DR: the time from a TA arriving at the TABuffer to the data request for it.
//! Alongside this, the TA system clock is compared to the TA data clock, and the lateness
//! of TPSets (`Set start time ... last sent time ...`) is histogrammed.
//! - TP display: a channel vs. time scatter plot of a whitespace delimited TP dump.
//!
//! Latencies are always the difference of the system (host) clock, in nanoseconds, and
//! are reported in seconds. Data timestamps are 62.5 MHz ticks (16 ns).
//!
//! ## Configuration
//!
//! The CLI can run directly on a file or from a YAML configuration file. The format of a
//! configuration file is as follows:
//!
//! ```yml
//! log_path: None
//! plot_path: saved_plots
//! analysis: TpToTd
//! histogram_bins: 75
//! tardy_bins: 20
//! tardy_skip: 20
//! tp_display_rows: 50000
//! ```
//!
//! `analysis` is one of `TpToTd`, `TaToDr` or `TpDisplay`.
//!
//! ## Output
//!
//! Plots are written as PNG images to the plot directory, which must already exist. Each
//! image has a YAML file of the same name holding its title, axis labels and ranges.
//!
//! ```text
//! saved_plots
//! |---- tp_to_td_latencies_run_#.png
//! |---- tp_to_td_latencies_vs_run_time_#.png
//! |---- ta_to_dr_latencies_run_#.png
//! |---- ta_to_dr_latencies_vs_run_time_#.png
//! |---- datatime_vs_system_time_TAs_#.png
//! |---- tpset_tardy_lateness_distribution_#.png
//! |---- tp_event_display.png
//! ```
//!
//! The run number is taken from the last `Start of run` line in the log (1 if there is none).
pub mod accumulator;
pub mod analysis;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod field;
pub mod pairing;
pub mod plot;
pub mod tp_display;
