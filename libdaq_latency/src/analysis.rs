use std::path::PathBuf;

use super::accumulator::{read_log, scan_log, scan_log_file, Accumulator};
use super::classifier::LineClassifier;
use super::config::{Analysis, Config};
use super::constants::DATA_CLOCK_PERIOD;
use super::error::{PlotError, ProcessorError};
use super::pairing::{pair_latencies, records_clock_drift, relative_positions, LatencySample};
use super::plot::{PlotLabels, PlotWriter};
use super::tp_display::{channels, read_tp_dump, relative_start_times};

/// Latencies of TP insertion -> TD send-out from the MLT
#[derive(Debug, Clone, PartialEq)]
pub struct TpToTdReport {
    pub run_number: i64,
    pub samples: Vec<LatencySample>,
    /// Sample positions in seconds since the first sample
    pub relative_positions: Vec<f64>,
}

/// Latencies of TA buffer insertion -> data request, and the TA clock comparison
#[derive(Debug, Clone, PartialEq)]
pub struct TaToDrReport {
    pub run_number: i64,
    pub samples: Vec<LatencySample>,
    pub relative_positions: Vec<f64>,
    /// TA system times in seconds since the first TA
    pub ta_relative_system: Vec<f64>,
    /// |relative system time - relative data time| for each TA, in seconds
    pub ta_clock_drift: Vec<f64>,
}

/// How late each TPSet was with respect to the last sent time, in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct TardyReport {
    pub run_number: i64,
    pub lateness: Vec<f64>,
}

fn latencies(samples: &[LatencySample]) -> Vec<f64> {
    samples.iter().map(|s| s.latency).collect()
}

impl TpToTdReport {
    pub fn latencies(&self) -> Vec<f64> {
        latencies(&self.samples)
    }
}

impl TaToDrReport {
    pub fn latencies(&self) -> Vec<f64> {
        latencies(&self.samples)
    }
}

/// Pair the TDs sent with the TPs inserted.
///
/// For the prescale trigger the TD window start is the TP start time, so the two are
/// matched on data time.
pub fn analyze_tp_to_td(acc: &Accumulator) -> TpToTdReport {
    let samples = pair_latencies(&acc.td_sends, &acc.tp_starts);
    log::info!(
        "Collected {} latency measurements of form TP Insertion -> TD Send-out.",
        samples.len()
    );
    TpToTdReport {
        run_number: acc.run_number,
        relative_positions: relative_positions(&samples),
        samples,
    }
}

/// Pair the data requests with the TAs in the buffer, and compare the TA clocks
pub fn analyze_ta_to_dr(acc: &Accumulator) -> TaToDrReport {
    let samples = pair_latencies(&acc.data_requests, &acc.ta_arrivals);
    let (ta_relative_system, ta_clock_drift) = records_clock_drift(&acc.ta_arrivals);
    log::info!(
        "Collected {} latency measurements of form TA Arrival to Buffer -> Data Request Arrival for TA.",
        samples.len()
    );
    log::info!(
        "Collected {} measurements of datatime vs system time.",
        ta_clock_drift.len()
    );
    TaToDrReport {
        run_number: acc.run_number,
        relative_positions: relative_positions(&samples),
        samples,
        ta_relative_system,
        ta_clock_drift,
    }
}

pub fn analyze_tardy_tpsets(acc: &Accumulator) -> TardyReport {
    let lateness: Vec<f64> = acc
        .tpset_lateness
        .iter()
        .map(|set| set.lateness_ticks() as f64 * DATA_CLOCK_PERIOD)
        .collect();
    log::info!("Got list of {} TPSet lateness values.", lateness.len());
    TardyReport {
        run_number: acc.run_number,
        lateness,
    }
}

/// Write the histogram and time series of the TP -> TD latencies
pub fn write_tp_to_td_plots(
    report: &TpToTdReport,
    writer: &PlotWriter,
    bins: usize,
    status: &mut dyn FnMut(&str),
) -> Result<Vec<PathBuf>, PlotError> {
    let run = report.run_number;
    let title = format!("Trigger System Latency Measurement - Run No. {run}");
    let latencies = report.latencies();
    let mut written = Vec::new();

    written.extend(writer.write_histogram(
        &format!("tp_to_td_latencies_run_{run}.png"),
        &PlotLabels::new(
            &title,
            "TP Insertion -> TD Send-out MLT (seconds)",
            "Relative Frequency",
        ),
        &latencies,
        bins,
    )?);
    status("Latency histogram");

    written.extend(writer.write_line(
        &format!("tp_to_td_latencies_vs_run_time_{run}.png"),
        &PlotLabels::new(
            &title,
            "Relative System Time (s)",
            "TP Inception -> TD Send-out MLT (s)",
        ),
        &report.relative_positions,
        &latencies,
    )?);
    status("Latency time series");

    Ok(written)
}

/// Write the histogram and time series of the TA -> DR latencies, and the TA clock drift
pub fn write_ta_to_dr_plots(
    report: &TaToDrReport,
    writer: &PlotWriter,
    bins: usize,
    status: &mut dyn FnMut(&str),
) -> Result<Vec<PathBuf>, PlotError> {
    let run = report.run_number;
    let title = format!("Trigger System TA -> DR Latency Measurement - Run No. {run}");
    let latencies = report.latencies();
    let mut written = Vec::new();

    written.extend(writer.write_histogram(
        &format!("ta_to_dr_latencies_run_{run}.png"),
        &PlotLabels::new(
            &title,
            "TA Buffer Insertion -> Data Request (seconds)",
            "Relative Frequency",
        ),
        &latencies,
        bins,
    )?);
    status("Latency histogram");

    written.extend(writer.write_line(
        &format!("ta_to_dr_latencies_vs_run_time_{run}.png"),
        &PlotLabels::new(
            &title,
            "Relative System Time (s)",
            "TA Buffer Inception -> Data Request (s)",
        ),
        &report.relative_positions,
        &latencies,
    )?);
    status("Latency time series");

    written.extend(writer.write_line(
        &format!("datatime_vs_system_time_TAs_{run}.png"),
        &PlotLabels::new(
            &format!("TA System Time - TA Data Time - Run No. {run}"),
            "Relative TA System Time (s)",
            "TA System Time - TA Data Time (s)",
        ),
        &report.ta_relative_system,
        &report.ta_clock_drift,
    )?);
    status("TA clock drift");

    Ok(written)
}

/// Write the TPSet lateness distribution, leaving out the first `skip` TPSets
pub fn write_tardy_plot(
    report: &TardyReport,
    writer: &PlotWriter,
    bins: usize,
    skip: usize,
) -> Result<Option<PathBuf>, PlotError> {
    let run = report.run_number;
    let lateness = report.lateness.get(skip..).unwrap_or(&[]);
    writer.write_histogram(
        &format!("tpset_tardy_lateness_distribution_{run}.png"),
        &PlotLabels::new(
            &format!("TPSet Lateness Distribution - Run No. {run}"),
            "TPSet Latency - Seconds",
            "Frequency",
        ),
        lateness,
        bins,
    )
}

/// The number of status updates `process` reports for an analysis
pub fn stage_count(analysis: Analysis) -> u64 {
    match analysis {
        Analysis::TpToTd => 4,
        Analysis::TaToDr => 7,
        Analysis::TpDisplay => 2,
    }
}

/// The main entry point of daq_latency.
///
/// Reads the input named by the config, runs the configured analysis and writes its plots.
/// `status` is called once per completed stage with a short description.
pub fn process(
    config: &Config,
    status: &mut dyn FnMut(&str),
) -> Result<Vec<PathBuf>, ProcessorError> {
    let writer = PlotWriter::new(&config.plot_path)?;
    let mut written = Vec::new();

    match config.analysis {
        Analysis::TpToTd => {
            let acc = scan_log_file(&config.log_path, &LineClassifier::tp_to_td())?;
            status("Scanned log");
            let report = analyze_tp_to_td(&acc);
            status("Paired TPs with TDs");
            written.extend(write_tp_to_td_plots(
                &report,
                &writer,
                config.histogram_bins,
                status,
            )?);
            log::info!("Finished processing run {}", report.run_number);
        }
        Analysis::TaToDr => {
            let text = read_log(&config.log_path)?;
            let acc = scan_log(&text, &LineClassifier::ta_to_dr())?;
            status("Scanned log");
            let report = analyze_ta_to_dr(&acc);
            status("Paired TAs with data requests");
            written.extend(write_ta_to_dr_plots(
                &report,
                &writer,
                config.histogram_bins,
                status,
            )?);
            log::info!("Finished processing run {}", report.run_number);

            let acc = scan_log(&text, &LineClassifier::tardy_tpsets())?;
            status("Scanned log for tardy TPSets");
            let tardy = analyze_tardy_tpsets(&acc);
            written.extend(write_tardy_plot(
                &tardy,
                &writer,
                config.tardy_bins,
                config.tardy_skip,
            )?);
            status("TPSet lateness histogram");
        }
        Analysis::TpDisplay => {
            let points = read_tp_dump(&config.log_path, config.tp_display_rows)?;
            log::info!("Read {} TPs from dump.", points.len());
            status("Read TP dump");
            written.extend(writer.write_scatter(
                "tp_event_display.png",
                &PlotLabels::new("Input TPs - Event Display", "Channel ID", "Relative Time (s)"),
                &channels(&points),
                &relative_start_times(&points),
            )?);
            status("TP event display");
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{TaArrival, TpSetLateness};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    const TP_TD_LOG: &str = "\
2023-Mar-02 10:00:00 INFO Start of run 42
2023-Mar-02 10:00:01 INFO tp_prescale_lat_start tp_start: 100 sadc: 20 lat_start: 7000 channel: 12
2023-Mar-02 10:00:01 INFO tp_prescale_lat_start tp_start: 200 sadc: 21 lat_start: 7500 channel: 13
2023-Mar-02 10:00:02 INFO tp_prescale_lat_end td_trigger_lat: 5000 td_trigger_ts: 100
";

    const TA_DR_LOG: &str = "\
INFO Start of run 7
INFO Got TA at the TABuffer datatime is: 1000 and system time is: 50000
INFO Got TA at the TABuffer datatime is: 1062 and system time is: 50992
INFO Got TA data request datatime starting: 1000 system time is: 60000
INFO Got TA data request datatime starting: 1062 system time is: 61000
INFO Set start time 2000 last sent time 2100
INFO Set start time 3000 last sent time 3050
";

    fn count_stages(config: &Config) -> (Vec<PathBuf>, u64) {
        let mut stages = 0;
        let written = process(config, &mut |_| stages += 1).unwrap();
        (written, stages)
    }

    #[test]
    fn test_tp_to_td_scenario() {
        let acc = scan_log(TP_TD_LOG, &LineClassifier::tp_to_td()).unwrap();
        let report = analyze_tp_to_td(&acc);
        assert_eq!(report.run_number, 42);
        assert_eq!(report.latencies(), vec![(5000 - 7000) as f64 * 1e-9]);
        assert!((report.latencies()[0] + 2e-6).abs() < 1e-18);
        assert_eq!(report.relative_positions, vec![0.0]);
    }

    #[test]
    fn test_tp_to_td_extreme_system_times() {
        let log = "\
tp_prescale_lat_start tp_start: 1 sadc: 0 lat_start: -9000000000000000000 channel: 0
tp_prescale_lat_end td_trigger_lat: 9000000000000000000 td_trigger_ts: 1
";
        let acc = scan_log(log, &LineClassifier::tp_to_td()).unwrap();
        let report = analyze_tp_to_td(&acc);
        assert_eq!(report.samples.len(), 1);
        assert!((report.latencies()[0] - 1.8e10).abs() < 1.0);
    }

    #[test]
    fn test_tp_to_td_without_tds() {
        let acc = Accumulator {
            tp_starts: scan_log(TP_TD_LOG, &LineClassifier::tp_to_td())
                .unwrap()
                .tp_starts,
            ..Default::default()
        };
        let report = analyze_tp_to_td(&acc);
        assert!(report.samples.is_empty());
        assert!(report.relative_positions.is_empty());
        assert_eq!(report.run_number, 1);
    }

    #[test]
    fn test_ta_to_dr() {
        let acc = scan_log(TA_DR_LOG, &LineClassifier::ta_to_dr()).unwrap();
        let report = analyze_ta_to_dr(&acc);
        assert_eq!(report.run_number, 7);
        assert_eq!(
            report.latencies(),
            vec![10_000.0 * 1e-9, (61_000 - 50_992) as f64 * 1e-9]
        );
        assert_eq!(report.relative_positions, vec![0.0, 1000.0 * 1e-9]);
        assert_eq!(report.ta_relative_system.len(), 2);
        assert_eq!(report.ta_clock_drift.len(), 2);
        assert!(report.ta_clock_drift[1] < 1e-12);
    }

    #[test]
    fn test_ta_clock_drift_with_no_tas() {
        let acc = Accumulator {
            ta_arrivals: Vec::<TaArrival>::new(),
            ..Default::default()
        };
        let report = analyze_ta_to_dr(&acc);
        assert!(report.ta_clock_drift.is_empty());
    }

    #[test]
    fn test_tardy_tpsets() {
        let acc = scan_log(TA_DR_LOG, &LineClassifier::tardy_tpsets()).unwrap();
        assert_eq!(
            acc.tpset_lateness[0],
            TpSetLateness {
                start_time: 2000,
                last_sent_time: 2100
            }
        );
        let report = analyze_tardy_tpsets(&acc);
        assert_eq!(report.run_number, 7);
        assert_eq!(report.lateness, vec![100.0 * 16e-9, 50.0 * 16e-9]);
    }

    #[test]
    fn test_tardy_skip_beyond_length() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PlotWriter::new(dir.path()).unwrap();
        let report = TardyReport {
            run_number: 3,
            lateness: vec![1e-6, 2e-6],
        };
        assert_eq!(write_tardy_plot(&report, &writer, 20, 20).unwrap(), None);
        assert!(write_tardy_plot(&report, &writer, 20, 0).unwrap().is_some());
    }

    #[test]
    fn test_process_tp_to_td() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("daq.log");
        std::fs::write(&log_path, TP_TD_LOG).unwrap();
        let config = Config::new(&log_path, Some(dir.path()), Analysis::TpToTd);

        let (written, stages) = count_stages(&config);
        assert_eq!(stages, stage_count(Analysis::TpToTd));
        assert_eq!(
            written,
            vec![
                dir.path().join("tp_to_td_latencies_run_42.png"),
                dir.path().join("tp_to_td_latencies_vs_run_time_42.png"),
            ]
        );
        assert!(dir.path().join("tp_to_td_latencies_run_42.yml").exists());
    }

    #[test]
    fn test_process_ta_to_dr() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("daq.log");
        std::fs::write(&log_path, TA_DR_LOG).unwrap();
        let mut config = Config::new(&log_path, Some(dir.path()), Analysis::TaToDr);
        config.tardy_skip = 0;

        let (written, stages) = count_stages(&config);
        assert_eq!(stages, stage_count(Analysis::TaToDr));
        assert_eq!(written.len(), 4);
        assert!(dir.path().join("ta_to_dr_latencies_run_7.png").exists());
        assert!(dir.path().join("ta_to_dr_latencies_vs_run_time_7.png").exists());
        assert!(dir.path().join("datatime_vs_system_time_TAs_7.png").exists());
        assert!(dir
            .path()
            .join("tpset_tardy_lateness_distribution_7.png")
            .exists());
    }

    #[test]
    fn test_process_tp_display() {
        let dir = tempfile::tempdir().unwrap();
        let dump_path = dir.path().join("tps.txt");
        std::fs::write(&dump_path, "1000 1 1 2624 5\n1016 1 1 2625 5\n").unwrap();
        let config = Config::new(&dump_path, Some(dir.path()), Analysis::TpDisplay);

        let (written, stages) = count_stages(&config);
        assert_eq!(stages, stage_count(Analysis::TpDisplay));
        assert_eq!(written, vec![dir.path().join("tp_event_display.png")]);
    }

    #[test]
    fn test_process_with_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("daq.log");
        std::fs::write(&log_path, "").unwrap();
        let config = Config::new(&log_path, Some(dir.path()), Analysis::TpToTd);

        let (written, _) = count_stages(&config);
        assert!(written.is_empty());
    }

    #[test]
    fn test_process_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(
            &dir.path().join("missing.log"),
            Some(dir.path()),
            Analysis::TpToTd,
        );
        assert!(matches!(
            process(&config, &mut |_| ()),
            Err(ProcessorError::ScanError(_))
        ));

        let config = Config::new(
            Path::new("daq.log"),
            Some(&dir.path().join("saved_plots")),
            Analysis::TpToTd,
        );
        assert!(matches!(
            process(&config, &mut |_| ()),
            Err(ProcessorError::PlotError(PlotError::MissingDirectory(_)))
        ));
    }
}
