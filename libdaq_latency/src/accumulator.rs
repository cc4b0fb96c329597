use std::path::Path;

use super::classifier::LineClassifier;
use super::constants::DEFAULT_RUN_NUMBER;
use super::error::ScanError;
use super::event::{DataRequest, LogEvent, TaArrival, TdSend, TpSetLateness, TpStart};

/// Accumulator collects the records of a single log scan.
///
/// One ordered list per record kind, plus the run number, which is the last value
/// announced by a run header (or the default if the log never has one).
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    pub run_number: i64,
    pub tp_starts: Vec<TpStart>,
    pub td_sends: Vec<TdSend>,
    pub ta_arrivals: Vec<TaArrival>,
    pub data_requests: Vec<DataRequest>,
    pub tpset_lateness: Vec<TpSetLateness>,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            run_number: DEFAULT_RUN_NUMBER,
            tp_starts: Vec::new(),
            td_sends: Vec::new(),
            ta_arrivals: Vec::new(),
            data_requests: Vec::new(),
            tpset_lateness: Vec::new(),
        }
    }
}

impl Accumulator {
    pub fn record(&mut self, event: LogEvent) {
        match event {
            LogEvent::RunHeader(run) => self.run_number = run,
            LogEvent::TpStart(tp) => self.tp_starts.push(tp),
            LogEvent::TdSend(td) => self.td_sends.push(td),
            LogEvent::TaArrival(ta) => self.ta_arrivals.push(ta),
            LogEvent::DataRequest(dr) => self.data_requests.push(dr),
            LogEvent::TpSetLateness(set) => self.tpset_lateness.push(set),
            LogEvent::Unrecognized => (),
        }
    }
}

/// Scan the full text of a log, classifying every line.
///
/// Any malformed line stops the scan; the error carries the 1-based line number.
pub fn scan_log(text: &str, classifier: &LineClassifier) -> Result<Accumulator, ScanError> {
    let mut acc = Accumulator::default();
    for (idx, line) in text.lines().enumerate() {
        let events = classifier
            .classify(line)
            .map_err(|source| ScanError::MalformedLine {
                line: idx + 1,
                source,
            })?;
        for event in events {
            acc.record(event);
        }
    }

    log::info!(
        "Got a set of {} TPs, {} TDs, {} TAs, {} data requests and {} TPSets.",
        acc.tp_starts.len(),
        acc.td_sends.len(),
        acc.ta_arrivals.len(),
        acc.data_requests.len(),
        acc.tpset_lateness.len()
    );

    Ok(acc)
}

/// Read an entire log file into memory
pub fn read_log(path: &Path) -> Result<String, ScanError> {
    if !path.exists() {
        return Err(ScanError::BadFilePath(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    log::info!(
        "Loaded log file {} ({})",
        path.to_string_lossy(),
        human_bytes::human_bytes(bytes.len() as f64)
    );
    // DAQ logs occasionally carry stray non-UTF-8 bytes in free text
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read and scan a log file in one step
pub fn scan_log_file(path: &Path, classifier: &LineClassifier) -> Result<Accumulator, ScanError> {
    log::info!("Opening and extracting meaningful info from log file...");
    let text = read_log(path)?;
    scan_log(&text, classifier)
}
