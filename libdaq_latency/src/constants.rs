// Line markers
pub const RUN_HEADER_MARKER: &str = "Start of run";
pub const TP_START_MARKER: &str = "tp_prescale_lat_start";
pub const TD_SEND_MARKER: &str = "tp_prescale_lat_end";
pub const TA_ARRIVAL_MARKER: &str = "Got TA at the TABuffer";
pub const DATA_REQUEST_MARKER: &str = "Got TA data request";
pub const TPSET_LATENESS_MARKER: &str = "Set start time";

// Field labels
pub const RUN_NUMBER_LABEL: &str = "Start of run";
pub const TP_DATA_TIME_LABEL: &str = "tp_start:";
pub const TP_SADC_LABEL: &str = "sadc:";
pub const TP_SYSTEM_TIME_LABEL: &str = "lat_start:";
pub const TP_CHANNEL_LABEL: &str = "channel:";
pub const TD_SYSTEM_TIME_LABEL: &str = "td_trigger_lat:";
pub const TD_DATA_TIME_LABEL: &str = "td_trigger_ts:";
pub const TA_DATA_TIME_LABEL: &str = "datatime is:";
pub const TA_SYSTEM_TIME_LABEL: &str = "and system time is:";
pub const DR_DATA_TIME_LABEL: &str = "datatime starting:";
pub const DR_SYSTEM_TIME_LABEL: &str = "system time is:";
pub const TPSET_START_LABEL: &str = "Set start time";
pub const TPSET_LAST_SENT_LABEL: &str = "last sent time";

/// Run number assumed when the log never announces one
pub const DEFAULT_RUN_NUMBER: i64 = 1;

/// System clock period (ns -> s)
pub const SYSTEM_CLOCK_PERIOD: f64 = 1.0e-9;
/// Data clock period, 62.5 MHz ticks (16 ns -> s)
pub const DATA_CLOCK_PERIOD: f64 = 16.0e-9;

pub const DEFAULT_HISTOGRAM_BINS: usize = 75;
pub const DEFAULT_TARDY_BINS: usize = 20;
/// First TPSets of a run may be flushing from the previous run
pub const DEFAULT_TARDY_SKIP: usize = 20;
pub const DEFAULT_TP_DISPLAY_ROWS: usize = 50_000;

pub const DEFAULT_PLOT_DIRECTORY: &str = "saved_plots";
