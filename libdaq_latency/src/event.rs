//! The records decoded from recognized DAQ log lines.
//!
//! Every record carries two clocks: the data time, which is the timestamp stamped into
//! the data by the readout (62.5 MHz ticks), and the system time, which is the host
//! clock in nanoseconds at the moment the line was logged.

/// Anything which can be matched on data time and measured on system time
pub trait Timed {
    fn data_time(&self) -> i64;
    fn system_time(&self) -> i64;
}

/// A TP entering the prescale trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TpStart {
    pub data_time: i64,
    pub sadc: i64,
    pub system_time: i64,
    pub channel: i64,
}

/// A TD leaving the MLT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TdSend {
    pub system_time: i64,
    pub data_time: i64,
}

/// A TA arriving at the TABuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaArrival {
    pub data_time: i64,
    pub system_time: i64,
}

/// A data request for a buffered TA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRequest {
    pub data_time: i64,
    pub system_time: i64,
}

/// A TPSet and the last time sent downstream, both in data ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TpSetLateness {
    pub start_time: i64,
    pub last_sent_time: i64,
}

impl TpSetLateness {
    pub fn lateness_ticks(&self) -> i128 {
        self.last_sent_time as i128 - self.start_time as i128
    }
}

macro_rules! impl_timed {
    ($($record:ty),*) => {
        $(
            impl Timed for $record {
                fn data_time(&self) -> i64 {
                    self.data_time
                }

                fn system_time(&self) -> i64 {
                    self.system_time
                }
            }
        )*
    };
}

impl_timed!(TpStart, TdSend, TaArrival, DataRequest);

/// The decoded content of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEvent {
    RunHeader(i64),
    TpStart(TpStart),
    TdSend(TdSend),
    TaArrival(TaArrival),
    DataRequest(DataRequest),
    TpSetLateness(TpSetLateness),
    Unrecognized,
}
