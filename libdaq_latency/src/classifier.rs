use super::constants::*;
use super::error::LineError;
use super::event::{DataRequest, LogEvent, TaArrival, TdSend, TpSetLateness, TpStart};
use super::field::get_value_from_line;

/// The substrings which identify a meaningful log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    RunHeader,
    TpStart,
    TdSend,
    TaArrival,
    DataRequest,
    TpSetLateness,
}

impl Marker {
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::RunHeader => RUN_HEADER_MARKER,
            Self::TpStart => TP_START_MARKER,
            Self::TdSend => TD_SEND_MARKER,
            Self::TaArrival => TA_ARRIVAL_MARKER,
            Self::DataRequest => DATA_REQUEST_MARKER,
            Self::TpSetLateness => TPSET_LATENESS_MARKER,
        }
    }

    /// Extract the fields this marker implies, in order.
    ///
    /// `text` should begin at the marker; labels are only searched for after it.
    pub fn decode(&self, text: &str) -> Result<LogEvent, LineError> {
        let event = match self {
            Self::RunHeader => LogEvent::RunHeader(get_value_from_line(text, RUN_NUMBER_LABEL)?),
            Self::TpStart => LogEvent::TpStart(TpStart {
                data_time: get_value_from_line(text, TP_DATA_TIME_LABEL)?,
                sadc: get_value_from_line(text, TP_SADC_LABEL)?,
                system_time: get_value_from_line(text, TP_SYSTEM_TIME_LABEL)?,
                channel: get_value_from_line(text, TP_CHANNEL_LABEL)?,
            }),
            Self::TdSend => LogEvent::TdSend(TdSend {
                system_time: get_value_from_line(text, TD_SYSTEM_TIME_LABEL)?,
                data_time: get_value_from_line(text, TD_DATA_TIME_LABEL)?,
            }),
            Self::TaArrival => LogEvent::TaArrival(TaArrival {
                data_time: get_value_from_line(text, TA_DATA_TIME_LABEL)?,
                system_time: get_value_from_line(text, TA_SYSTEM_TIME_LABEL)?,
            }),
            Self::DataRequest => LogEvent::DataRequest(DataRequest {
                data_time: get_value_from_line(text, DR_DATA_TIME_LABEL)?,
                system_time: get_value_from_line(text, DR_SYSTEM_TIME_LABEL)?,
            }),
            Self::TpSetLateness => LogEvent::TpSetLateness(TpSetLateness {
                start_time: get_value_from_line(text, TPSET_START_LABEL)?,
                last_sent_time: get_value_from_line(text, TPSET_LAST_SENT_LABEL)?,
            }),
        };
        Ok(event)
    }
}

/// LineClassifier turns a line of log text into the events it describes.
///
/// Markers are not mutually exclusive. Each marker in the set is tested in order, and
/// a match narrows the line so that it starts at that marker. Later markers (and the
/// labels of later markers) are then only searched for in the remainder. A marker that
/// only appears before an earlier matched marker is not seen.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    markers: Vec<Marker>,
}

impl LineClassifier {
    pub fn new(markers: &[Marker]) -> Self {
        Self {
            markers: markers.to_vec(),
        }
    }

    /// Markers for the TP insertion -> TD send-out measurement
    pub fn tp_to_td() -> Self {
        Self::new(&[Marker::RunHeader, Marker::TpStart, Marker::TdSend])
    }

    /// Markers for the TA buffer insertion -> data request measurement
    pub fn ta_to_dr() -> Self {
        Self::new(&[Marker::RunHeader, Marker::TaArrival, Marker::DataRequest])
    }

    /// Markers for the tardy TPSet measurement
    pub fn tardy_tpsets() -> Self {
        Self::new(&[Marker::RunHeader, Marker::TpSetLateness])
    }

    pub fn all() -> Self {
        Self::new(&[
            Marker::RunHeader,
            Marker::TpStart,
            Marker::TdSend,
            Marker::TaArrival,
            Marker::DataRequest,
            Marker::TpSetLateness,
        ])
    }

    /// Classify a line. Returns `[LogEvent::Unrecognized]` if no marker matched.
    pub fn classify(&self, line: &str) -> Result<Vec<LogEvent>, LineError> {
        let mut events = Vec::new();
        let mut view = line;
        for marker in self.markers.iter() {
            if let Some(location) = view.find(marker.pattern()) {
                view = &view[location..];
                events.push(marker.decode(view)?);
            }
        }

        if events.is_empty() {
            events.push(LogEvent::Unrecognized);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TP_LINE: &str = "2023-Mar-02 10:11:12,345 INFO [tp_prescale_lat_start] tp_start: 100 sadc: 250 lat_start: 7000 channel: 1234";
    const TD_LINE: &str =
        "2023-Mar-02 10:11:12,999 INFO [tp_prescale_lat_end] td_trigger_lat: 5000 td_trigger_ts: 100";

    #[test]
    fn test_tp_start_line() {
        let classifier = LineClassifier::tp_to_td();
        let events = classifier.classify(TP_LINE).unwrap();
        assert_eq!(
            events,
            vec![LogEvent::TpStart(TpStart {
                data_time: 100,
                sadc: 250,
                system_time: 7000,
                channel: 1234
            })]
        );
    }

    #[test]
    fn test_td_send_line() {
        let classifier = LineClassifier::tp_to_td();
        let events = classifier.classify(TD_LINE).unwrap();
        assert_eq!(
            events,
            vec![LogEvent::TdSend(TdSend {
                system_time: 5000,
                data_time: 100
            })]
        );
    }

    #[test]
    fn test_ta_and_dr_lines() {
        let classifier = LineClassifier::ta_to_dr();
        let ta = "Got TA at the TABuffer with datatime is: 640 and system time is: 9000 ok";
        let dr = "Got TA data request for datatime starting: 640 with system time is: 9500";
        assert_eq!(
            classifier.classify(ta).unwrap(),
            vec![LogEvent::TaArrival(TaArrival {
                data_time: 640,
                system_time: 9000
            })]
        );
        assert_eq!(
            classifier.classify(dr).unwrap(),
            vec![LogEvent::DataRequest(DataRequest {
                data_time: 640,
                system_time: 9500
            })]
        );
    }

    #[test]
    fn test_tpset_lateness_line() {
        let classifier = LineClassifier::tardy_tpsets();
        let line = "WARNING: TPSet late! Set start time 1000 is before last sent time 1600";
        assert_eq!(
            classifier.classify(line).unwrap(),
            vec![LogEvent::TpSetLateness(TpSetLateness {
                start_time: 1000,
                last_sent_time: 1600
            })]
        );
    }

    #[test]
    fn test_unrecognized_line() {
        let classifier = LineClassifier::all();
        assert_eq!(
            classifier.classify("some unrelated chatter: 12").unwrap(),
            vec![LogEvent::Unrecognized]
        );
    }

    #[test]
    fn test_markers_are_not_exclusive() {
        let classifier = LineClassifier::tp_to_td();
        let line = "Start of run 42 tp_prescale_lat_start tp_start: 1 sadc: 2 lat_start: 3 channel: 4 tp_prescale_lat_end td_trigger_lat: 5 td_trigger_ts: 1";
        let events = classifier.classify(line).unwrap();
        assert_eq!(
            events,
            vec![
                LogEvent::RunHeader(42),
                LogEvent::TpStart(TpStart {
                    data_time: 1,
                    sadc: 2,
                    system_time: 3,
                    channel: 4
                }),
                LogEvent::TdSend(TdSend {
                    system_time: 5,
                    data_time: 1
                }),
            ]
        );
    }

    #[test]
    fn test_match_narrows_line() {
        // The end marker sits before the start marker, so it is cut off by the narrowing
        let classifier = LineClassifier::tp_to_td();
        let line = "tp_prescale_lat_end td_trigger_lat: 5 td_trigger_ts: 1 tp_prescale_lat_start tp_start: 1 sadc: 2 lat_start: 3 channel: 4";
        let events = classifier.classify(line).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LogEvent::TpStart(_)));
    }

    #[test]
    fn test_labels_before_marker_are_ignored() {
        let classifier = LineClassifier::tp_to_td();
        let line = "channel: 99 tp_prescale_lat_start tp_start: 1 sadc: 2 lat_start: 3 channel: 4";
        match classifier.classify(line).unwrap()[0] {
            LogEvent::TpStart(tp) => assert_eq!(tp.channel, 4),
            _ => panic!(),
        }
    }

    #[test]
    fn test_missing_field_fails() {
        let classifier = LineClassifier::tp_to_td();
        let line = "tp_prescale_lat_start tp_start: 1 sadc: 2 channel: 4";
        assert_eq!(
            classifier.classify(line),
            Err(LineError::MissingLabel(String::from("lat_start:")))
        );
    }
}
