use std::path::Path;

use super::constants::DATA_CLOCK_PERIOD;
use super::error::TpDisplayError;

const START_TIME_COLUMN: usize = 0;
const CHANNEL_COLUMN: usize = 3;
const MIN_COLUMNS: usize = 4;

/// One TP from a text dump of the TP stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TpPoint {
    pub start_time: f64,
    pub channel: f64,
}

/// Parse a whitespace delimited TP dump, keeping at most `max_rows` TPs.
///
/// Each row is a TP; column 0 is the start time in data ticks and column 3 the offline
/// channel. Blank lines and `#` comments are skipped.
pub fn parse_tp_dump(text: &str, max_rows: usize) -> Result<Vec<TpPoint>, TpDisplayError> {
    let mut points = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if points.len() >= max_rows {
            break;
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let entries: Vec<&str> = line.split_whitespace().collect();
        if entries.len() < MIN_COLUMNS {
            return Err(TpDisplayError::BadFileFormat(idx + 1));
        }
        points.push(TpPoint {
            start_time: entries[START_TIME_COLUMN].parse()?,
            channel: entries[CHANNEL_COLUMN].parse()?,
        });
    }
    Ok(points)
}

/// Read a TP dump file
pub fn read_tp_dump(path: &Path, max_rows: usize) -> Result<Vec<TpPoint>, TpDisplayError> {
    if !path.exists() {
        return Err(TpDisplayError::BadFilePath(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    parse_tp_dump(&text, max_rows)
}

/// Start times relative to the first TP, in seconds
pub fn relative_start_times(points: &[TpPoint]) -> Vec<f64> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    points
        .iter()
        .map(|p| (p.start_time - first.start_time) * DATA_CLOCK_PERIOD)
        .collect()
}

pub fn channels(points: &[TpPoint]) -> Vec<f64> {
    points.iter().map(|p| p.channel).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DUMP: &str = "\
# start_time time_over_threshold peak_time channel adc_integral
1000 32 1010 2624 500
1016 32 1020 2625 450

1032 16 1040 2630 300
";

    #[test]
    fn test_parse_dump() {
        let points = parse_tp_dump(DUMP, 50_000).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(
            points[1],
            TpPoint {
                start_time: 1016.0,
                channel: 2625.0
            }
        );
        assert_eq!(channels(&points), vec![2624.0, 2625.0, 2630.0]);
    }

    #[test]
    fn test_max_rows() {
        let points = parse_tp_dump(DUMP, 2).unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_relative_start_times() {
        let points = parse_tp_dump(DUMP, 50_000).unwrap();
        let times = relative_start_times(&points);
        assert_eq!(times, vec![0.0, 16.0 * 16e-9, 32.0 * 16e-9]);
        assert!(relative_start_times(&[]).is_empty());
    }

    #[test]
    fn test_bad_rows() {
        assert!(matches!(
            parse_tp_dump("1 2 3\n", 10),
            Err(TpDisplayError::BadFileFormat(1))
        ));
        assert!(matches!(
            parse_tp_dump("1 2 3 x 5\n", 10),
            Err(TpDisplayError::ParsingError(_))
        ));
    }
}
