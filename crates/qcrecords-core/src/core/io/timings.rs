use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Wall time spent reconstructing one triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingRecord {
    pub index: usize,
    pub record_id: String,
    pub n_atoms: usize,
    pub micros: u64,
}

impl TimingRecord {
    pub fn new(index: usize, record_id: impl Into<String>, n_atoms: usize, elapsed: Duration) -> Self {
        Self {
            index,
            record_id: record_id.into(),
            n_atoms,
            micros: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.micros)
    }
}

/// Aggregate of a run's per-triple timings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimingSummary {
    pub count: usize,
    pub total: Duration,
    pub mean: Duration,
    pub max: Duration,
}

impl TimingSummary {
    pub fn from_records(records: &[TimingRecord]) -> Self {
        let total: Duration = records.iter().map(TimingRecord::elapsed).sum();
        let max = records
            .iter()
            .map(TimingRecord::elapsed)
            .max()
            .unwrap_or_default();
        let mean = u32::try_from(records.len())
            .ok()
            .filter(|&n| n > 0)
            .map(|n| total / n)
            .unwrap_or_default();
        Self {
            count: records.len(),
            total,
            mean,
            max,
        }
    }
}

/// Writes timing rows as CSV with a header line.
pub fn write_timings(records: &[TimingRecord], writer: impl Write) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_timings_to_path(
    records: &[TimingRecord],
    path: impl AsRef<Path>,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_path(path)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<TimingRecord> {
        vec![
            TimingRecord::new(0, "11", 5, Duration::from_micros(300)),
            TimingRecord::new(1, "12", 9, Duration::from_micros(100)),
        ]
    }

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let mut buf = Vec::new();
        write_timings(&records(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "index,record_id,n_atoms,micros\n0,11,5,300\n1,12,9,100\n"
        );
    }

    #[test]
    fn csv_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timings.csv");
        write_timings_to_path(&records(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<TimingRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows, records());
    }

    #[test]
    fn summary_aggregates_durations() {
        let summary = TimingSummary::from_records(&records());
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total, Duration::from_micros(400));
        assert_eq!(summary.mean, Duration::from_micros(200));
        assert_eq!(summary.max, Duration::from_micros(300));
    }

    #[test]
    fn empty_summary_is_zero() {
        assert_eq!(TimingSummary::from_records(&[]), TimingSummary::default());
    }
}
