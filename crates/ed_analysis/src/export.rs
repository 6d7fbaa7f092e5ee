//! Export of statistics tables, binned series and whole reports.
//!
//! Tables and series go to CSV for spreadsheets and plotting tools; a full
//! [AnalysisReport] goes to JSON.

use std::path::Path;

use crate::analysis::AnalysisReport;
use crate::moving_average::MovingAverages;
use crate::runner::Batch;
use crate::stats::StationSummary;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export one statistics table to CSV, one row per station.
///
/// # Errors
///
/// Returns an error if the table is empty or file creation or CSV writing fails.
pub fn export_stats_to_csv(
    table: &[StationSummary],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(table, "stations")?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_stats_impl(table, file)
}

/// Export every replication's binned queue-length and busy-staff series to CSV.
///
/// Columns: replication, seed, time, station, queue_length, busy_staff.
///
/// # Errors
///
/// Returns an error if the batch is empty or file creation or CSV writing fails.
pub fn export_binned_to_csv(
    batch: &Batch,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(&batch.replications, "replications")?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_binned_impl(batch, file)
}

/// Export a cross-replication average with one `mavg_<window>` column per window.
///
/// # Errors
///
/// Returns an error if file creation or CSV writing fails.
pub fn export_moving_average_to_csv(
    averages: &MovingAverages,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    csv::export_moving_average_impl(averages, file)
}

/// Export the whole report (parameters, both tables and the batch) to JSON.
///
/// # Errors
///
/// Returns an error if file creation or JSON serialization fails.
pub fn export_report_to_json(
    report: &AnalysisReport,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(report, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn summary(station: &str, within: bool) -> StationSummary {
        StationSummary {
            station: station.to_string(),
            mean_of_means: 1.5,
            std_of_means: 0.5,
            ci_lower: 1.0,
            ci_upper: 2.0,
            all_within_tolerance: within,
            replication_means: vec![1.0, 2.0],
        }
    }

    #[test]
    fn test_export_stats_to_csv() {
        let table = vec![summary("Main Lab 1", true), summary("Main Beds", false)];
        let file = NamedTempFile::new().unwrap();
        export_stats_to_csv(&table, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("station,mean_of_means,std_of_means,ci_lower,ci_upper,all_within_tolerance")
        );
        assert_eq!(lines.next(), Some("Main Lab 1,1.5,0.5,1,2,true"));
        assert_eq!(lines.next(), Some("Main Beds,1.5,0.5,1,2,false"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_empty_table_fails() {
        let file = NamedTempFile::new().unwrap();
        assert!(export_stats_to_csv(&[], file.path()).is_err());
    }

    #[test]
    fn test_export_moving_average_to_csv() {
        use crate::binning::BinnedSample;
        use crate::moving_average::moving_averages;

        let rep: Vec<BinnedSample> = (0..3u64)
            .map(|time| BinnedSample {
                time,
                station: "Lab".to_string(),
                value: time as usize,
            })
            .collect();
        let averages = moving_averages(&[rep.as_slice()], &[2, 3]);
        let file = NamedTempFile::new().unwrap();
        export_moving_average_to_csv(&averages, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "time,station,average,mavg_2,mavg_3");
        assert_eq!(lines[3], "2,Lab,2,1.5,1");
    }
}
