use crate::moving_average::MovingAverages;
use crate::runner::Batch;
use crate::stats::StationSummary;

pub(crate) fn export_stats_impl(
    table: &[StationSummary],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "station",
        "mean_of_means",
        "std_of_means",
        "ci_lower",
        "ci_upper",
        "all_within_tolerance",
    ])?;

    for row in table {
        wtr.write_record([
            row.station.clone(),
            row.mean_of_means.to_string(),
            row.std_of_means.to_string(),
            row.ci_lower.to_string(),
            row.ci_upper.to_string(),
            row.all_within_tolerance.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_binned_impl(
    batch: &Batch,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "replication",
        "seed",
        "time",
        "station",
        "queue_length",
        "busy_staff",
    ])?;

    for replication in &batch.replications {
        let binned = &replication.binned;
        if binned.queue_length.len() != binned.busy_staff.len() {
            return Err(format!(
                "Replication {} has {} queue-length rows but {} busy-staff rows",
                replication.index,
                binned.queue_length.len(),
                binned.busy_staff.len()
            )
            .into());
        }
        let index = replication.index.to_string();
        let seed = replication.run.seed.to_string();
        for (queue, busy) in binned.queue_length.iter().zip(&binned.busy_staff) {
            wtr.write_record([
                index.clone(),
                seed.clone(),
                queue.time.to_string(),
                queue.station.clone(),
                queue.value.to_string(),
                busy.value.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_moving_average_impl(
    averages: &MovingAverages,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    let mut header = vec![
        "time".to_string(),
        "station".to_string(),
        "average".to_string(),
    ];
    header.extend(averages.windows.iter().map(|w| format!("mavg_{w}")));
    wtr.write_record(&header)?;

    for row in &averages.rows {
        let mut record = vec![row.time.to_string(), row.station.clone(), row.average.to_string()];
        record.extend(row.moving.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
