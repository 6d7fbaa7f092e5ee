use crate::analysis::AnalysisReport;

pub(crate) fn export_to_json_impl(
    report: &AnalysisReport,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
