use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::PipelineResult;
use crate::loader::load_records;
use crate::models::RunSummary;
use crate::validate::validate_records;
use crate::window::{cutoff_date, filter_recent};
use crate::writer::{output_file_name, write_customers};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub reference_date: NaiveDate,
}

/// Load, validate, filter and write one input file.
pub fn run(config: &RunConfig) -> PipelineResult<RunSummary> {
    let output = config.output_dir.join(output_file_name(&config.input)?);
    tracing::info!(
        input = %config.input.display(),
        output = %output.display(),
        reference_date = %config.reference_date,
        "processing customer file"
    );

    let records = load_records(&config.input)?;
    let loaded = records.len();
    let (customers, rejections) = validate_records(records);
    let (retained, filtered_out) = filter_recent(customers, config.reference_date);
    let written = write_customers(&output, &retained)?;

    tracing::info!(
        loaded,
        rejected = rejections.len(),
        filtered_out,
        written,
        "finished processing"
    );

    Ok(RunSummary {
        input: config.input.clone(),
        output,
        reference_date: config.reference_date,
        cutoff: cutoff_date(config.reference_date),
        loaded,
        filtered_out,
        written,
        rejections,
    })
}
