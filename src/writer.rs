use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Customer, CUSTOMER_COLUMNS};

pub const OUTPUT_PREFIX: &str = "proc__";

/// `proc__<base name>` for the given input path.
pub fn output_file_name(input: &Path) -> PipelineResult<PathBuf> {
    let base = input
        .file_name()
        .ok_or_else(|| PipelineError::format(input, "input path has no file name"))?;
    let mut name = OsString::from(OUTPUT_PREFIX);
    name.push(base);
    Ok(PathBuf::from(name))
}

/// Writes the header row followed by one row per customer. Returns the number
/// of data rows written. A failed write removes the partial file.
pub fn write_customers(path: &Path, customers: &[Customer]) -> PipelineResult<usize> {
    let file = File::create(path).map_err(|err| PipelineError::io(path, err))?;
    let result = write_rows(file, customers).map_err(|err| PipelineError::from_csv(path, err));
    let written = discard_on_error(path, result)?;

    tracing::info!(path = %path.display(), rows = written, "wrote output file");
    Ok(written)
}

fn write_rows<W: io::Write>(out: W, customers: &[Customer]) -> csv::Result<usize> {
    // Header is written by hand so that an empty result still gets one.
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);

    writer.write_record(CUSTOMER_COLUMNS)?;
    for customer in customers {
        writer.serialize(customer)?;
    }
    writer.flush()?;
    Ok(customers.len())
}

fn discard_on_error<T>(path: &Path, result: PipelineResult<T>) -> PipelineResult<T> {
    if result.is_err() {
        if let Err(err) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove partial output");
        }
    }
    result
}
