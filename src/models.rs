use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ValidationError;

pub const COL_CUSTOMER_ID: &str = "customer_id";
pub const COL_NAME: &str = "name";
pub const COL_EMAIL: &str = "email";
pub const COL_SIGNUP_DATE: &str = "signup_date";

/// Output column order. Also the set of columns the loader requires.
pub const CUSTOMER_COLUMNS: [&str; 4] = [COL_CUSTOMER_ID, COL_NAME, COL_EMAIL, COL_SIGNUP_DATE];

/// One unvalidated input row keyed by header name.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line in the source file; the header is line 1.
    pub line: u64,
    pub fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub email: String,
    pub signup_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Rejection {
    pub line: u64,
    pub error: ValidationError,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub reference_date: NaiveDate,
    pub cutoff: NaiveDate,
    pub loaded: usize,
    pub filtered_out: usize,
    pub written: usize,
    pub rejections: Vec<Rejection>,
}

impl RunSummary {
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }
}
