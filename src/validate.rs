use chrono::NaiveDate;

use crate::error::{FieldIssue, ValidationError};
use crate::models::{
    Customer, RawRecord, Rejection, COL_CUSTOMER_ID, COL_EMAIL, COL_NAME, COL_SIGNUP_DATE,
};

pub const SIGNUP_DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds a `Customer` from one raw row, reporting every bad field at once.
pub fn validate_record(record: &RawRecord) -> Result<Customer, ValidationError> {
    let mut issues = Vec::new();

    let customer_id = required(record, COL_CUSTOMER_ID, &mut issues).and_then(|raw| {
        check(
            raw.parse::<i64>().ok(),
            COL_CUSTOMER_ID,
            raw,
            "not an integer",
            &mut issues,
        )
    });
    let name = required(record, COL_NAME, &mut issues).map(str::to_string);
    let email = required(record, COL_EMAIL, &mut issues).and_then(|raw| {
        check(
            valid_email(raw).then(|| raw.to_string()),
            COL_EMAIL,
            raw,
            "expected one '@' between a local part and a domain",
            &mut issues,
        )
    });
    let signup_date = required(record, COL_SIGNUP_DATE, &mut issues).and_then(|raw| {
        check(
            NaiveDate::parse_from_str(raw, SIGNUP_DATE_FORMAT).ok(),
            COL_SIGNUP_DATE,
            raw,
            "not a YYYY-MM-DD calendar date",
            &mut issues,
        )
    });

    match (customer_id, name, email, signup_date) {
        (Some(customer_id), Some(name), Some(email), Some(signup_date)) => Ok(Customer {
            customer_id,
            name,
            email,
            signup_date,
        }),
        _ => Err(ValidationError { issues }),
    }
}

/// Runs every row through the validator. Rejected rows are logged and dropped.
pub fn validate_records(records: Vec<RawRecord>) -> (Vec<Customer>, Vec<Rejection>) {
    let mut customers = Vec::with_capacity(records.len());
    let mut rejections = Vec::new();

    for record in records {
        match validate_record(&record) {
            Ok(customer) => customers.push(customer),
            Err(error) => {
                tracing::warn!(line = record.line, %error, "rejected record");
                rejections.push(Rejection {
                    line: record.line,
                    error,
                });
            }
        }
    }

    tracing::info!(
        valid = customers.len(),
        rejected = rejections.len(),
        "validated records"
    );
    (customers, rejections)
}

pub fn valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}

fn required<'a>(record: &'a RawRecord, field: &str, issues: &mut Vec<FieldIssue>) -> Option<&'a str> {
    match record.get(field) {
        Some(value) if !value.is_empty() => Some(value),
        value => {
            issues.push(FieldIssue {
                field: field.to_string(),
                value: value.unwrap_or_default().to_string(),
                reason: "missing".to_string(),
            });
            None
        }
    }
}

fn check<T>(
    parsed: Option<T>,
    field: &str,
    raw: &str,
    reason: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<T> {
    if parsed.is_none() {
        issues.push(FieldIssue {
            field: field.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        });
    }
    parsed
}
