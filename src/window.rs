use chrono::{Local, Months, NaiveDate};

use crate::models::Customer;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Earliest signup date still inside the one-year window. Calendar-year
/// subtraction, so Feb 29 falls back to Feb 28 of the previous year.
pub fn cutoff_date(reference: NaiveDate) -> NaiveDate {
    reference
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN)
}

pub fn is_recent(customer: &Customer, cutoff: NaiveDate) -> bool {
    customer.signup_date >= cutoff
}

/// Keeps customers who signed up on or after the cutoff. Returns the retained
/// customers in input order and how many were dropped.
pub fn filter_recent(customers: Vec<Customer>, reference: NaiveDate) -> (Vec<Customer>, usize) {
    let cutoff = cutoff_date(reference);
    let total = customers.len();

    let retained: Vec<Customer> = customers
        .into_iter()
        .filter(|customer| {
            let keep = is_recent(customer, cutoff);
            if !keep {
                tracing::info!(
                    customer_id = customer.customer_id,
                    signup_date = %customer.signup_date,
                    %cutoff,
                    "filtered out customer older than one year"
                );
            }
            keep
        })
        .collect();

    let dropped = total - retained.len();
    tracing::info!(%cutoff, retained = retained.len(), dropped, "applied signup window");
    (retained, dropped)
}
