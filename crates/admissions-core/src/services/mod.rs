//! Component services over the storage layer.
//!
//! Each service borrows a [`Database`](crate::db::Database) and enforces the
//! rules the raw queries do not: required fields, referenced entities,
//! lifecycle transitions and credential checks.

mod admissions;
mod doctors;
mod patients;
mod reports;
mod visitors;

pub use admissions::*;
pub use doctors::*;
pub use patients::*;
pub use reports::*;
pub use visitors::*;

/// Current local date.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
