//! Domain models for the admissions system.

mod admission;
mod doctor;
mod patient;
mod report;
mod visitor;

pub use admission::*;
pub use doctor::*;
pub use patient::*;
pub use report::*;
pub use visitor::*;
