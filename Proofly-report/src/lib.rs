// Proofly Report
//
// Assembles the dashboard view of a snapshot: statistics, prediction cards,
// the health score and the next-checkup card.

// Public modules
pub mod entities;
pub mod report;

pub use report::{build_report, render_report, ReportError};
