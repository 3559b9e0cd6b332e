// Public entities for the Proofly dashboard report
// These structures are what leaves the process, so their shape is stable

pub mod dashboard;

pub use dashboard::{
    DashboardReport, PublicHealthScore, PublicMetricStatistics, PublicNextCheckup, PublicPrediction,
};
