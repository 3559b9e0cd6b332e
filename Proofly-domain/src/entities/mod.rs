// Domain entities and value objects
pub mod checkup;
pub mod conversions;
pub mod metric;
pub mod risk;

// Re-export common types for easier imports
pub use checkup::{CheckupRecommendation, CheckupSchedule, NextCheckupView, UrgencyBadge, UrgencyTier};
pub use metric::{MetricRecord, MetricStatistics, MetricType, RiskDirection, TrendDirection};
pub use risk::{HealthScore, Prediction, RiskAssessment, RiskTier};
