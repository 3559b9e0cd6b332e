use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::services::errors::HealthSignalError;
use crate::services::scheduler::{UrgencyAggregation, DEFAULT_LOOKBACK};

/// Settings for the health-signal derivations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProoflyConfig {
    /// Readings that feed the per-type statistics
    pub statistics_window: usize,
    /// Readings considered for a checkup recommendation
    pub checkup_lookback: usize,
    /// Prediction cards shown at most
    pub prediction_limit: usize,
    /// Readings that feed the overall health score
    pub health_score_lookback: usize,
    /// How flagged readings combine into one urgency
    pub urgency_aggregation: UrgencyAggregation,
}

impl Default for ProoflyConfig {
    fn default() -> Self {
        Self {
            statistics_window: 30,
            checkup_lookback: DEFAULT_LOOKBACK,
            prediction_limit: 10,
            health_score_lookback: 10,
            urgency_aggregation: UrgencyAggregation::MaxSeverity,
        }
    }
}

impl ProoflyConfig {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, HealthSignalError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings from any key lookup.
    ///
    /// Counts that are missing or fail to parse keep their defaults. An
    /// unknown aggregation mode is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HealthSignalError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let count = |key: &str, default: usize| -> usize {
            match lookup(key) {
                Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                    warn!("Ignoring invalid {}={}, using {}", key, raw, default);
                    default
                }),
                None => default,
            }
        };

        let urgency_aggregation = match lookup("PROOFLY_URGENCY_AGGREGATION") {
            Some(raw) => UrgencyAggregation::from_str(raw.trim())?,
            None => defaults.urgency_aggregation,
        };

        let config = Self {
            statistics_window: count("PROOFLY_STATISTICS_WINDOW", defaults.statistics_window),
            checkup_lookback: count("PROOFLY_CHECKUP_LOOKBACK", defaults.checkup_lookback),
            prediction_limit: count("PROOFLY_PREDICTION_LIMIT", defaults.prediction_limit),
            health_score_lookback: count("PROOFLY_HEALTH_SCORE_LOOKBACK", defaults.health_score_lookback),
            urgency_aggregation,
        };

        info!(
            "Health signal config: statistics window {}, checkup lookback {}, prediction limit {}, score lookback {}, aggregation {}",
            config.statistics_window,
            config.checkup_lookback,
            config.prediction_limit,
            config.health_score_lookback,
            config.urgency_aggregation
        );

        Ok(config)
    }
}
