use chrono::{DateTime, Utc};
use core_types::Variable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::anomaly::AnomalyRecord;
use crate::correlation::CorrelationMatrix;
use crate::descriptive::VariableStatistics;
use crate::quality::QualityReport;
use crate::trend::TrendResult;

/// The complete research bundle for one atmospheric record.
///
/// This struct is the final output of the `AtmosphericAnalyzer`. Optional
/// sections are `None` when they were switched off in the analysis parameters,
/// not when the data was insufficient: insufficient data is reported inside the
/// section itself (r = 0, a stable trend, and so on).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericResearchData {
    /// Caller-supplied location/time-range label, carried through unmodified.
    pub label: String,
    pub sample_count: usize,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub statistics: BTreeMap<Variable, VariableStatistics>,
    pub correlations: Option<CorrelationMatrix>,
    pub trends: Option<Vec<TrendResult>>,
    pub anomalies: Option<Vec<AnomalyRecord>>,
    pub quality: QualityReport,
}

impl AtmosphericResearchData {
    /// Variables with at least one valid reading, in canonical order.
    pub fn observed_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.statistics
            .iter()
            .filter(|(_, stats)| stats.count > 0)
            .map(|(variable, _)| *variable)
    }
}
