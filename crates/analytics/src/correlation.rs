use core_types::{HourlySample, Variable};
use serde::{Deserialize, Serialize};

use crate::numeric::{correlation_p_value, pearson};

/// Minimum number of paired observations for a meaningful coefficient.
pub const MIN_PAIRS: usize = 3;

/// Pearson correlation between every pair of a set of variables.
///
/// Both matrices are square in `variables.len()`, symmetric, and the diagonal
/// is exactly 1 with a p-value of 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<Variable>,
    pub coefficients: Vec<Vec<f64>>,
    pub p_values: Vec<Vec<f64>>,
}

/// Coefficient and significance of a single variable pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairCorrelation {
    pub r: f64,
    pub p_value: f64,
    /// Number of hours where both variables were present.
    pub pairs: usize,
}

impl CorrelationMatrix {
    /// Looks up the coefficient for two variables in the matrix.
    pub fn coefficient(&self, a: Variable, b: Variable) -> Option<f64> {
        let i = self.variables.iter().position(|v| *v == a)?;
        let j = self.variables.iter().position(|v| *v == b)?;
        Some(self.coefficients[i][j])
    }

    pub fn p_value(&self, a: Variable, b: Variable) -> Option<f64> {
        let i = self.variables.iter().position(|v| *v == a)?;
        let j = self.variables.iter().position(|v| *v == b)?;
        Some(self.p_values[i][j])
    }
}

/// Values of two variables over the hours where both are present.
pub fn paired_values(series: &[HourlySample], a: Variable, b: Variable) -> (Vec<f64>, Vec<f64>) {
    series
        .iter()
        .filter_map(|s| Some((s.get(a)?, s.get(b)?)))
        .unzip()
}

/// Correlates two variables over their pairwise-complete observations.
///
/// Fewer than three pairs, or a side without variance, gives r = 0 and p = 1.
pub fn correlate(series: &[HourlySample], a: Variable, b: Variable) -> PairCorrelation {
    let (xs, ys) = paired_values(series, a, b);
    let pairs = xs.len();
    if pairs < MIN_PAIRS {
        return PairCorrelation {
            r: 0.0,
            p_value: 1.0,
            pairs,
        };
    }

    let r = pearson(&xs, &ys);
    let p_value = if r == 0.0 {
        1.0
    } else {
        correlation_p_value(r, pairs)
    };
    PairCorrelation { r, p_value, pairs }
}

/// Builds the matrix for `variables`, keeping their order. Variables without a
/// single valid reading in the series are left out.
pub fn correlation_matrix(series: &[HourlySample], variables: &[Variable]) -> CorrelationMatrix {
    let variables: Vec<Variable> = variables
        .iter()
        .copied()
        .filter(|v| series.iter().any(|s| s.has(*v)))
        .collect();
    let n = variables.len();

    let mut coefficients = vec![vec![0.0; n]; n];
    let mut p_values = vec![vec![1.0; n]; n];

    for i in 0..n {
        coefficients[i][i] = 1.0;
        p_values[i][i] = 0.0;
        for j in (i + 1)..n {
            let pair = correlate(series, variables[i], variables[j]);
            if pair.pairs < MIN_PAIRS {
                tracing::debug!(
                    a = %variables[i],
                    b = %variables[j],
                    pairs = pair.pairs,
                    "insufficient paired observations"
                );
            }
            coefficients[i][j] = pair.r;
            coefficients[j][i] = pair.r;
            p_values[i][j] = pair.p_value;
            p_values[j][i] = pair.p_value;
        }
    }

    CorrelationMatrix {
        variables,
        coefficients,
        p_values,
    }
}
