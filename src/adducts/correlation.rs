//! Pairwise correlation of extracted ion chromatograms.
//!
//! Every function returns `NaN` when the coefficient is undefined, which is
//! the case for constant series. `NaN` never passes a threshold comparison.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::AdductError;

/// Correlation coefficient used to compare two traces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Pearson product-moment correlation
    Pearson,
    /// Pearson correlation of average ranks
    #[default]
    Spearman,
    /// Kendall rank correlation, tau-b variant
    Kendall,
}

impl CorrelationMethod {
    /// Correlation of two equal-length series
    pub fn correlate(&self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            Self::Pearson => pearson(x, y),
            Self::Spearman => pearson(&average_ranks(x), &average_ranks(y)),
            Self::Kendall => kendall_tau_b(x, y),
        }
    }
}

impl FromStr for CorrelationMethod {
    type Err = AdductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pearson" => Ok(Self::Pearson),
            "spearman" => Ok(Self::Spearman),
            "kendall" => Ok(Self::Kendall),
            _ => Err(AdductError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
            Self::Kendall => "kendall",
        };
        f.write_str(name)
    }
}

/// Pearson correlation coefficient, clamped to `[-1, 1]`
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return f64::NAN;
    }
    (cov / denominator).clamp(-1.0, 1.0)
}

/// 1-based ranks; tied values share the mean of the ranks they span
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + end + 1) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }
        start = end;
    }
    ranks
}

/// Kendall's tau-b, accounting for ties in either series
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut tied_x = 0i64;
    let mut tied_y = 0i64;
    for i in 0..n {
        for j in i + 1..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            match (dx == 0.0, dy == 0.0) {
                (true, true) => {}
                (true, false) => tied_x += 1,
                (false, true) => tied_y += 1,
                (false, false) => {
                    if (dx > 0.0) == (dy > 0.0) {
                        concordant += 1;
                    } else {
                        discordant += 1;
                    }
                }
            }
        }
    }

    let untied = (concordant + discordant) as f64;
    let denominator = ((untied + tied_x as f64) * (untied + tied_y as f64)).sqrt();
    if denominator == 0.0 {
        return f64::NAN;
    }
    (concordant - discordant) as f64 / denominator
}

/// Symmetric matrix of pairwise trace correlations
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    size: usize,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Correlate every pair of `traces`
    pub fn compute(traces: &[Vec<f64>], method: CorrelationMethod) -> Self {
        let size = traces.len();

        // ranks are computed once per trace instead of once per pair
        let ranked;
        let (series, pairwise): (&[Vec<f64>], fn(&[f64], &[f64]) -> f64) = match method {
            CorrelationMethod::Pearson => (traces, pearson),
            CorrelationMethod::Spearman => {
                ranked = traces.iter().map(|t| average_ranks(t)).collect::<Vec<_>>();
                (&ranked, pearson)
            }
            CorrelationMethod::Kendall => (traces, kendall_tau_b),
        };

        let upper = |i: usize| -> Vec<f64> {
            (i + 1..size)
                .map(|j| pairwise(&series[i], &series[j]))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = (0..size).into_par_iter().map(upper).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = (0..size).map(upper).collect();

        let mut values = vec![f64::NAN; size * size];
        for (i, row) in rows.into_iter().enumerate() {
            values[i * size + i] = 1.0;
            for (offset, corr) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                values[i * size + j] = corr;
                values[j * size + i] = corr;
            }
        }

        Self { size, values }
    }

    /// Number of traces
    pub fn size(&self) -> usize {
        self.size
    }

    /// Correlation of traces `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Correlations of trace `i` against every trace
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }
}
