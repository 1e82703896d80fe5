// correlation.rs

//! Pairwise Pearson correlation between the pollutant and weather columns.

use crate::dataset::schema::TRACKED_COLUMNS;
use crate::error::AirstatError;
use polars::prelude::{col, Column, DataFrame, Float64Chunked, LazyFrame};
use serde::Serialize;

const VARIABLE_COUNT: usize = TRACKED_COLUMNS.len();

/// Two variables and their Pearson correlation coefficient.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct CorrelationPair {
    pub first: &'static str,
    pub second: &'static str,
    pub coefficient: f64,
}

/// Symmetric 11×11 matrix of pairwise-complete Pearson coefficients over the
/// six pollutant and five weather columns.
///
/// Each pair's coefficient uses exactly the rows where both of that pair's
/// values are non-missing, so different pairs may draw on different row
/// subsets. A cell is `None` when its pair has fewer than two complete
/// observations or either side has zero variance over those observations,
/// including the diagonal of a constant column. The diagonal is exactly
/// `1.0` everywhere else.
///
/// Instances are obtained via
/// [`crate::ObservationsLazyFrame::weather_correlation`].
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct CorrelationMatrix {
    // Row-major VARIABLE_COUNT x VARIABLE_COUNT, indexed like TRACKED_COLUMNS.
    coefficients: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub(crate) fn from_observations(observations: LazyFrame) -> Result<Self, AirstatError> {
        let df = observations
            .select(TRACKED_COLUMNS.map(|name| col(name)))
            .collect()?;
        let mut columns = Vec::with_capacity(VARIABLE_COUNT);
        for name in TRACKED_COLUMNS {
            columns.push(df.column(name)?.f64()?);
        }

        let mut coefficients = vec![None; VARIABLE_COUNT * VARIABLE_COUNT];
        for i in 0..VARIABLE_COUNT {
            for j in i..VARIABLE_COUNT {
                let value = if i == j {
                    self_correlation(columns[i])
                } else {
                    pairwise_pearson(columns[i], columns[j])
                };
                coefficients[i * VARIABLE_COUNT + j] = value;
                coefficients[j * VARIABLE_COUNT + i] = value;
            }
        }
        Ok(Self { coefficients })
    }

    /// The variables the matrix covers, in row/column order.
    pub fn variables(&self) -> [&'static str; VARIABLE_COUNT] {
        TRACKED_COLUMNS
    }

    /// Coefficient for a pair of variables by name, `None` for unknown names
    /// or undefined cells.
    pub fn get(&self, first: &str, second: &str) -> Option<f64> {
        let i = TRACKED_COLUMNS.iter().position(|name| *name == first)?;
        let j = TRACKED_COLUMNS.iter().position(|name| *name == second)?;
        self.coefficient(i, j)
    }

    /// Coefficient by row/column index into [`Self::variables`].
    pub fn coefficient(&self, row: usize, column: usize) -> Option<f64> {
        if row >= VARIABLE_COUNT || column >= VARIABLE_COUNT {
            return None;
        }
        self.coefficients[row * VARIABLE_COUNT + column]
    }

    /// The `limit` variable pairs with the strongest |coefficient|,
    /// descending. Self-correlations are excluded and each unordered pair is
    /// reported once.
    pub fn strongest_pairs(&self, limit: usize) -> Vec<CorrelationPair> {
        let mut pairs = Vec::new();
        for i in 0..VARIABLE_COUNT {
            for j in (i + 1)..VARIABLE_COUNT {
                if let Some(coefficient) = self.coefficients[i * VARIABLE_COUNT + j] {
                    pairs.push(CorrelationPair {
                        first: TRACKED_COLUMNS[i],
                        second: TRACKED_COLUMNS[j],
                        coefficient,
                    });
                }
            }
        }
        pairs.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
        pairs.truncate(limit);
        pairs
    }

    /// Renders the matrix as a DataFrame: a `variable` label column followed
    /// by one Float64 column per variable.
    pub fn to_dataframe(&self) -> Result<DataFrame, AirstatError> {
        let mut columns: Vec<Column> = Vec::with_capacity(VARIABLE_COUNT + 1);
        columns.push(Column::new("variable".into(), TRACKED_COLUMNS.to_vec()));
        for (j, name) in TRACKED_COLUMNS.iter().enumerate() {
            let values: Vec<Option<f64>> = (0..VARIABLE_COUNT)
                .map(|i| self.coefficients[i * VARIABLE_COUNT + j])
                .collect();
            columns.push(Column::new((*name).into(), values));
        }
        DataFrame::new(columns).map_err(AirstatError::from)
    }
}

/// Pearson coefficient over the rows where both columns are non-missing.
fn pairwise_pearson(a: &Float64Chunked, b: &Float64Chunked) -> Option<f64> {
    let mut count = 0.0f64;
    let mut sum_a = 0.0f64;
    let mut sum_b = 0.0f64;
    let mut sum_aa = 0.0f64;
    let mut sum_bb = 0.0f64;
    let mut sum_ab = 0.0f64;
    for (left, right) in a.into_iter().zip(b) {
        let (Some(x), Some(y)) = (left, right) else {
            continue;
        };
        count += 1.0;
        sum_a += x;
        sum_b += y;
        sum_aa += x * x;
        sum_bb += y * y;
        sum_ab += x * y;
    }
    if count < 2.0 {
        return None;
    }
    let var_a = count * sum_aa - sum_a * sum_a;
    let var_b = count * sum_bb - sum_b * sum_b;
    if var_a <= 0.0 || var_b <= 0.0 {
        return None;
    }
    Some((count * sum_ab - sum_a * sum_b) / (var_a.sqrt() * var_b.sqrt()))
}

/// Diagonal cell: exactly 1.0 when the column has at least two non-missing
/// values and non-zero variance, otherwise undefined.
fn self_correlation(column: &Float64Chunked) -> Option<f64> {
    let mut count = 0.0f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for value in column.into_iter().flatten() {
        count += 1.0;
        sum += value;
        sum_sq += value * value;
    }
    if count < 2.0 || count * sum_sq - sum * sum <= 0.0 {
        None
    } else {
        Some(1.0)
    }
}
