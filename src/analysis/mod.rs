pub mod bivariate;

pub use bivariate::{linear_regression, pearson};

use im::Vector;

use crate::core::metrics::{mean, population_std};
use crate::core::{Bivariate, EmployeeRecord, ScatterPoint, ScoreField, ScoreVariant};

/// Paired axis values over the filtered set; records with a non-finite
/// value on either axis contribute to neither.
fn paired_values(
    records: &Vector<EmployeeRecord>,
    x: ScoreField,
    y: ScoreField,
    variant: ScoreVariant,
) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::with_capacity(records.len());
    let mut ys = Vec::with_capacity(records.len());
    for record in records {
        let vx = record.score(x, variant);
        let vy = record.score(y, variant);
        if vx.is_finite() && vy.is_finite() {
            xs.push(vx);
            ys.push(vy);
        }
    }
    (xs, ys)
}

/// Pearson correlation and OLS regression over a field pair. Recomputed
/// from scratch on every call; there is no incremental state.
pub fn bivariate(
    records: &Vector<EmployeeRecord>,
    x: ScoreField,
    y: ScoreField,
    variant: ScoreVariant,
) -> Bivariate {
    let (xs, ys) = paired_values(records, x, y, variant);
    Bivariate {
        n: xs.len(),
        r: pearson(&xs, &ys),
        regression: linear_regression(&xs, &ys),
    }
}

/// Scatter tuples for the rendering boundary: size carries the
/// marginalization layer count, category the intersectional label, and
/// the outlier flag marks points more than two standard deviations from
/// the mean on either axis.
pub fn scatter_points(
    records: &Vector<EmployeeRecord>,
    x: ScoreField,
    y: ScoreField,
    variant: ScoreVariant,
) -> Vec<ScatterPoint> {
    let (xs, ys) = paired_values(records, x, y, variant);
    let x_mean = mean(&xs).unwrap_or(0.0);
    let y_mean = mean(&ys).unwrap_or(0.0);
    let x_std = population_std(&xs).unwrap_or(0.0);
    let y_std = population_std(&ys).unwrap_or(0.0);

    records
        .iter()
        .filter_map(|record| {
            let vx = record.score(x, variant);
            let vy = record.score(y, variant);
            if !vx.is_finite() || !vy.is_finite() {
                return None;
            }
            let x_z = if x_std > 0.0 {
                ((vx - x_mean) / x_std).abs()
            } else {
                0.0
            };
            let y_z = if y_std > 0.0 {
                ((vy - y_mean) / y_std).abs()
            } else {
                0.0
            };
            Some(ScatterPoint {
                x: vx,
                y: vy,
                size: record.layers,
                category: record.intersection.clone(),
                outlier: x_z > 2.0 || y_z > 2.0,
            })
        })
        .collect()
}
