use crate::features::FeatureSink;
use crate::features::naming::Param;
use crate::statistics::shared::{diff, mean, quantile_of_sorted, sorted, variance};

const QUANTILES: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// Aggregated consecutive changes inside the corridor between two quantiles.
///
/// A change counts only when both of its endpoints lie in the corridor.
/// Yields zero when the corridor is degenerate or holds no change.
pub fn change_quantiles(x: &[f64], sink: &mut FeatureSink) {
    let ordered = sorted(x);
    let changes = diff(x);
    for (i, ql) in QUANTILES.iter().copied().enumerate() {
        for qh in QUANTILES.iter().copied().skip(i + 1) {
            let lower = quantile_of_sorted(&ordered, ql);
            let upper = quantile_of_sorted(&ordered, qh);
            let inside = x.iter()
                .map(|v| *v >= lower && *v <= upper)
                .collect::<Vec<_>>();
            for isabs in [false, true] {
                let selected = changes.iter()
                    .enumerate()
                    .filter(|(j, _)| inside[*j] && inside[j + 1])
                    .map(|(_, d)| if isabs { d.abs() } else { *d })
                    .collect::<Vec<_>>();
                for (name, aggregate) in [("mean", mean as fn(&[f64]) -> f64), ("var", variance)] {
                    let value = if lower == upper || selected.is_empty() {
                        0.0
                    } else {
                        aggregate(&selected)
                    };
                    sink.emit("change_quantiles",
                              &[
                                  ("f_agg", Param::Str(name)),
                                  ("isabs", Param::Bool(isabs)),
                                  ("qh", Param::Float(qh)),
                                  ("ql", Param::Float(ql)),
                              ],
                              value);
                }
            }
        }
    }
}
