//! Group observations by date and stack them into cumulative bands.
//!
//! This is the heart of the pipeline. Everything here is a pure function of
//! its inputs: no shared state, no I/O, linear in the number of
//! observations, safe to call repeatedly.
//!
//! Policies (applied uniformly, see DESIGN.md):
//! - duplicate `(date, category)` observations **sum** their counts
//! - categories absent at a date contribute a zero-width band
//! - categories absent from the order follow the [`UnknownCategory`] policy

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{
    CategoryOrder, DateStack, Observation, StackedBand, StackedSeries, UnknownCategory,
};
use crate::error::AppError;

/// A category that appeared in the data but not in the configured order,
/// with the total count that was left out of the series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCategory {
    pub category: String,
    pub count: u64,
}

/// Stacking output: the series plus an account of anything dropped under
/// [`UnknownCategory::Drop`]. Dropped counts are surfaced so the caller can
/// warn instead of silently shrinking totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutput {
    pub series: StackedSeries,
    pub dropped: Vec<DroppedCategory>,
}

/// Build the stacked series for `observations` under `order`.
///
/// One [`DateStack`] per distinct date, ascending; each stack carries exactly
/// `order.len()` bands that tile `[0, total]` contiguously in category
/// order. Duplicate `(date, category)` pairs are summed — repeated export
/// rows add up rather than shadowing each other.
pub fn stack(
    observations: &[Observation],
    order: &CategoryOrder,
    unknown: UnknownCategory,
) -> Result<StackOutput, AppError> {
    // BTreeMap keeps dates ascending regardless of input row order.
    let mut by_date: BTreeMap<NaiveDate, Vec<u64>> = BTreeMap::new();
    let mut dropped: BTreeMap<String, u64> = BTreeMap::new();

    for obs in observations {
        match order.index_of(&obs.category) {
            Some(idx) => {
                let counts = by_date
                    .entry(obs.date)
                    .or_insert_with(|| vec![0; order.len()]);
                counts[idx] += obs.count;
            }
            None => match unknown {
                UnknownCategory::Fail => {
                    return Err(AppError::new(
                        2,
                        format!(
                            "Category '{}' (seen at {}) is not in the configured category order.",
                            obs.category, obs.date
                        ),
                    ));
                }
                UnknownCategory::Drop => {
                    *dropped.entry(obs.category.clone()).or_insert(0) += obs.count;
                }
            },
        }
    }

    let dates = by_date
        .into_iter()
        .map(|(date, counts)| {
            let mut running = 0u64;
            let bands = order
                .iter()
                .zip(counts)
                .map(|(category, count)| {
                    let low = running;
                    running += count;
                    StackedBand {
                        category: category.to_string(),
                        low,
                        high: running,
                    }
                })
                .collect();
            DateStack { date, bands }
        })
        .collect();

    Ok(StackOutput {
        series: StackedSeries {
            order: order.clone(),
            dates,
        },
        dropped: dropped
            .into_iter()
            .map(|(category, count)| DroppedCategory { category, count })
            .collect(),
    })
}

/// Total calls per calendar year, ascending by year.
pub fn yearly_totals(observations: &[Observation]) -> Vec<(i32, u64)> {
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    for obs in observations {
        *by_year.entry(obs.date.year()).or_insert(0) += obs.count;
    }
    by_year.into_iter().collect()
}

/// The largest yearly call total, used by renderers to size the value axis.
///
/// Returns 0 when there are no observations.
pub fn max_yearly_total(observations: &[Observation]) -> u64 {
    yearly_totals(observations)
        .into_iter()
        .map(|(_, total)| total)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(date: &str, category: &str, count: u64) -> Observation {
        Observation {
            date: NaiveDate::parse_from_str(date, "%m/%d/%Y").unwrap(),
            category: category.to_string(),
            count,
        }
    }

    fn order(labels: &[&str]) -> CategoryOrder {
        CategoryOrder::new(labels.iter().copied())
    }

    #[test]
    fn bands_follow_category_order_not_input_order() {
        let observations = vec![obs("01/01/2020", "Fire", 3), obs("01/01/2020", "Medical", 2)];
        let out = stack(&observations, &order(&["Medical", "Fire"]), UnknownCategory::Drop).unwrap();

        assert_eq!(out.series.dates.len(), 1);
        let bands = &out.series.dates[0].bands;
        assert_eq!(bands[0].category, "Medical");
        assert_eq!((bands[0].low, bands[0].high), (0, 2));
        assert_eq!(bands[1].category, "Fire");
        assert_eq!((bands[1].low, bands[1].high), (2, 5));
    }

    #[test]
    fn dates_sort_ascending_regardless_of_input_order() {
        let observations = vec![
            obs("06/15/2020", "Fire", 1),
            obs("01/01/2020", "Fire", 1),
            obs("03/10/2020", "Fire", 1),
        ];
        let out = stack(&observations, &order(&["Fire"]), UnknownCategory::Drop).unwrap();

        let dates: Vec<_> = out.series.dates.iter().map(|d| d.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(dates.len(), 3);
    }

    #[test]
    fn missing_categories_fill_as_zero_width_bands() {
        let observations = vec![obs("01/01/2020", "Fire", 3), obs("01/01/2020", "Rescue", 2)];
        let seven = order(&[
            "Aid Other Agency",
            "Chemical / Electrical",
            "Fire",
            "Medical",
            "Misc Emergency",
            "Rescue",
            "Various Other",
        ]);
        let out = stack(&observations, &seven, UnknownCategory::Drop).unwrap();

        let bands = &out.series.dates[0].bands;
        assert_eq!(bands.len(), 7);
        let zero_width = bands.iter().filter(|b| b.low == b.high).count();
        assert_eq!(zero_width, 5);
        assert_eq!(out.series.dates[0].total(), 5);
    }

    #[test]
    fn bands_tile_contiguously_and_conserve_totals() {
        let observations = vec![
            obs("01/01/2020", "Fire", 3),
            obs("01/01/2020", "Medical", 7),
            obs("01/02/2020", "Medical", 4),
            obs("01/02/2020", "Rescue", 1),
        ];
        let out = stack(
            &observations,
            &order(&["Fire", "Medical", "Rescue"]),
            UnknownCategory::Drop,
        )
        .unwrap();

        for date_stack in &out.series.dates {
            assert_eq!(date_stack.bands[0].low, 0);
            for pair in date_stack.bands.windows(2) {
                assert_eq!(pair[0].high, pair[1].low);
            }
            let sum: u64 = observations
                .iter()
                .filter(|o| o.date == date_stack.date)
                .map(|o| o.count)
                .sum();
            assert_eq!(date_stack.total(), sum);
        }
    }

    #[test]
    fn duplicate_observations_sum_counts() {
        let observations = vec![obs("01/01/2020", "Fire", 1), obs("01/01/2020", "Fire", 1)];
        let out = stack(&observations, &order(&["Fire"]), UnknownCategory::Drop).unwrap();

        assert_eq!(out.series.dates[0].bands[0].count(), 2);
    }

    #[test]
    fn stacking_is_deterministic() {
        let observations = vec![
            obs("02/01/2020", "Medical", 5),
            obs("01/01/2020", "Fire", 2),
            obs("01/01/2020", "Medical", 1),
        ];
        let o = order(&["Medical", "Fire"]);
        let first = stack(&observations, &o, UnknownCategory::Drop).unwrap();
        let second = stack(&observations, &o, UnknownCategory::Drop).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_categories_drop_with_accounting() {
        let observations = vec![
            obs("01/01/2020", "Fire", 3),
            obs("01/01/2020", "Earthquake", 9),
            obs("01/02/2020", "Earthquake", 1),
        ];
        let out = stack(&observations, &order(&["Fire"]), UnknownCategory::Drop).unwrap();

        assert_eq!(out.series.dates.len(), 1);
        assert_eq!(out.series.dates[0].total(), 3);
        assert_eq!(
            out.dropped,
            vec![DroppedCategory {
                category: "Earthquake".to_string(),
                count: 10,
            }]
        );
    }

    #[test]
    fn unknown_categories_can_fail_the_run() {
        let observations = vec![obs("01/01/2020", "Earthquake", 9)];
        let err = stack(&observations, &order(&["Fire"]), UnknownCategory::Fail).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Earthquake"));
    }

    #[test]
    fn max_yearly_total_picks_the_largest_year() {
        let observations = vec![
            obs("01/01/2019", "Fire", 4),
            obs("06/01/2019", "Medical", 6),
            obs("01/01/2020", "Fire", 15),
        ];
        assert_eq!(yearly_totals(&observations), vec![(2019, 10), (2020, 15)]);
        assert_eq!(max_yearly_total(&observations), 15);
    }

    #[test]
    fn max_yearly_total_of_nothing_is_zero() {
        assert_eq!(max_yearly_total(&[]), 0);
    }
}
