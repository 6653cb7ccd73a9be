use serde::{Deserialize, Serialize};

use crate::FormatError;

const STEP: i64 = 1000;

/// One point of the revenue series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub month: String,
    pub income: i64,
}

impl Income {
    pub fn new(month: impl Into<String>, income: i64) -> Self {
        Self {
            month: month.into(),
            income,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    /// Tick labels from the top of the chart down to `$0K`.
    pub y_axis_labels: Vec<String>,
    /// Highest income rounded up to the next thousand.
    pub top_label: i64,
}

/// Build the Y axis of the revenue chart.
pub fn generate_y_axis(series: &[Income]) -> Result<YAxis, FormatError> {
    let highest = series
        .iter()
        .map(|point| point.income)
        .max()
        .ok_or(FormatError::EmptySeries)?;

    let top_label = ceil_div(highest, STEP)
        .checked_mul(STEP)
        .ok_or(FormatError::OutOfRange(highest))?;

    let mut y_axis_labels = Vec::new();
    let mut tick = top_label;
    while tick >= 0 {
        y_axis_labels.push(format!("${}K", tick / STEP));
        tick -= STEP;
    }

    Ok(YAxis {
        y_axis_labels,
        top_label,
    })
}

fn ceil_div(value: i64, step: i64) -> i64 {
    let quotient = value.div_euclid(step);
    if value.rem_euclid(step) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_top_up_to_the_next_thousand() {
        let axis = generate_y_axis(&[Income::new("Jan", 6200)]).unwrap();
        assert_eq!(axis.top_label, 7000);
        assert_eq!(
            axis.y_axis_labels,
            vec!["$7K", "$6K", "$5K", "$4K", "$3K", "$2K", "$1K", "$0K"]
        );
    }

    #[test]
    fn exact_thousands_are_not_bumped() {
        let series = [Income::new("Jan", 2000), Income::new("Feb", 1800)];
        let axis = generate_y_axis(&series).unwrap();
        assert_eq!(axis.top_label, 2000);
        assert_eq!(axis.y_axis_labels, vec!["$2K", "$1K", "$0K"]);
    }

    #[test]
    fn uses_the_highest_month() {
        let series = [
            Income::new("Jan", 2000),
            Income::new("Feb", 8100),
            Income::new("Mar", 4400),
        ];
        assert_eq!(generate_y_axis(&series).unwrap().top_label, 9000);
    }

    #[test]
    fn all_zero_series_has_a_single_tick() {
        let axis = generate_y_axis(&[Income::new("Jan", 0)]).unwrap();
        assert_eq!(axis.top_label, 0);
        assert_eq!(axis.y_axis_labels, vec!["$0K"]);
    }

    #[test]
    fn empty_series_is_an_error() {
        assert_eq!(generate_y_axis(&[]), Err(FormatError::EmptySeries));
    }

    #[test]
    fn income_near_the_limit_is_out_of_range() {
        let series = [Income::new("Jan", 1200), Income::new("Feb", i64::MAX)];
        assert_eq!(generate_y_axis(&series), Err(FormatError::OutOfRange(i64::MAX)));
    }

    #[test]
    fn serializes_with_chart_field_names() {
        let axis = generate_y_axis(&[Income::new("Jan", 900)]).unwrap();
        assert_eq!(
            serde_json::to_value(axis).unwrap(),
            serde_json::json!({ "yAxisLabels": ["$1K", "$0K"], "topLabel": 1000 })
        );
    }
}
