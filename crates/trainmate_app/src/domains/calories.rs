//! Daily calorie totals for the dashboard chart.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use trainmate_client::CalorieRecord;
use trainmate_client::utils::{format_day_month, format_query_date, parse_calendar_date};

pub const REJECTED_RECORDS: &str = "trainmate_calorie_records_rejected_total";

/// Why a record was left out of the totals.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    MissingDate,
    MalformedDate(String),
    MissingCalories,
    NonNumericCalories(String),
    NegativeCalories(f64),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingDate => f.write_str("missing date"),
            RejectReason::MalformedDate(raw) => write!(f, "unparseable date {raw}"),
            RejectReason::MissingCalories => f.write_str("missing calorie value"),
            RejectReason::NonNumericCalories(raw) => write!(f, "non-numeric calorie value {raw}"),
            RejectReason::NegativeCalories(v) => write!(f, "negative calorie value {v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position in the input slice.
    pub index: usize,
    pub reason: RejectReason,
}

/// Calories summed per calendar date, plus diagnostics for the records that
/// could not be counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaloriesPerDay {
    totals: BTreeMap<NaiveDate, f64>,
    rejected: Vec<RejectedRecord>,
}

impl CaloriesPerDay {
    pub fn totals(&self) -> &BTreeMap<NaiveDate, f64> {
        &self.totals
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.totals.get(&date).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Sum over all days.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    /// `YYYY-MM-DD -> calories`.
    pub fn to_keyed_map(&self) -> BTreeMap<String, f64> {
        self.totals
            .iter()
            .map(|(date, calories)| (format_query_date(*date), *calories))
            .collect()
    }
}

fn parse_date(value: &Value) -> Result<NaiveDate, RejectReason> {
    match value {
        Value::Null => Err(RejectReason::MissingDate),
        Value::String(s) if s.trim().is_empty() => Err(RejectReason::MissingDate),
        Value::String(s) => {
            parse_calendar_date(s).ok_or_else(|| RejectReason::MalformedDate(s.clone()))
        }
        other => Err(RejectReason::MalformedDate(other.to_string())),
    }
}

fn parse_calories(value: &Value) -> Result<f64, RejectReason> {
    let calories = match value {
        Value::Null => return Err(RejectReason::MissingCalories),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| RejectReason::NonNumericCalories(n.to_string()))?,
        Value::String(s) if s.trim().is_empty() => return Err(RejectReason::MissingCalories),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| RejectReason::NonNumericCalories(format!("{s:?}")))?,
        other => return Err(RejectReason::NonNumericCalories(other.to_string())),
    };
    if !calories.is_finite() {
        return Err(RejectReason::NonNumericCalories(calories.to_string()));
    }
    if calories < 0.0 {
        return Err(RejectReason::NegativeCalories(calories));
    }
    Ok(calories)
}

/// Sum calories per calendar date.
///
/// Records with a missing or unparseable date, or a missing, non-numeric,
/// non-finite or negative calorie value are excluded and reported in
/// [`CaloriesPerDay::rejected`]; they never abort the aggregation.
pub fn calculate_calories_per_day(records: &[CalorieRecord]) -> CaloriesPerDay {
    let mut out = CaloriesPerDay::default();
    for (index, record) in records.iter().enumerate() {
        let parsed = parse_date(&record.date)
            .and_then(|date| parse_calories(&record.calories).map(|c| (date, c)));
        match parsed {
            Ok((date, calories)) => *out.totals.entry(date).or_insert(0.0) += calories,
            Err(reason) => {
                tracing::warn!(index, %reason, "skipping calorie record");
                out.rejected.push(RejectedRecord { index, reason });
            }
        }
    }
    if !out.rejected.is_empty() {
        metrics::counter!(REJECTED_RECORDS).increment(out.rejected.len() as u64);
    }
    out
}

/// One point of the calorie line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    /// `dd/mm`
    pub label: String,
    pub calories: f64,
}

/// Chart points in ascending date order.
pub fn chart_points(per_day: &CaloriesPerDay) -> Vec<ChartPoint> {
    per_day
        .totals
        .iter()
        .map(|(date, calories)| ChartPoint {
            date: *date,
            label: format_day_month(*date),
            calories: *calories,
        })
        .collect()
}
