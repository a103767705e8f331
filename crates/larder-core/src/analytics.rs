//! ============================================================================
//! Spend Analytics - Aggregation over shopping lists
//! ============================================================================
//! Pure computations over normalized lists: period-filtered spend totals,
//! category breakdowns, and top categories. Nothing is cached; every call
//! recomputes from the lists it is given.
//! ============================================================================

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

use crate::catalog::Category;
use crate::db::ShoppingListRepository;
use crate::types::ShoppingList;

/// Analytics time window, resolved against "now" at call time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendPeriod {
    ThisMonth,
    LastMonth,
    #[serde(rename = "last_90_days")]
    Last90Days,
    AllTime,
}

impl SpendPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpendPeriod::ThisMonth => "this_month",
            SpendPeriod::LastMonth => "last_month",
            SpendPeriod::Last90Days => "last_90_days",
            SpendPeriod::AllTime => "all_time",
        }
    }
}

/// List selector: everything, or a single list by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    All,
    One(String),
}

impl ListFilter {
    fn matches(&self, list: &ShoppingList) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::One(id) => list.id == *id,
        }
    }
}

/// Filter applied to spend queries
#[derive(Debug, Clone)]
pub struct SpendFilter {
    pub period: SpendPeriod,
    pub list: ListFilter,
}

impl Default for SpendFilter {
    fn default() -> Self {
        Self {
            period: SpendPeriod::AllTime,
            list: ListFilter::All,
        }
    }
}

/// One category's share of the filtered spend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: Category,
    pub amount: f64,
    pub percentage: f64,
}

/// Inclusive [start, end] bounds for a period, relative to `now`.
/// None on either side means unbounded.
pub fn period_bounds(
    period: SpendPeriod,
    now: DateTime<Utc>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match period {
        SpendPeriod::AllTime => (None, None),
        SpendPeriod::Last90Days => (Some(now - Duration::days(90)), Some(now)),
        SpendPeriod::ThisMonth => {
            let start = month_start(now.year(), now.month(), now);
            let end = next_month_start(now) - Duration::milliseconds(1);
            (Some(start), Some(end))
        }
        SpendPeriod::LastMonth => {
            let (y, m) = if now.month() == 1 {
                (now.year() - 1, 12)
            } else {
                (now.year(), now.month() - 1)
            };
            let start = month_start(y, m, now);
            let end = month_start(now.year(), now.month(), now) - Duration::milliseconds(1);
            (Some(start), Some(end))
        }
    }
}

fn month_start(year: i32, month: u32, fallback: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .unwrap_or(fallback)
}

fn next_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let (y, m) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    month_start(y, m, now)
}

/// Whether a list falls inside a period. Lists without a parseable creation
/// date only count toward all-time.
fn list_in_period(list: &ShoppingList, period: SpendPeriod, now: DateTime<Utc>) -> bool {
    let Some(created) = list.created_at else {
        return matches!(period, SpendPeriod::AllTime);
    };
    let (start, end) = period_bounds(period, now);
    start.map_or(true, |s| created >= s) && end.map_or(true, |e| created <= e)
}

/// Whether a list is included under a filter: the list selector matches and
/// the creation date falls inside the period.
pub fn list_matches(list: &ShoppingList, filter: &SpendFilter, now: DateTime<Utc>) -> bool {
    filter.list.matches(list) && list_in_period(list, filter.period, now)
}

fn included_lists<'a>(
    lists: &'a [ShoppingList],
    filter: &'a SpendFilter,
    now: DateTime<Utc>,
) -> impl Iterator<Item = &'a ShoppingList> {
    lists.iter().filter(move |l| list_matches(l, filter, now))
}

/// Total spend over every item in every included list. Empty input is 0.
pub fn total_spend(lists: &[ShoppingList], filter: &SpendFilter, now: DateTime<Utc>) -> f64 {
    included_lists(lists, filter, now)
        .flat_map(|l| l.items.iter())
        .map(|i| i.price)
        .sum()
}

/// Per-category totals and shares over the included lists, sorted by amount
/// descending. Ties keep first-encounter order. No items yields an empty
/// list, and a zero grand total yields zero percentages.
pub fn category_breakdown(
    lists: &[ShoppingList],
    filter: &SpendFilter,
    now: DateTime<Utc>,
) -> Vec<CategorySpend> {
    let mut order: Vec<Category> = Vec::new();
    let mut totals: HashMap<Category, f64> = HashMap::new();
    let mut grand_total = 0.0;

    for item in included_lists(lists, filter, now).flat_map(|l| l.items.iter()) {
        let amount = totals.entry(item.category).or_insert_with(|| {
            order.push(item.category);
            0.0
        });
        *amount += item.price;
        grand_total += item.price;
    }

    let mut breakdown: Vec<CategorySpend> = order
        .into_iter()
        .map(|category| {
            let amount = totals.get(&category).copied().unwrap_or(0.0);
            let percentage = if grand_total > 0.0 {
                amount / grand_total * 100.0
            } else {
                0.0
            };
            CategorySpend {
                category,
                amount,
                percentage,
            }
        })
        .collect();

    // Stable sort keeps encounter order for equal amounts
    breakdown.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    breakdown
}

/// The three largest categories from the breakdown
pub fn top_categories(
    lists: &[ShoppingList],
    filter: &SpendFilter,
    now: DateTime<Utc>,
) -> Vec<CategorySpend> {
    let mut breakdown = category_breakdown(lists, filter, now);
    breakdown.truncate(3);
    breakdown
}

/// Unfiltered total over every stored list, for the home screen summary
/// card. Equals `total_spend` under the default all-time filter. A failed
/// read logs and reports 0.
pub async fn stored_lists_total(repo: &dyn ShoppingListRepository) -> f64 {
    match repo.load().await {
        Ok(lists) => total_spend(&lists, &SpendFilter::default(), Utc::now()),
        Err(e) => {
            warn!("Failed to load shopping lists for spend total: {}", e);
            0.0
        }
    }
}
