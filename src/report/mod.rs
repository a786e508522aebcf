use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::models::{Budget, Range, Transaction};

/// Width of the rolling "month" window, in days (inclusive).
pub(crate) const MONTH_WINDOW_DAYS: u64 = 30;

/// Closed date interval. Both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateWindow {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl DateWindow {
    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Resolve a symbolic range against the current day. `None` means
/// unbounded: no date filtering at all.
pub(crate) fn resolve_range(range: Range, today: NaiveDate) -> Option<DateWindow> {
    match range {
        Range::Daily => Some(DateWindow {
            start: today,
            end: today,
        }),
        Range::Week => {
            let week = today.week(Weekday::Mon);
            Some(DateWindow {
                start: week.first_day(),
                end: week.last_day(),
            })
        }
        Range::Month => Some(DateWindow {
            start: today
                .checked_sub_days(Days::new(MONTH_WINDOW_DAYS - 1))
                .unwrap_or(today),
            end: today,
        }),
        Range::Yearly => Some(DateWindow {
            start: today
                .checked_sub_months(Months::new(12))
                .unwrap_or(today),
            end: today,
        }),
        Range::All => None,
    }
}

/// Spend/income totals and the expense breakdown for one window.
#[derive(Debug, Clone, Default)]
pub(crate) struct Summary {
    pub(crate) spent: Decimal,
    pub(crate) income: Decimal,
    /// Expense totals per category, sorted descending by amount.
    pub(crate) by_category: Vec<(String, Decimal)>,
}

/// Pure aggregation over an in-memory transaction list. Entries whose date
/// doesn't parse match no bounded window but do count when `window` is
/// `None`.
pub(crate) fn aggregate(transactions: &[Transaction], window: Option<&DateWindow>) -> Summary {
    let mut spent = Decimal::ZERO;
    let mut income = Decimal::ZERO;
    let mut buckets: HashMap<&str, Decimal> = HashMap::new();

    for txn in transactions {
        if !in_window(txn, window) {
            continue;
        }
        if txn.is_expense() {
            spent += txn.amount;
            *buckets.entry(txn.category.as_str()).or_default() += txn.amount;
        } else {
            income += txn.amount;
        }
    }

    let mut by_category: Vec<(String, Decimal)> = buckets
        .into_iter()
        .map(|(name, amt)| (name.to_string(), amt))
        .collect();
    by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Summary {
        spent,
        income,
        by_category,
    }
}

fn in_window(txn: &Transaction, window: Option<&DateWindow>) -> bool {
    match window {
        None => true,
        Some(w) => txn.parsed_date().is_some_and(|d| w.contains(d)),
    }
}

pub(crate) fn monthly_budget_total(budgets: &[Budget]) -> Decimal {
    budgets.iter().map(|b| b.monthly_limit).sum()
}

/// Scale a monthly budget figure to the selected window so it is comparable
/// with the window's spend total. For `all`, the figure is stretched over
/// the calendar months spanned by the earliest and latest dated
/// transactions (inclusive); with no dated transactions it passes through
/// unchanged.
pub(crate) fn scale_budget(
    monthly_total: Decimal,
    range: Range,
    transactions: &[Transaction],
) -> Decimal {
    match range {
        Range::Daily => monthly_total / Decimal::from(MONTH_WINDOW_DAYS),
        Range::Week => monthly_total / Decimal::from(4),
        Range::Month => monthly_total,
        Range::Yearly => monthly_total * Decimal::from(12),
        Range::All => {
            monthly_total * Decimal::from(months_spanned(transactions).unwrap_or(1))
        }
    }
}

/// Inclusive count of calendar months between the earliest and latest
/// parseable transaction dates.
fn months_spanned(transactions: &[Transaction]) -> Option<i64> {
    let mut dates = transactions.iter().filter_map(|t| t.parsed_date());
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    let index = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
    Some(index(max) - index(min) + 1)
}

#[cfg(test)]
mod tests;
