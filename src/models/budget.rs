use rust_decimal::Decimal;

/// Monthly spending limit for one category. One row per category; writes
/// upsert on the category name. Budget categories are not required to match
/// the categories seen on transactions.
#[derive(Debug, Clone)]
pub(crate) struct Budget {
    pub(crate) id: Option<i64>,
    pub(crate) category: String,
    pub(crate) monthly_limit: Decimal,
}

impl Budget {
    pub(crate) fn new(category: String, monthly_limit: Decimal) -> Self {
        Self {
            id: None,
            category,
            monthly_limit,
        }
    }
}
