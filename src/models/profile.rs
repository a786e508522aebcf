use rust_decimal::Decimal;

pub(crate) const DEFAULT_CATEGORIES: &[&str] = &[
    "Food",
    "Groceries",
    "Transport",
    "Housing",
    "Utilities",
    "Entertainment",
    "Health",
    "Shopping",
    "Savings",
    "Other",
];

/// The single user's profile. Created once by the setup flow, edited from
/// the settings screen afterwards.
#[derive(Debug, Clone)]
pub(crate) struct Profile {
    pub(crate) display_name: String,
    /// Ordered category list offered by the entry wizard. Transactions may
    /// still carry categories outside this list.
    pub(crate) categories: Vec<String>,
    pub(crate) monthly_income: Decimal,
    pub(crate) savings_goal: Decimal,
    /// Key for the third-party notification provider, if the user set one.
    pub(crate) notify_key: Option<String>,
}

impl Profile {
    pub(crate) fn new(display_name: String) -> Self {
        Self {
            display_name,
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            monthly_income: Decimal::ZERO,
            savings_goal: Decimal::ZERO,
            notify_key: None,
        }
    }

    /// Add a category if it isn't already present (case-insensitive).
    pub(crate) fn add_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let exists = self
            .categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(name));
        if exists {
            return false;
        }
        self.categories.push(name.to_string());
        true
    }

    pub(crate) fn remove_category(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        self.categories
            .retain(|c| !c.eq_ignore_ascii_case(name.trim()));
        self.categories.len() != before
    }
}
