/// Named relative date window used to filter and scale dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Range {
    Daily,
    Week,
    Month,
    Yearly,
    All,
}

impl Range {
    pub(crate) fn parse(s: &str) -> Option<Range> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "today" => Some(Range::Daily),
            "week" | "weekly" => Some(Range::Week),
            "month" | "monthly" => Some(Range::Month),
            "yearly" | "year" => Some(Range::Yearly),
            "all" => Some(Range::All),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Range::Daily => "daily",
            Range::Week => "week",
            Range::Month => "month",
            Range::Yearly => "yearly",
            Range::All => "all",
        }
    }

    pub(crate) fn all() -> &'static [Range] {
        &[
            Range::Daily,
            Range::Week,
            Range::Month,
            Range::Yearly,
            Range::All,
        ]
    }

    pub(crate) fn next(&self) -> Range {
        let ranges = Range::all();
        let idx = ranges.iter().position(|r| r == self).unwrap_or(0);
        ranges[(idx + 1) % ranges.len()]
    }

    pub(crate) fn prev(&self) -> Range {
        let ranges = Range::all();
        let idx = ranges.iter().position(|r| r == self).unwrap_or(0);
        ranges[(idx + ranges.len() - 1) % ranges.len()]
    }

    /// Human label for titles and cards.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Range::Daily => "Today",
            Range::Week => "This Week",
            Range::Month => "Last 30 Days",
            Range::Yearly => "Last 12 Months",
            Range::All => "All Time",
        }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
