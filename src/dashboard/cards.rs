//! The stat cards at the top of the dashboard.

use maud::{Markup, html};

use crate::aggregation::DashboardStats;

/// The accent colour of a stat card's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardTone {
    Primary,
    Warning,
    Success,
    Accent,
}

impl CardTone {
    fn value_style(self) -> &'static str {
        match self {
            CardTone::Primary => "text-blue-600 dark:text-blue-400",
            CardTone::Warning => "text-amber-500 dark:text-amber-400",
            CardTone::Success => "text-green-600 dark:text-green-400",
            CardTone::Accent => "text-violet-600 dark:text-violet-400",
        }
    }
}

/// Renders the four headline numbers for all quotations.
///
/// The cards always count every quotation, not just the ones matching the
/// list filter.
pub(super) fn stat_cards_view(stats: &DashboardStats) -> Markup {
    let cards = [
        ("Total Quotations", stats.total.to_string(), CardTone::Primary),
        ("Pending Quotations", stats.pending.to_string(), CardTone::Warning),
        ("Confirmed", stats.confirmed.to_string(), CardTone::Success),
        (
            "Conversion Rate",
            format!("{}%", stats.conversion_rate),
            CardTone::Accent,
        ),
    ];

    html! {
        section
            id="stat-cards"
            class="w-full grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-8"
        {
            @for (title, value, tone) in cards {
                (stat_card(title, &value, tone))
            }
        }
    }
}

fn stat_card(title: &str, value: &str, tone: CardTone) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-6 shadow-md
                hover:shadow-lg transition-shadow"
            aria-label=(format!("{title}: {value}"))
        {
            p class="text-sm text-gray-600 dark:text-gray-400 mb-1" { (title) }
            p class={"text-3xl font-bold " (tone.value_style())} { (value) }
        }
    }
}
