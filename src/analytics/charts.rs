//! Chart generation and rendering for the analytics page.
//!
//! This module creates ECharts visualizations of quotation counts:
//! - **Status Distribution**: pie chart of quotations per status
//! - **Source Distribution**: bar chart of quotations per source
//! - **Monthly Trend**: bar chart of quotations per calendar month
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisType, Color, ItemStyle, Tooltip, Trigger},
    series::{Pie, bar::Bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{aggregation::GroupCount, html::HeadElement};

/// The palette the status pie cycles through.
const SLICE_COLOURS: [&str; 5] = ["#3b82f6", "#22c55e", "#f59e0b", "#ef4444", "#8b5cf6"];
const SOURCE_BAR_COLOUR: &str = "#3b82f6";
const MONTHLY_BAR_COLOUR: &str = "#22c55e";

/// An analytics chart with its HTML container ID and ECharts configuration.
pub(super) struct AnalyticsChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for the charts.
pub(super) fn charts_view(charts: &[AnalyticsChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 lg:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for the charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[AnalyticsChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

pub(super) fn status_chart(status_counts: &[GroupCount]) -> Chart {
    let data = status_counts
        .iter()
        .map(|group| (group.count as i64, group.label.clone()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Status Distribution"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .color(SLICE_COLOURS.iter().map(|&colour| Color::from(colour)).collect())
        .series(
            Pie::new()
                .name("Quotations")
                .radius("60%")
                .center(vec!["50%", "50%"])
                .data(data),
        )
}

pub(super) fn source_chart(source_counts: &[GroupCount]) -> Chart {
    count_bar_chart("Source Distribution", "Quotations", SOURCE_BAR_COLOUR, source_counts)
}

pub(super) fn monthly_trend_chart(month_counts: &[GroupCount]) -> Chart {
    count_bar_chart("Monthly Trend", "Quotations", MONTHLY_BAR_COLOUR, month_counts)
        .legend(Legend::new().top("bottom"))
}

fn count_bar_chart(title: &str, series_name: &str, colour: &str, counts: &[GroupCount]) -> Chart {
    let (labels, values): (Vec<String>, Vec<i64>) = counts
        .iter()
        .map(|group| (group.label.clone(), group.count as i64))
        .unzip();

    Chart::new()
        .title(Title::new().text(title))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("10%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            Bar::new()
                .name(series_name)
                .item_style(ItemStyle::new().color(colour))
                .data(values),
        )
}
