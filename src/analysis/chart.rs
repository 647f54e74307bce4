//! The income versus expenses pie chart.
//!
//! The chart is generated as JSON options for ECharts and initialised by a
//! small inline script, so it is rebuilt every time HTMX swaps the analysis
//! section.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Color, JsFunction, TextStyle, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{analysis::aggregation::Summary, theme::Theme};

/// The HTML element ID of the chart container.
pub(super) const CHART_ID: &str = "income-expense-chart";

/// Slice colour for income.
pub(super) const INCOME_COLOR: &str = "#4ade80";
/// Slice colour for expenses.
pub(super) const EXPENSE_COLOR: &str = "#f87171";

/// The chart's container ID paired with its ECharts configuration.
pub(super) struct AnalysisChart {
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
    pub echarts_theme: &'static str,
}

impl AnalysisChart {
    pub(super) fn new(summary: &Summary<'_>, theme: Theme) -> Self {
        Self {
            id: CHART_ID,
            options: income_expense_chart(summary, theme).to_string(),
            echarts_theme: theme.palette().echarts_theme,
        }
    }

    /// The chart container followed by the script that draws into it.
    pub(super) fn into_html(self) -> Markup {
        let script = format!(
            r#"(function() {{
                const chartDom = document.getElementById("{id}");
                const previous = echarts.getInstanceByDom(chartDom);
                if (previous) {{
                    previous.dispose();
                }}
                const chart = echarts.init(chartDom, "{theme}");
                chart.setOption({options});
                new ResizeObserver(() => chart.resize()).observe(chartDom);
            }})();"#,
            id = self.id,
            theme = self.echarts_theme,
            options = self.options,
        );

        html!(
            div id=(self.id) class="w-full min-h-[320px]" {}
            script { (PreEscaped(script)) }
        )
    }
}

/// Two slices, income then expenses, sized by the period totals.
///
/// Both slices are always present, even when their totals are zero.
pub(super) fn income_expense_chart(summary: &Summary<'_>, theme: Theme) -> Chart {
    let palette = theme.palette();

    Chart::new()
        .title(
            Title::new()
                .text("Income vs. expenses")
                .subtext(summary.period.description())
                .left("center")
                .text_style(TextStyle::new().color(palette.chart_text)),
        )
        .color(vec![Color::from(INCOME_COLOR), Color::from(EXPENSE_COLOR)])
        .background_color("transparent")
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter())
                .background_color(palette.tooltip_background)
                .border_color(palette.tooltip_border),
        )
        .legend(
            Legend::new()
                .bottom("0%")
                .left("center")
                .text_style(TextStyle::new().color(palette.chart_text)),
        )
        .series(
            Pie::new()
                .name("Totals")
                .radius(vec!["40%", "65%"])
                .data(vec![
                    (to_chart_value(summary.total_income), "Income"),
                    (to_chart_value(summary.total_expenses), "Expenses"),
                ]),
        )
}

fn to_chart_value(amount: Decimal) -> f64 {
    amount.round_dp(2).to_f64().unwrap_or_default()
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return currencyFormatter.format(number || 0);",
    )
}
