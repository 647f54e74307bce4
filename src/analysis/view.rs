//! Renders the analysis section: the period selector, the chart, the totals
//! and the optional itemized lists.

use maud::{Markup, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    analysis::{
        aggregation::Summary,
        chart::AnalysisChart,
        period::Period,
        view_state::AnalysisView,
    },
    endpoints,
    html::format_currency,
    record::FinancialRecord,
    theme::{Palette, Theme},
};

/// The element ID HTMX targets when the section is swapped.
pub const ANALYSIS_SECTION_ID: &str = "analysis";

pub(super) const NO_INCOME_MESSAGE: &str = "No income in this period.";
pub(super) const NO_EXPENSES_MESSAGE: &str = "No expenses in this period.";
pub(super) const NO_DATA_MESSAGE: &str = "Nothing recorded in this period yet.";
pub(super) const NO_SHARES_MESSAGE: &str =
    "Income and expense shares cannot be shown for these amounts.";

/// Day/month/year without padding, e.g. "8/3/2024".
const LIST_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:none]/[month padding:none]/[year]");

const ACTIVE_BUTTON_CLASS: &str = "bg-indigo-500 text-white";

/// Everything the analysis section needs besides the summary itself.
pub(super) struct AnalysisContext {
    pub view: AnalysisView,
    pub theme: Theme,
    /// How many records were left out because they could not be read.
    pub skipped_records: usize,
}

/// The whole analysis section, used both inside the dashboard page and as
/// the fragment returned to HTMX.
pub(super) fn analysis_view(summary: &Summary<'_>, context: &AnalysisContext) -> Markup {
    let view = context.view;
    let palette = context.theme.palette();
    let details_label = if view.details.is_expanded() {
        "Hide details"
    } else {
        "Show details"
    };

    html!(
        section
            id=(ANALYSIS_SECTION_ID)
            class={ "w-full max-w-4xl mt-8 p-6 rounded-lg shadow " (palette.panel_class) }
        {
            h2 class="text-2xl font-bold mb-4 text-center" { "Financial analysis" }

            (period_selector(view, palette))

            @if context.skipped_records > 0 {
                p
                    role="status"
                    class="mb-4 text-center text-sm text-amber-700 dark:text-amber-400"
                {
                    (skipped_records_message(context.skipped_records))
                }
            }

            (AnalysisChart::new(summary, context.theme).into_html())

            p id="analysis-shares" class="text-center text-sm opacity-80"
            {
                @match summary.shares() {
                    Some((income_share, expense_share)) => {
                        "Income " (income_share.to_string()) "% · Expenses " (expense_share.to_string()) "%"
                    }
                    None if summary.is_empty() => { (NO_DATA_MESSAGE) }
                    None => { (NO_SHARES_MESSAGE) }
                }
            }

            p id="analysis-totals" class="text-center mt-4 font-semibold"
            {
                "Total income: " (format_currency(summary.total_income))
                br;
                "Total expenses: " (format_currency(summary.total_expenses))
            }

            div class="w-full flex justify-center mt-6"
            {
                button
                    type="button"
                    id="details-toggle"
                    hx-get=(view.with_details_toggled().url(endpoints::ANALYSIS_API))
                    hx-push-url=(view.with_details_toggled().url(endpoints::DASHBOARD_VIEW))
                    hx-target={ "#" (ANALYSIS_SECTION_ID) }
                    hx-target-error="#alert-container"
                    hx-swap="outerHTML"
                    aria-expanded=(view.details.is_expanded().to_string())
                    class="px-4 py-2 rounded-lg font-semibold bg-indigo-600 text-white hover:bg-indigo-700"
                {
                    (details_label)
                }
            }

            @if view.details.is_expanded() {
                div id="analysis-details" class="mt-6 w-full px-4"
                {
                    h3 class={ "text-lg font-bold mb-2 " (palette.income_heading_class) } { "Income" }

                    (record_list(
                        "income-list",
                        &summary.filtered_income,
                        "Origin",
                        NO_INCOME_MESSAGE,
                        palette,
                    ))

                    h3 class={ "text-lg font-bold mt-6 mb-2 " (palette.expense_heading_class) } { "Expenses" }

                    (record_list(
                        "expense-list",
                        &summary.filtered_expenses,
                        "Description",
                        NO_EXPENSES_MESSAGE,
                        palette,
                    ))
                }
            }
        }
    )
}

fn period_selector(view: AnalysisView, palette: &Palette) -> Markup {
    html!(
        div class="flex justify-center gap-4 mb-6" role="group" aria-label="Period"
        {
            @for period in Period::ALL {
                @let is_selected = period == view.period;
                @let target_view = view.with_period(period);

                button
                    type="button"
                    hx-get=(target_view.url(endpoints::ANALYSIS_API))
                    hx-push-url=(target_view.url(endpoints::DASHBOARD_VIEW))
                    hx-target={ "#" (ANALYSIS_SECTION_ID) }
                    hx-target-error="#alert-container"
                    hx-swap="outerHTML"
                    aria-pressed=(is_selected.to_string())
                    title=(period.description())
                    class={
                        "px-4 py-2 rounded-lg font-semibold transition "
                        (if is_selected { ACTIVE_BUTTON_CLASS } else { palette.inactive_button_class })
                    }
                {
                    (period.label())
                }
            }
        }
    )
}

fn record_list<R: FinancialRecord>(
    id: &str,
    records: &[&R],
    label_title: &str,
    empty_message: &str,
    palette: &Palette,
) -> Markup {
    html!(
        @if records.is_empty() {
            p id=(id) { (empty_message) }
        } @else {
            ul id=(id) class="space-y-2"
            {
                @for record in records {
                    li class={ "p-3 rounded-lg shadow " (palette.list_item_class) }
                    {
                        p { strong { "Amount: " } (format_currency(record.amount())) }
                        p { strong { "Date: " } (format_list_date(record.date())) }
                        p { strong { (label_title) ": " } (record.label()) }
                    }
                }
            }
        }
    )
}

fn format_list_date(date: Date) -> String {
    date.format(LIST_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

fn skipped_records_message(count: usize) -> String {
    match count {
        1 => "1 record could not be read and was left out of the totals.".to_owned(),
        count => format!("{count} records could not be read and were left out of the totals."),
    }
}
