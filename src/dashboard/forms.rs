//! The expense and income forms shown above the analysis.

use maud::{Markup, html};

use crate::{
    backend::Category,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        loading_spinner,
    },
};

fn amount_input(id: &str) -> Markup {
    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { "Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id=(id)
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

fn submit_button(text: &str) -> Markup {
    html! {
        button type="submit" class=(BUTTON_PRIMARY_STYLE)
        {
            span class="htmx-indicator" { (loading_spinner()) }
            (text)
        }
    }
}

pub(super) fn expense_form(categories: &[Category]) -> Markup {
    html! {
        section id="expense-card" class=(CARD_STYLE)
        {
            h2 class="mb-4 text-lg font-semibold" { "Add expense" }

            form
                id="expense-form"
                hx-post=(endpoints::EXPENSES_API)
                hx-target-error="#alert-container"
                hx-disabled-elt="find button"
                class="space-y-4"
            {
                div
                {
                    label for="expense-description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        name="description"
                        id="expense-description"
                        type="text"
                        placeholder="Groceries"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (amount_input("expense-amount"))

                div
                {
                    label for="expense-category" class=(FORM_LABEL_STYLE) { "Category" }

                    select
                        name="category"
                        id="expense-category"
                        required
                        disabled[categories.is_empty()]
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @if categories.is_empty() {
                            option value="" { "No categories available" }
                        } @else {
                            option value="" disabled selected { "Choose a category" }
                        }

                        @for category in categories {
                            option value=(category.id) { (category.name) }
                        }
                    }
                }

                (submit_button("Add expense"))
            }
        }
    }
}

pub(super) fn income_form() -> Markup {
    html! {
        section id="income-card" class=(CARD_STYLE)
        {
            h2 class="mb-4 text-lg font-semibold" { "Add income" }

            form
                id="income-form"
                hx-post=(endpoints::INCOME_API)
                hx-target-error="#alert-container"
                hx-disabled-elt="find button"
                class="space-y-4"
            {
                (amount_input("income-amount"))

                div
                {
                    label for="income-origin" class=(FORM_LABEL_STYLE) { "Origin" }

                    input
                        name="origin"
                        id="income-origin"
                        type="text"
                        placeholder="Salary"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (submit_button("Add income"))
            }
        }
    }
}
