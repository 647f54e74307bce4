//! Reduces period-filtered records to the totals shown in the analysis.

use rust_decimal::Decimal;
use time::Date;

use crate::{
    analysis::period::{Period, filter_by_period},
    record::{ExpenseRecord, FinancialRecord, IncomeRecord},
};

/// The records inside the active period and their totals.
///
/// `total_income` and `total_expenses` are always the exact sums of
/// `filtered_income` and `filtered_expenses`.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary<'a> {
    pub period: Period,
    pub filtered_income: Vec<&'a IncomeRecord>,
    pub filtered_expenses: Vec<&'a ExpenseRecord>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
}

impl Summary<'_> {
    /// The share of income and expenses in the combined total, as percentages.
    ///
    /// Returns `None` when there is no meaningful split: both totals are
    /// zero, a share falls outside 0 to 100 because of negative amounts, or
    /// the amounts are too large to divide.
    pub fn shares(&self) -> Option<(Decimal, Decimal)> {
        let combined = self.total_income.checked_add(self.total_expenses)?;

        if combined.is_zero() {
            return None;
        }

        let share = |total: Decimal| -> Option<Decimal> {
            let share = total
                .checked_div(combined)?
                .checked_mul(Decimal::ONE_HUNDRED)?
                .round_dp(2);

            (Decimal::ZERO..=Decimal::ONE_HUNDRED)
                .contains(&share)
                .then_some(share)
        };

        Some((share(self.total_income)?, share(self.total_expenses)?))
    }

    /// Whether the period has no records at all.
    pub fn is_empty(&self) -> bool {
        self.filtered_income.is_empty() && self.filtered_expenses.is_empty()
    }
}

/// Sum the amounts of `records`, starting from zero.
///
/// Amounts are added as exact decimals, so the order of `records` does not
/// change the result. A total beyond the range of [Decimal] stays at the
/// largest (or smallest) representable value.
pub fn total_amount<'a, R>(records: impl IntoIterator<Item = &'a R>) -> Decimal
where
    R: FinancialRecord + 'a,
{
    records
        .into_iter()
        .map(|record| record.amount())
        .fold(Decimal::ZERO, |total, amount| total.saturating_add(amount))
}

/// Filter both collections to `period` as seen from `today` and total them.
///
/// The input slices are only borrowed; the summary refers back into them.
pub fn summarize<'a>(
    expenses: &'a [ExpenseRecord],
    income: &'a [IncomeRecord],
    period: Period,
    today: Date,
) -> Summary<'a> {
    let filtered_income = filter_by_period(income, period, today);
    let filtered_expenses = filter_by_period(expenses, period, today);

    Summary {
        period,
        total_income: total_amount(filtered_income.iter().copied()),
        total_expenses: total_amount(filtered_expenses.iter().copied()),
        filtered_income,
        filtered_expenses,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::{Date, macros::date};

    use crate::{
        analysis::period::Period,
        record::{ExpenseRecord, IncomeRecord},
    };

    use super::{summarize, total_amount};

    const TODAY: Date = date!(2024 - 03 - 15);

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    fn expense(amount: &str, date: Date) -> ExpenseRecord {
        ExpenseRecord {
            amount: dec(amount),
            date,
            description: format!("expense of {amount}"),
            category: None,
        }
    }

    fn income(amount: &str, date: Date) -> IncomeRecord {
        IncomeRecord {
            amount: dec(amount),
            date,
            origin: format!("income of {amount}"),
        }
    }

    #[test]
    fn total_of_nothing_is_zero() {
        let records: Vec<IncomeRecord> = Vec::new();

        assert_eq!(total_amount(&records), Decimal::ZERO);
    }

    #[test]
    fn total_keeps_full_precision() {
        let records = vec![
            income("0.1", TODAY),
            income("0.2", TODAY),
            income("0.005", TODAY),
        ];

        assert_eq!(total_amount(&records), dec("0.305"));
    }

    #[test]
    fn total_does_not_depend_on_order() {
        let mut records = vec![
            expense("0.1", TODAY),
            expense("1234567.89", TODAY),
            expense("0.2", TODAY),
            expense("19.99", TODAY),
        ];
        let want = total_amount(&records);

        records.reverse();
        assert_eq!(total_amount(&records), want);

        records.swap(0, 2);
        assert_eq!(total_amount(&records), want);
        assert_eq!(want, dec("1234588.18"));
    }

    #[test]
    fn summary_totals_match_filtered_records() {
        let expenses = vec![
            expense("40", TODAY),
            expense("15.25", date!(2024 - 03 - 10)),
            expense("99", date!(2024 - 02 - 20)),
        ];
        let income = vec![
            income("100", TODAY),
            income("500", date!(2024 - 03 - 01)),
        ];

        let weekly = summarize(&expenses, &income, Period::Weekly, TODAY);
        assert_eq!(weekly.filtered_income, vec![&income[0]]);
        assert_eq!(weekly.filtered_expenses, vec![&expenses[0], &expenses[1]]);
        assert_eq!(weekly.total_income, dec("100"));
        assert_eq!(weekly.total_expenses, dec("55.25"));

        let monthly = summarize(&expenses, &income, Period::Monthly, TODAY);
        assert_eq!(monthly.total_income, dec("600"));
        assert_eq!(monthly.total_expenses, dec("55.25"));
        assert_eq!(
            monthly.total_income,
            total_amount(monthly.filtered_income.iter().copied())
        );
    }

    #[test]
    fn same_day_income_and_expense_scenario() {
        let expenses = vec![expense("40", TODAY)];
        let income = vec![income("100", TODAY)];

        let summary = summarize(&expenses, &income, Period::Monthly, TODAY);

        assert_eq!(summary.total_income, dec("100"));
        assert_eq!(summary.total_expenses, dec("40"));
        assert_eq!(summary.shares(), Some((dec("71.43"), dec("28.57"))));
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let records = vec![income("79228162514264337593543950335", TODAY), income("1", TODAY)];

        assert_eq!(total_amount(&records), Decimal::MAX);
    }

    #[test]
    fn huge_totals_have_no_shares() {
        let expenses = vec![expense("79228162514264337593543950335", TODAY)];
        let income = vec![income("79228162514264337593543950335", TODAY)];

        let summary = summarize(&expenses, &income, Period::Monthly, TODAY);

        assert_eq!(summary.shares(), None);
    }

    #[test]
    fn tiny_combined_total_has_no_shares() {
        let expenses = vec![expense("-0.9999999999999999999999999999", TODAY)];
        let income = vec![income("1", TODAY)];

        let summary = summarize(&expenses, &income, Period::Monthly, TODAY);

        assert_eq!(summary.shares(), None);
    }

    #[test]
    fn negative_totals_have_no_shares() {
        let expenses = vec![expense("-400", TODAY)];
        let income = vec![income("500", TODAY)];

        let summary = summarize(&expenses, &income, Period::Monthly, TODAY);

        assert_eq!(summary.total_expenses, dec("-400"));
        assert_eq!(summary.shares(), None);
        assert!(!summary.is_empty());
    }

    #[test]
    fn one_sided_total_has_full_share() {
        let income = vec![income("25", TODAY)];

        let summary = summarize(&[], &income, Period::Monthly, TODAY);

        assert_eq!(summary.shares(), Some((dec("100"), dec("0"))));
    }

    #[test]
    fn empty_collections_give_zero_totals_and_no_shares() {
        let summary = summarize(&[], &[], Period::Monthly, TODAY);

        assert_eq!(summary.total_income, Decimal::ZERO);
        assert_eq!(summary.total_expenses, Decimal::ZERO);
        assert!(summary.filtered_income.is_empty());
        assert!(summary.filtered_expenses.is_empty());
        assert_eq!(summary.shares(), None);
        assert!(summary.is_empty());
    }

    #[test]
    fn changing_period_leaves_inputs_untouched() {
        let expenses = vec![
            expense("40", TODAY),
            expense("10", date!(2024 - 03 - 02)),
        ];
        let income = vec![income("100", date!(2024 - 03 - 01))];
        let expenses_before = expenses.clone();
        let income_before = income.clone();

        let monthly = summarize(&expenses, &income, Period::Monthly, TODAY);
        let monthly_totals = (monthly.total_income, monthly.total_expenses);
        let weekly = summarize(&expenses, &income, Period::Weekly, TODAY);

        assert_eq!(monthly_totals, (dec("100"), dec("50")));
        assert_eq!(weekly.total_income, Decimal::ZERO);
        assert_eq!(weekly.total_expenses, dec("40"));
        assert_eq!(expenses, expenses_before);
        assert_eq!(income, income_before);
    }

    #[test]
    fn summarize_is_idempotent() {
        let expenses = vec![
            expense("3.50", TODAY),
            expense("1", date!(2024 - 03 - 09)),
        ];
        let income = vec![income("20", date!(2024 - 03 - 12))];

        let first = summarize(&expenses, &income, Period::Weekly, TODAY);
        let second = summarize(&expenses, &income, Period::Weekly, TODAY);

        assert_eq!(first, second);
    }
}
