//! Finance widgets.

use std::collections::HashMap;

use bizdash_backend::models::{ExpenseAccount, Transaction, TransactionKind};
use bizdash_backend::{list, BackendApi, Collection};
use bizdash_core::currency::format_dashboard_amount;
use bizdash_core::stats::{percentage_change, round_to, sum_by_month, top_n, trailing_months, YearMonth};

use crate::context::WidgetContext;
use crate::data::{CashFlowData, CategoryAmount, RevenueChartData, RevenuePoint};
use crate::error::WidgetError;

/// Category label for expenses without one.
const UNCATEGORIZED: &str = "Autres";

fn amounts_of(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> impl Iterator<Item = (chrono::NaiveDate, f64)> + '_ {
    transactions
        .iter()
        .filter(move |t| t.kind == kind)
        .map(|t| (t.date, t.amount))
}

/// Revenue and expenses per month.
pub async fn revenue_chart(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<RevenueChartData, WidgetError> {
    let transactions: Vec<Transaction> = list(api, Collection::Transactions, &ctx.query()).await?;
    let months = trailing_months(ctx.today, ctx.config.months_or(6));
    let revenue = sum_by_month(&months, amounts_of(&transactions, TransactionKind::Income));
    let expenses = sum_by_month(&months, amounts_of(&transactions, TransactionKind::Expense));

    Ok(RevenueChartData {
        total_revenue: round_to(revenue.iter().sum(), 2),
        total_expenses: round_to(expenses.iter().sum(), 2),
        months: months
            .iter()
            .zip(revenue.iter().zip(expenses.iter()))
            .map(|(m, (revenue, expenses))| RevenuePoint {
                month: m.key(),
                revenue: round_to(*revenue, 2),
                expenses: round_to(*expenses, 2),
            })
            .collect(),
    })
}

/// This month's income, expenses and net, with the largest expense
/// categories. Categories are expense-account codes resolved to names.
pub async fn cash_flow(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<CashFlowData, WidgetError> {
    let q = ctx.query();
    let (transactions, accounts) = futures::try_join!(
        list::<Transaction>(api, Collection::Transactions, &q),
        list::<ExpenseAccount>(api, Collection::ExpenseAccounts, &q),
    )?;

    let this_month = YearMonth::of(ctx.today);
    let last_month = this_month.previous();
    let total = |month: YearMonth, kind: TransactionKind| -> f64 {
        amounts_of(&transactions, kind)
            .filter(|(date, _)| month.contains(*date))
            .map(|(_, amount)| amount)
            .sum()
    };

    let income = total(this_month, TransactionKind::Income);
    let expenses = total(this_month, TransactionKind::Expense);
    let net = income - expenses;
    let previous_net =
        total(last_month, TransactionKind::Income) - total(last_month, TransactionKind::Expense);

    let names: HashMap<&str, &str> = accounts
        .iter()
        .map(|a| (a.code.as_str(), a.name.as_str()))
        .collect();
    let categorized = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense && this_month.contains(t.date))
        .map(|t| {
            let label = match t.category.as_deref() {
                Some(code) => names.get(code).copied().unwrap_or(code),
                None => UNCATEGORIZED,
            };
            (label.to_string(), t.amount)
        });
    let top_expenses = top_n(categorized, ctx.config.limit_or(5))
        .into_iter()
        .map(|(category, amount)| CategoryAmount {
            category,
            amount: round_to(amount, 2),
        })
        .collect();

    Ok(CashFlowData {
        income,
        expenses,
        net,
        income_formatted: format_dashboard_amount(income),
        expenses_formatted: format_dashboard_amount(expenses),
        net_formatted: format_dashboard_amount(net),
        change: round_to(percentage_change(net, previous_net), 1),
        top_expenses,
    })
}
