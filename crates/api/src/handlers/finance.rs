//! Handlers for finance views outside the widget grid.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bizdash_backend::models::BankAccount;
use bizdash_backend::{Collection, ListQuery};
use bizdash_core::currency::format_balance;
use bizdash_core::types::RecordId;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// A bank account with its balance formatted for display.
#[derive(Debug, Serialize)]
pub struct BankAccountView {
    pub id: RecordId,
    pub name: String,
    pub institution: Option<String>,
    pub balance: f64,
    pub formatted_balance: String,
}

#[derive(Debug, Serialize)]
pub struct BankAccountsView {
    pub accounts: Vec<BankAccountView>,
    pub total: f64,
    pub formatted_total: String,
}

/// GET /api/v1/finance/bank-accounts
///
/// Unlike widgets there is no fallback: a backend failure is a 502.
pub async fn bank_accounts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let accounts: Vec<BankAccount> =
        bizdash_backend::list(state.backend.as_ref(), Collection::BankAccounts, &ListQuery::new())
            .await?;

    let total: f64 = accounts.iter().map(|a| a.balance).sum();
    let accounts: Vec<BankAccountView> = accounts
        .into_iter()
        .map(|a| BankAccountView {
            formatted_balance: format_balance(a.balance),
            id: a.id,
            name: a.name,
            institution: a.institution,
            balance: a.balance,
        })
        .collect();

    Ok(Json(DataResponse {
        data: BankAccountsView {
            accounts,
            total,
            formatted_total: format_balance(total),
        },
    }))
}
