//! Account page route handlers.
//!
//! The account page is a set of tabs over the mock profile and the locally
//! stored address and phone lists. Every form posts back and redirects to the
//! tab it came from with a `success` or `error` code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use quartermaster_core::{Address, AddressPatch, Page, Phone, PhonePatch};

use crate::filters;
use crate::middleware::Store;
use crate::routes::{LayoutView, encode};
use crate::services::account::{
    self, AccountBook, AccountError, EmailChange, PasswordChange, SECURITY_QUESTIONS,
    SecurityChange,
};

// =============================================================================
// Tabs
// =============================================================================

/// Account page tabs, in display order.
const TABS: &[(&str, &str)] = &[
    ("profile", "Profile"),
    ("addresses", "Addresses"),
    ("phones", "Phone Numbers"),
    ("transactions", "Allotment History"),
    ("orders", "Order History"),
];

fn tab_or_default(tab: Option<&str>) -> &'static str {
    tab.and_then(|tab| TABS.iter().find(|(slug, _)| *slug == tab))
        .map_or("profile", |&(slug, _)| slug)
}

fn redirect_to(tab: &str, outcome: Result<&str, &AccountError>) -> Redirect {
    let query = match outcome {
        Ok(code) => format!("success={}", encode(code)),
        Err(e) => format!("error={}", encode(e.code())),
    };
    Redirect::to(&format!("/account?tab={tab}&{query}"))
}

fn success_message(code: &str) -> Option<&'static str> {
    match code {
        "password_changed" => Some("Password updated"),
        "email_changed" => Some("Email updated"),
        "security_changed" => Some("Security question updated"),
        "address_saved" => Some("Address saved"),
        "address_deleted" => Some("Address deleted"),
        "phone_saved" => Some("Phone number saved"),
        "phone_deleted" => Some("Phone number deleted"),
        _ => None,
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Tab link in the account navigation.
#[derive(Clone)]
pub struct TabLink {
    pub slug: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Security question option.
#[derive(Clone)]
pub struct QuestionOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Allotment ledger row.
#[derive(Clone)]
pub struct TransactionView {
    pub date: &'static str,
    pub description: &'static str,
    pub amount: &'static str,
    pub balance: &'static str,
    pub transaction_id: &'static str,
}

/// Past order row.
#[derive(Clone)]
pub struct OrderView {
    pub order_number: &'static str,
    pub payment: &'static str,
    pub placed_by: &'static str,
    pub date: &'static str,
    pub status: &'static str,
    pub total: &'static str,
}

/// Demo allotment history.
const TRANSACTIONS: &[TransactionView] = &[
    TransactionView {
        date: "02/01/2025",
        description: "Allotment Deposit",
        amount: "$999.99",
        balance: "$999.99",
        transaction_id: "12919833",
    },
    TransactionView {
        date: "03/06/2024",
        description: "Order 26025467",
        amount: "-$72.85",
        balance: "$927.14",
        transaction_id: "10709557",
    },
];

/// Demo order history.
const ORDERS: &[OrderView] = &[
    OrderView {
        order_number: "20134567",
        payment: "ALLOWANCE",
        placed_by: "KRLUSER678",
        date: "03/06/2024",
        status: "Cancelled",
        total: "$72.86",
    },
    OrderView {
        order_number: "20134568",
        payment: "ALLOWANCE",
        placed_by: "KRLUSER678",
        date: "02/11/2022",
        status: "Complete",
        total: "$321.24",
    },
];

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub layout: LayoutView,
    pub tab: &'static str,
    pub tabs: Vec<TabLink>,
    pub username: String,
    pub email: String,
    pub questions: Vec<QuestionOption>,
    pub security_answer: String,
    pub addresses: Vec<Address>,
    pub phones: Vec<Phone>,
    pub transactions: &'static [TransactionView],
    pub orders: &'static [OrderView],
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Account page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct AccountQuery {
    pub tab: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the account page.
#[instrument(skip(store))]
pub async fn index(Store(mut store): Store, Query(query): Query<AccountQuery>) -> impl IntoResponse {
    store.set_current_page(Page::MyAccount);
    let tab = tab_or_default(query.tab.as_deref());

    let book = AccountBook::new(store.local());
    let addresses = book.addresses().await;
    let phones = book.phones().await;

    let profile = store.profile();
    let selected_question = profile
        .and_then(|p| p.security_question.as_deref())
        .unwrap_or_default();

    AccountTemplate {
        tab,
        tabs: TABS
            .iter()
            .map(|&(slug, label)| TabLink {
                slug,
                label,
                active: slug == tab,
            })
            .collect(),
        username: profile.map(|p| p.username.clone()).unwrap_or_default(),
        email: profile.map(|p| p.email.clone()).unwrap_or_default(),
        questions: SECURITY_QUESTIONS
            .iter()
            .map(|&(value, label)| QuestionOption {
                value,
                label,
                selected: value == selected_question,
            })
            .collect(),
        security_answer: profile
            .and_then(|p| p.security_answer.clone())
            .unwrap_or_default(),
        addresses,
        phones,
        transactions: TRANSACTIONS,
        orders: ORDERS,
        error: query.error.as_deref().and_then(AccountError::message_for_code),
        success: query.success.as_deref().and_then(success_message),
        layout: LayoutView::from_store(&store),
    }
}

/// Change the mock password.
#[instrument(skip_all)]
pub async fn change_password(
    Store(mut store): Store,
    Form(form): Form<PasswordChange>,
) -> impl IntoResponse {
    let result = account::change_password(&mut store, &form).await;
    if let Err(e) = &result {
        tracing::info!(code = e.code(), "Password change rejected");
    }
    redirect_to("profile", result.as_ref().map(|_| "password_changed"))
}

/// Change the mock email address.
#[instrument(skip_all)]
pub async fn change_email(
    Store(mut store): Store,
    Form(form): Form<EmailChange>,
) -> impl IntoResponse {
    let result = account::change_email(&mut store, &form).await;
    if let Err(e) = &result {
        tracing::info!(code = e.code(), "Email change rejected");
    }
    redirect_to("profile", result.as_ref().map(|_| "email_changed"))
}

/// Replace the security question and answer.
#[instrument(skip_all)]
pub async fn change_security(
    Store(mut store): Store,
    Form(form): Form<SecurityChange>,
) -> impl IntoResponse {
    let result = account::change_security_question(&mut store, &form).await;
    redirect_to("profile", result.as_ref().map(|_| "security_changed"))
}

/// Add a blank address.
#[instrument(skip(store))]
pub async fn add_address(Store(store): Store) -> impl IntoResponse {
    let result = AccountBook::new(store.local()).add_address().await;
    redirect_to("addresses", result.as_ref().map(|_| "address_saved"))
}

/// Update an address.
#[instrument(skip(store))]
pub async fn update_address(
    Store(store): Store,
    Path(id): Path<i64>,
    Form(patch): Form<AddressPatch>,
) -> impl IntoResponse {
    let result = AccountBook::new(store.local())
        .update_address(id, patch)
        .await;
    redirect_to("addresses", result.as_ref().map(|_| "address_saved"))
}

/// Delete an address.
#[instrument(skip(store))]
pub async fn delete_address(Store(store): Store, Path(id): Path<i64>) -> impl IntoResponse {
    let result = AccountBook::new(store.local()).delete_address(id).await;
    redirect_to("addresses", result.as_ref().map(|_| "address_deleted"))
}

/// Add a blank phone number.
#[instrument(skip(store))]
pub async fn add_phone(Store(store): Store) -> impl IntoResponse {
    let result = AccountBook::new(store.local()).add_phone().await;
    redirect_to("phones", result.as_ref().map(|_| "phone_saved"))
}

/// Update a phone number.
#[instrument(skip(store))]
pub async fn update_phone(
    Store(store): Store,
    Path(id): Path<i64>,
    Form(patch): Form<PhonePatch>,
) -> impl IntoResponse {
    let result = AccountBook::new(store.local()).update_phone(id, patch).await;
    redirect_to("phones", result.as_ref().map(|_| "phone_saved"))
}

/// Delete a phone number.
#[instrument(skip(store))]
pub async fn delete_phone(Store(store): Store, Path(id): Path<i64>) -> impl IntoResponse {
    let result = AccountBook::new(store.local()).delete_phone(id).await;
    redirect_to("phones", result.as_ref().map(|_| "phone_deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_or_default() {
        assert_eq!(tab_or_default(None), "profile");
        assert_eq!(tab_or_default(Some("phones")), "phones");
        assert_eq!(tab_or_default(Some("nope")), "profile");
    }

    #[test]
    fn test_every_success_code_has_a_message() {
        for code in [
            "password_changed",
            "email_changed",
            "security_changed",
            "address_saved",
            "address_deleted",
            "phone_saved",
            "phone_deleted",
        ] {
            assert!(success_message(code).is_some(), "{code}");
        }
    }
}
