//! Mock sign-in route handlers.
//!
//! Credentials are checked against the profile stored for this browser.
//! Password reset and account requests only show a confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use quartermaster_core::Page;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::Store;
use crate::routes::{LayoutView, MessageQuery};
use crate::services::forms::{AccountRequest, PasswordReset};

/// Shown after a rejected sign-in.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// Shown after a password reset request.
pub const RESET_SENT: &str = "Password reset email sent.";

/// Shown after an account request.
pub const REQUEST_SUBMITTED: &str = "Request submitted. You'll receive an email within 24 hours.";

// =============================================================================
// Sign in
// =============================================================================

/// Sign-in form data.
#[derive(Deserialize)]
pub struct SigninForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signin.html")]
pub struct SigninTemplate {
    pub layout: LayoutView,
    pub error: Option<&'static str>,
    pub demo_username: &'static str,
    pub demo_password: &'static str,
}

/// Display the sign-in page.
#[instrument(skip(store))]
pub async fn signin_page(Store(mut store): Store, Query(query): Query<MessageQuery>) -> impl IntoResponse {
    store.set_current_page(Page::Signin);

    let error = match query.error.as_deref() {
        Some("credentials") => Some(INVALID_CREDENTIALS),
        _ => None,
    };

    SigninTemplate {
        layout: LayoutView::from_store(&store),
        error,
        demo_username: quartermaster_core::Profile::DEMO_USERNAME,
        demo_password: quartermaster_core::Profile::DEMO_PASSWORD,
    }
}

/// Check credentials and sign in.
#[instrument(skip_all)]
pub async fn signin(Store(mut store): Store, Form(form): Form<SigninForm>) -> Response {
    let username = form.username.trim();

    if store.login(username, &form.password).await {
        set_sentry_user(username);
        store.set_current_page(Page::Home);
        Redirect::to("/").into_response()
    } else {
        Redirect::to("/signin?error=credentials").into_response()
    }
}

/// Sign out and go home.
#[instrument(skip(store))]
pub async fn logout(Store(mut store): Store) -> impl IntoResponse {
    store.logout().await;
    clear_sentry_user();
    Redirect::to("/")
}

// =============================================================================
// Forgot password
// =============================================================================

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub layout: LayoutView,
    pub username: String,
    pub error: Option<String>,
    pub sent: Option<&'static str>,
}

/// Display the forgot password page.
#[instrument(skip(store))]
pub async fn forgot_password_page(Store(mut store): Store) -> impl IntoResponse {
    store.set_current_page(Page::ForgotPassword);
    ForgotPasswordTemplate {
        layout: LayoutView::from_store(&store),
        username: String::new(),
        error: None,
        sent: None,
    }
}

/// Pretend to send a reset email.
#[instrument(skip_all)]
pub async fn forgot_password(Store(mut store): Store, Form(form): Form<PasswordReset>) -> Response {
    store.set_current_page(Page::ForgotPassword);
    let layout = LayoutView::from_store(&store);

    match form.validate() {
        Ok(()) => ForgotPasswordTemplate {
            layout,
            username: form.username,
            error: None,
            sent: Some(RESET_SENT),
        }
        .into_response(),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ForgotPasswordTemplate {
                layout,
                username: form.username,
                error: Some(e.to_string()),
                sent: None,
            },
        )
            .into_response(),
    }
}

// =============================================================================
// Request account
// =============================================================================

/// Request account page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/request_account.html")]
pub struct RequestAccountTemplate {
    pub layout: LayoutView,
    pub form: AccountRequest,
    pub error: Option<String>,
    pub submitted: Option<&'static str>,
}

/// Display the request account page.
#[instrument(skip(store))]
pub async fn request_account_page(Store(mut store): Store) -> impl IntoResponse {
    store.set_current_page(Page::RequestAccount);
    RequestAccountTemplate {
        layout: LayoutView::from_store(&store),
        form: AccountRequest::default(),
        error: None,
        submitted: None,
    }
}

/// Accept an account request.
#[instrument(skip_all)]
pub async fn request_account(Store(mut store): Store, Form(form): Form<AccountRequest>) -> Response {
    store.set_current_page(Page::RequestAccount);
    let layout = LayoutView::from_store(&store);

    match form.validate() {
        Ok(()) => {
            tracing::info!("Account request received");
            RequestAccountTemplate {
                layout,
                form,
                error: None,
                submitted: Some(REQUEST_SUBMITTED),
            }
            .into_response()
        }
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            RequestAccountTemplate {
                layout,
                form,
                error: Some(e.to_string()),
                submitted: None,
            },
        )
            .into_response(),
    }
}
