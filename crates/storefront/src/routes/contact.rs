//! Contact form route handler.

use axum::{Json, extract::State};
use tracing::instrument;

use flower_shop_core::{ContactReceipt, ContactRequest};

use crate::error::{Result, add_breadcrumb};
use crate::routes::extract::ApiJson;
use crate::state::AppState;

/// Submit a contact message to the shop.
///
/// POST /api/contact
///
/// Responds `{"status": "sent"}` after SMTP delivery, or `{"status": "queued"}`
/// when delivery is disabled. SMTP failures surface as 502 so the caller can
/// offer a retry.
#[instrument(skip(state, body))]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactRequest>,
) -> Result<Json<ContactReceipt>> {
    let contact = body.validate()?;

    add_breadcrumb(
        "contact",
        "Contact form submitted",
        &[("email_domain", contact.email.domain().to_string())],
    );

    let status = state.mailer().send_contact(&contact).await?;
    Ok(Json(ContactReceipt { status }))
}
