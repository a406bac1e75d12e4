use axum::{extract::Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::RequestContext;
use crate::database::models::PaymentRecord;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::mailer::mailer;
use crate::services::payments::PaymentClient;

/// GET /api/payments - the member's payment history in the current season
pub async fn list(Extension(ctx): Extension<RequestContext>) -> ApiResult<Vec<PaymentRecord>> {
    let pool = DatabaseManager::pool().await?;

    let payments = sqlx::query_as::<_, PaymentRecord>(
        r#"
        SELECT id, user_id, season_id, amount, status, intent_id, created_at, updated_at
        FROM payments
        WHERE user_id = $1 AND season_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(ctx.user.user_id)
    .bind(ctx.season.id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(payments))
}

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub amount: Decimal,
}

/// POST /api/payments/intent - start a payment at the processor
///
/// The intent is created at the processor first, then mirrored into the
/// local ledger; the client secret goes back to the browser to complete
/// the charge.
pub async fn create_intent(
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<CreateIntentRequest>,
) -> ApiResult<Value> {
    if payload.amount <= Decimal::ZERO {
        return Err(ApiError::bad_request("Amount must be positive"));
    }

    let intent = PaymentClient::from_config()
        .create_intent(ctx.user.user_id, ctx.season.id, payload.amount)
        .await?;

    let pool = DatabaseManager::pool().await?;
    let record = sqlx::query_as::<_, PaymentRecord>(
        r#"
        INSERT INTO payments (id, user_id, season_id, amount, status, intent_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, season_id, amount, status, intent_id, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(ctx.user.user_id)
    .bind(ctx.season.id)
    .bind(payload.amount)
    .bind(&intent.status)
    .bind(&intent.intent_id)
    .fetch_one(pool)
    .await?;

    // A failed notification does not void the recorded intent.
    if let Err(e) = mailer()
        .enqueue(
            "payment_initiated",
            ctx.user.user_id,
            json!({ "amount": payload.amount, "season": ctx.season.year }),
        )
        .await
    {
        tracing::error!("payment notification failed: {}", e);
    }

    Ok(ApiResponse::created(json!({
        "payment": record,
        "client_secret": intent.client_secret,
    })))
}
