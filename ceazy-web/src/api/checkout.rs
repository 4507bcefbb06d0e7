//! Purchase intent endpoints
//!
//! Two flows coexist: a simulated purchase acknowledgment and a
//! processor-backed checkout session. Both validate that the album
//! exists and is released before doing anything else.

use axum::extract::{Path, State};
use axum::http::header::ORIGIN;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use ceazy_common::Album;

use crate::api::albums::parse_album_id;
use crate::error::{ApiError, ApiResult};
use crate::payment::CheckoutRequest;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub success: bool,
    pub message: String,
    pub download_url: String,
}

/// POST /api/purchase/:id
///
/// Simulated purchase: validates purchasability and acknowledges without
/// collecting payment. No order record is persisted.
pub async fn purchase_album(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<PurchaseResponse>> {
    let id = parse_album_id(&raw_id)?;
    let album = released_album(&state, id).await?;

    Ok(Json(PurchaseResponse {
        success: true,
        message: "Purchase successful".to_string(),
        download_url: format!("/download/{}", album.id),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    pub album_id: i64,
}

/// Denormalized album fields echoed back for client display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub id: i64,
    pub title: String,
    pub price: Option<String>,
    pub cover_image: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub session_id: String,
    pub url: Option<String>,
    pub album: AlbumSummary,
}

/// POST /api/create-payment-intent
///
/// Asks the payment processor for a hosted checkout session covering the
/// album price. The client then completes payment against the processor
/// directly and is redirected back to the site.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> ApiResult<Json<PaymentIntentResponse>> {
    let album = released_album(&state, request.album_id).await?;

    // A released album without a usable price is a seed-data defect
    let amount_minor = album.price_in_minor_units().ok_or_else(|| {
        ApiError::Internal(format!("album {} is released but has no usable price", album.id))
    })?;

    let origin = request_origin(&headers, &state);
    let session = state
        .checkout
        .create_session(CheckoutRequest {
            amount_minor,
            currency: state.config.currency.clone(),
            product_name: album.title.clone(),
            description: format!("Digital download of {} by CEAZY", album.title),
            success_url: format!("{origin}/?success=true&album={}", album.id),
            cancel_url: format!("{origin}/?canceled=true"),
            album_id: album.id,
        })
        .await?;

    Ok(Json(PaymentIntentResponse {
        session_id: session.id,
        url: session.url,
        album: AlbumSummary {
            id: album.id,
            title: album.title,
            price: album.price,
            cover_image: album.cover_image,
        },
    }))
}

/// Look up an album and check it is purchasable
async fn released_album(state: &AppState, id: i64) -> Result<Album, ApiError> {
    let album = state.store.album(id).await?.ok_or(ApiError::NotFound)?;
    if !album.is_released {
        return Err(ApiError::NotReleased);
    }
    Ok(album)
}

/// Redirect targets are built on the caller's origin when it sends one,
/// falling back to the configured public origin.
fn request_origin(headers: &HeaderMap, state: &AppState) -> String {
    headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| state.config.public_origin.clone())
}
