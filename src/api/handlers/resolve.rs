//! Handlers for on-demand browser resolution. Results are not persisted.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::resolve::{
    InteractiveRequest, InteractiveResponse, MerchantResolvedUrl, ResolveBatchRequest,
    ResolveUrlRequest, ResolvedUrl,
};
use crate::error::AppError;
use crate::state::AppState;

/// Opens one URL in the browser and reports where it ended up.
///
/// # Endpoint
///
/// `POST /resolve_url`
///
/// # Request Body
///
/// ```json
/// { "url": "https://bit.ly/abc", "wait_seconds": 8, "click_texts": ["Enter"] }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "start_url": "https://bit.ly/abc",
///   "final_url": "https://stake.com/",
///   "redirects": ["https://bit.ly/abc", "https://stake.com/"],
///   "ok": true,
///   "error": null
/// }
/// ```
///
/// A failed navigation still answers 200, with `ok: false` and the start URL
/// as `final_url`.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is not HTTP(S).
pub async fn resolve_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResolveUrlRequest>,
) -> Result<Json<ResolvedUrl>, AppError> {
    payload.validate()?;

    let service = &state.interactive_service;
    let options = service
        .defaults()
        .merged(payload.wait_seconds, payload.click_texts);

    let resolution = service.resolve_url(payload.url.trim(), &options).await;

    Ok(Json(resolution.into()))
}

/// Resolves a list of URLs for one merchant, in order.
///
/// # Endpoint
///
/// `POST /resolve_url_batch`
///
/// # Errors
///
/// Returns 400 Bad Request if the merchant is empty or any URL is invalid.
pub async fn resolve_url_batch_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResolveBatchRequest>,
) -> Result<Json<Vec<MerchantResolvedUrl>>, AppError> {
    payload.validate()?;

    let service = &state.interactive_service;
    let options = service
        .defaults()
        .merged(payload.wait_seconds, payload.click_texts);
    let urls: Vec<String> = payload.urls.iter().map(|u| u.trim().to_string()).collect();

    let items = service
        .resolve_batch(payload.merchant.trim(), &urls, &options)
        .await;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Searches for a merchant, then resolves every hit in the browser.
///
/// # Endpoint
///
/// `POST /collect_mirrors_interactive`
///
/// The search query is the merchant, its keywords and the country joined by
/// spaces. Each item carries that query.
///
/// # Errors
///
/// Returns 400 Bad Request on validation failure. Search failures yield an
/// empty `items` list.
pub async fn collect_interactive_handler(
    State(state): State<AppState>,
    Json(payload): Json<InteractiveRequest>,
) -> Result<Json<InteractiveResponse>, AppError> {
    payload.validate()?;

    let service = &state.interactive_service;
    let options = payload.options(service.defaults());
    let search = payload.search();

    let items: Vec<MerchantResolvedUrl> = service
        .collect(&search, &options)
        .await
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(InteractiveResponse {
        ok: true,
        merchant: search.merchant,
        count: items.len(),
        items,
    }))
}
