//! Address validation handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use driftwood_core::{AddressId, AddressValidationStatus, CorrectedAddress};

use crate::error::Result;
use crate::services::ValidationReport;
use crate::state::AppState;

/// Request body for the validate endpoint.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// Whether the customer has an account session. Guests get a report but
    /// no persisted status.
    #[serde(default = "default_true")]
    pub is_logged_in: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for ValidateRequest {
    fn default() -> Self {
        Self { is_logged_in: true }
    }
}

/// Response body for the decision endpoints.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    /// Which address the decision was recorded on.
    pub address_id: AddressId,
    /// The status now persisted on the address.
    pub status: Option<AddressValidationStatus>,
}

/// `POST /addresses/{id}/validate` - run the validation workflow.
pub async fn validate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ValidateRequest>>,
) -> Result<Json<ValidationReport>> {
    let Json(request) = body.unwrap_or_default();
    let id = AddressId::new(id);

    let report = state
        .validation()
        .validate_address(&id, request.is_logged_in)
        .await?;

    Ok(Json(report))
}

/// `POST /addresses/{id}/accept` - accept a proposed correction.
///
/// The body is the correction as returned by the validate endpoint.
pub async fn accept(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(suggestion): Json<CorrectedAddress>,
) -> Result<Json<DecisionResponse>> {
    let id = AddressId::new(id);
    let address = state.validation().accept_suggestion(&id, &suggestion).await?;

    Ok(Json(DecisionResponse {
        address_id: address.id,
        status: address.validation_status,
    }))
}

/// `POST /addresses/{id}/decline` - keep the address as entered.
pub async fn decline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DecisionResponse>> {
    let id = AddressId::new(id);
    let address = state.validation().decline_suggestion(&id).await?;

    Ok(Json(DecisionResponse {
        address_id: address.id,
        status: address.validation_status,
    }))
}

/// `POST /addresses/{id}/ignore` - dismiss the review without deciding.
///
/// Records an ignore with no assumed validity; the address will be
/// re-checked after the grace period.
pub async fn ignore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DecisionResponse>> {
    let id = AddressId::new(id);
    let address = state.validation().ignore(&id, false).await?;

    Ok(Json(DecisionResponse {
        address_id: address.id,
        status: address.validation_status,
    }))
}
