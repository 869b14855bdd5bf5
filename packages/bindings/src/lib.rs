use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use solar_roi_core::lead::{self, LeadInput, PolicyKind, DEFAULT_LEAD_SOURCE};
use solar_roi_core::solar::roi::{self, SolarRoiInput};
use solar_roi_core::{FieldError, SolarRoiError};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// ROI projection
// ---------------------------------------------------------------------------

/// Full-precision projection wrapped in the computation envelope.
#[napi]
pub fn calculate_solar_roi(input_json: String) -> NapiResult<String> {
    let input: SolarRoiInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = roi::calculate_solar_roi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Projection rounded for display, yearly series included.
#[napi]
pub fn calculate_solar_roi_rounded(input_json: String) -> NapiResult<String> {
    let input: SolarRoiInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = roi::calculate_solar_roi(&input)
        .map_err(to_napi_error)?
        .map(|p| p.rounded());
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lead handling
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    policy: String,
    errors: Vec<FieldError>,
}

/// Validate a lead and report every failing field. Only malformed JSON
/// or an unknown policy name raise.
#[napi]
pub fn validate_lead(lead_json: String, policy: Option<String>) -> NapiResult<String> {
    let input: LeadInput = serde_json::from_str(&lead_json).map_err(to_napi_error)?;
    let kind = match policy {
        Some(name) => name.parse::<PolicyKind>().map_err(to_napi_error)?,
        None => PolicyKind::default(),
    };
    let policy = kind.build(Vec::new());

    let report = match lead::validate_lead(policy.as_ref(), input) {
        Ok(validated) => ValidationReport {
            valid: true,
            policy: validated.policy().to_string(),
            errors: Vec::new(),
        },
        Err(SolarRoiError::Validation(errors)) => ValidationReport {
            valid: false,
            policy: policy.name().to_string(),
            errors,
        },
        Err(other) => return Err(to_napi_error(other)),
    };
    serde_json::to_string(&report).map_err(to_napi_error)
}

/// Intake payload for a lead, timestamped now. The lead is not validated
/// here; call `validate_lead` first.
#[napi]
pub fn build_lead_payload(lead_json: String, lead_source: Option<String>) -> NapiResult<String> {
    let input: LeadInput = serde_json::from_str(&lead_json).map_err(to_napi_error)?;
    let projection = roi::compute(&input.energy).map_err(to_napi_error)?;
    let source = lead_source.unwrap_or_else(|| DEFAULT_LEAD_SOURCE.to_string());
    let payload = lead::build_payload(&input, &projection, &source, None, chrono::Utc::now());
    serde_json::to_string(&payload).map_err(to_napi_error)
}
