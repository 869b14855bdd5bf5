use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lead::contact::{ContactInfo, LeadInput};
use crate::solar::roi::RoiProjection;
use crate::types::{Money, Rate};

pub const DEFAULT_LEAD_SOURCE: &str = "Solar ROI Calculator";

/// Errors raised while handing a lead to intake. Never fatal to the
/// calculation result.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("lead delivery transport error: {0}")]
    Transport(String),

    #[error("lead intake rejected payload ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("lead payload serialization error: {0}")]
    Serialization(String),

    #[error("lead delivery configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for DeliveryError {
    fn from(e: serde_json::Error) -> Self {
        DeliveryError::Serialization(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Wire payload (camelCase, as the intake endpoint expects)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub zip_code: String,
}

impl From<&ContactInfo> for ContactData {
    fn from(c: &ContactInfo) -> Self {
        Self {
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            address: c.address.clone(),
            zip_code: c.zip_code.clone(),
        }
    }
}

/// The raw energy inputs as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyData {
    pub monthly_bill: Money,
    pub electricity_rate: Money,
    pub system_size: Option<Decimal>,
    pub system_cost: Money,
    pub financing_rate: Rate,
    pub time_frame: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub timestamp: DateTime<Utc>,
    pub lead_source: String,
    pub contact_info: ContactData,
    pub energy_data: EnergyData,
    /// Rounded projection without the yearly series
    pub calculations: RoiProjection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
}

/// Assemble the intake payload for a computed lead.
pub fn build_payload(
    lead: &LeadInput,
    projection: &RoiProjection,
    lead_source: &str,
    utm_source: Option<String>,
    timestamp: DateTime<Utc>,
) -> LeadPayload {
    let e = &lead.energy;
    LeadPayload {
        timestamp,
        lead_source: lead_source.to_string(),
        contact_info: ContactData::from(&lead.contact),
        energy_data: EnergyData {
            monthly_bill: e.monthly_bill,
            electricity_rate: e.electricity_rate,
            system_size: e.system_size_kw,
            system_cost: e.system_cost,
            financing_rate: e.financing_rate_annual_pct,
            time_frame: e.time_frame_years,
        },
        calculations: projection.summary(),
        utm_source: utm_source.filter(|s| !s.trim().is_empty()),
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Destination for computed leads.
pub trait LeadSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns an error when the payload could not be handed off.
    fn deliver(&self, payload: &LeadPayload) -> Result<(), DeliveryError>;
}

/// Deliver without letting failure escape. Returns whether the sink
/// accepted the payload.
pub fn deliver_and_log(sink: &dyn LeadSink, payload: &LeadPayload) -> bool {
    match sink.deliver(payload) {
        Ok(()) => {
            tracing::info!(sink = sink.name(), lead_source = %payload.lead_source, "lead delivered");
            true
        }
        Err(error) => {
            tracing::warn!(sink = sink.name(), %error, "lead delivery failed");
            false
        }
    }
}

/// Keeps payloads in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    received: Mutex<Vec<LeadPayload>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payloads(&self) -> Vec<LeadPayload> {
        self.received
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl LeadSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn deliver(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        self.received
            .lock()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .push(payload.clone());
        Ok(())
    }
}
