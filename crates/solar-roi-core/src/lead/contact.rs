use serde::{Deserialize, Serialize};

use crate::solar::roi::SolarRoiInput;

/// Visitor contact details. Opaque to the engine; carried for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub zip_code: String,
}

/// One form submission: who the visitor is and what they entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadInput {
    pub contact: ContactInfo,
    pub energy: SolarRoiInput,
}
