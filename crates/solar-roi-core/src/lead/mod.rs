//! Lead-form collaborators around the ROI engine: contact capture,
//! interchangeable validation policies and the intake delivery payload.

pub mod contact;
pub mod delivery;
pub mod validation;

pub use contact::{ContactInfo, LeadInput};
pub use delivery::{
    build_payload, deliver_and_log, DeliveryError, LeadPayload, LeadSink, MemorySink,
    DEFAULT_LEAD_SOURCE,
};
pub use validation::{
    validate_lead, BasicPolicy, PolicyKind, StrictPolicy, ValidatedLeadInput, ValidationPolicy,
};
