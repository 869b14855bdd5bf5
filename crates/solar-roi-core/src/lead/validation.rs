use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, SolarRoiError};
use crate::lead::contact::LeadInput;
use crate::solar::resource::TIME_FRAME_OPTIONS;
use crate::SolarRoiResult;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@([A-Za-z0-9\-]+\.)+[A-Za-z]{2,}$").expect("email pattern")
});
static ZIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip pattern"));

/// Highest retail rate accepted by the strict policy (USD/kWh).
const MAX_ELECTRICITY_RATE: Decimal = dec!(1);

/// A rule set deciding whether a submission may reach the ROI engine.
///
/// Implementations return every failing field so the form can flag them
/// all at once.
pub trait ValidationPolicy: Send + Sync {
    /// Short name used in logs and configuration.
    fn name(&self) -> &'static str;

    fn validate(&self, lead: &LeadInput) -> Vec<FieldError>;
}

/// Which built-in policy to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Basic,
    #[default]
    Strict,
}

impl PolicyKind {
    pub fn build(self, email_domains: Vec<String>) -> Box<dyn ValidationPolicy> {
        match self {
            PolicyKind::Basic => Box::new(BasicPolicy),
            PolicyKind::Strict => Box::new(StrictPolicy::new().with_email_domains(email_domains)),
        }
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(PolicyKind::Basic),
            "strict" => Ok(PolicyKind::Strict),
            other => Err(format!(
                "unknown validation policy '{other}' (expected basic or strict)"
            )),
        }
    }
}

/// A lead that passed a validation policy. Only [`validate_lead`] builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLeadInput {
    lead: LeadInput,
    policy: &'static str,
}

impl ValidatedLeadInput {
    pub fn lead(&self) -> &LeadInput {
        &self.lead
    }

    /// Name of the policy that accepted this lead.
    pub fn policy(&self) -> &'static str {
        self.policy
    }

    pub fn into_inner(self) -> LeadInput {
        self.lead
    }
}

/// Apply `policy` to `lead`, failing with every field error found.
pub fn validate_lead(
    policy: &dyn ValidationPolicy,
    lead: LeadInput,
) -> SolarRoiResult<ValidatedLeadInput> {
    let errors = policy.validate(&lead);
    if !errors.is_empty() {
        tracing::debug!(
            policy = policy.name(),
            failures = errors.len(),
            "lead rejected by validation policy"
        );
        return Err(SolarRoiError::Validation(errors));
    }
    Ok(ValidatedLeadInput {
        lead,
        policy: policy.name(),
    })
}

// ---------------------------------------------------------------------------
// Basic: every contact field present, bill and cost entered
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicPolicy;

impl ValidationPolicy for BasicPolicy {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn validate(&self, lead: &LeadInput) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let c = &lead.contact;

        for (field, value) in [
            ("name", &c.name),
            ("email", &c.email),
            ("phone", &c.phone),
            ("address", &c.address),
            ("zip_code", &c.zip_code),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, "must not be blank"));
            }
        }

        if lead.energy.monthly_bill <= Decimal::ZERO {
            errors.push(FieldError::new("monthly_bill", "must be positive"));
        }
        if lead.energy.system_cost <= Decimal::ZERO {
            errors.push(FieldError::new("system_cost", "must be positive"));
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Strict: format checks on top of Basic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct StrictPolicy {
    email_domains: Vec<String>,
}

impl StrictPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept only email addresses at these providers (case-insensitive).
    /// An empty list accepts any domain.
    pub fn with_email_domains(mut self, domains: Vec<String>) -> Self {
        self.email_domains = domains
            .into_iter()
            .map(|d| d.trim().to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        self
    }

    fn check_email(&self, email: &str, errors: &mut Vec<FieldError>) {
        let email = email.trim();
        if email.is_empty() {
            return;
        }
        if !EMAIL_PATTERN.is_match(email) {
            errors.push(FieldError::new("email", "must look like name@example.com"));
            return;
        }
        if self.email_domains.is_empty() {
            return;
        }
        let domain = email
            .rsplit_once('@')
            .map(|(_, d)| d.to_ascii_lowercase())
            .unwrap_or_default();
        if !self.email_domains.iter().any(|d| *d == domain) {
            errors.push(FieldError::new(
                "email",
                format!("provider '{domain}' is not accepted"),
            ));
        }
    }
}

fn phone_digits(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let allowed = phone
        .chars()
        .all(|ch| ch.is_ascii_digit() || " +-().".contains(ch));
    if !allowed {
        return None;
    }
    match digits.len() {
        10 => Some(digits),
        11 if digits.starts_with('1') => Some(digits[1..].to_string()),
        _ => None,
    }
}

impl ValidationPolicy for StrictPolicy {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn validate(&self, lead: &LeadInput) -> Vec<FieldError> {
        let mut errors = BasicPolicy.validate(lead);
        let c = &lead.contact;

        self.check_email(&c.email, &mut errors);

        if !c.phone.trim().is_empty() && phone_digits(c.phone.trim()).is_none() {
            errors.push(FieldError::new("phone", "must be a 10-digit US number"));
        }

        if !c.zip_code.trim().is_empty() && !ZIP_PATTERN.is_match(c.zip_code.trim()) {
            errors.push(FieldError::new("zip_code", "must be NNNNN or NNNNN-NNNN"));
        }

        let e = &lead.energy;
        if e.electricity_rate <= Decimal::ZERO || e.electricity_rate > MAX_ELECTRICITY_RATE {
            errors.push(FieldError::new(
                "electricity_rate",
                format!("must be above 0 and at most {MAX_ELECTRICITY_RATE} USD/kWh"),
            ));
        }

        if !TIME_FRAME_OPTIONS.contains(&e.time_frame_years) {
            errors.push(FieldError::new(
                "time_frame_years",
                format!("must be one of {TIME_FRAME_OPTIONS:?}"),
            ));
        }

        if let Some(dp) = e.down_payment {
            if dp < Decimal::ZERO {
                errors.push(FieldError::new("down_payment", "cannot be negative"));
            }
        }

        if let Some(kw) = e.system_size_kw {
            if kw <= Decimal::ZERO {
                errors.push(FieldError::new("system_size_kw", "must be positive"));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::contact::ContactInfo;
    use crate::solar::roi::SolarRoiInput;

    fn lead() -> LeadInput {
        LeadInput {
            contact: ContactInfo {
                name: "Dana Reyes".into(),
                email: "dana@example.com".into(),
                phone: "(602) 555-0143".into(),
                address: "14 Mesa Verde Rd".into(),
                zip_code: "85004".into(),
            },
            energy: SolarRoiInput::new(dec!(180), dec!(25000)),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_basic_accepts_complete_lead() {
        assert!(BasicPolicy.validate(&lead()).is_empty());
    }

    #[test]
    fn test_basic_reports_every_blank_field() {
        let mut l = lead();
        l.contact.name = "  ".into();
        l.contact.zip_code.clear();
        l.energy.monthly_bill = Decimal::ZERO;
        assert_eq!(
            fields(&BasicPolicy.validate(&l)),
            vec!["name", "zip_code", "monthly_bill"]
        );
    }

    #[test]
    fn test_basic_ignores_formats() {
        let mut l = lead();
        l.contact.email = "not-an-email".into();
        l.contact.zip_code = "ABC".into();
        assert!(BasicPolicy.validate(&l).is_empty());
    }

    #[test]
    fn test_strict_accepts_complete_lead() {
        assert!(StrictPolicy::new().validate(&lead()).is_empty());
    }

    #[test]
    fn test_strict_format_checks() {
        let mut l = lead();
        l.contact.email = "dana@localhost".into();
        l.contact.phone = "555-0143".into();
        l.contact.zip_code = "8500".into();
        l.energy.time_frame_years = 12;
        assert_eq!(
            fields(&StrictPolicy::new().validate(&l)),
            vec!["email", "phone", "zip_code", "time_frame_years"]
        );
    }

    #[test]
    fn test_strict_zip_plus_four_and_country_code() {
        let mut l = lead();
        l.contact.zip_code = "85004-1234".into();
        l.contact.phone = "+1 602 555 0143".into();
        assert!(StrictPolicy::new().validate(&l).is_empty());
    }

    #[test]
    fn test_strict_email_domain_allow_list() {
        let policy = StrictPolicy::new().with_email_domains(vec!["Gmail.com".into()]);
        let errors = policy.validate(&lead());
        assert_eq!(fields(&errors), vec!["email"]);
        assert!(errors[0].reason.contains("example.com"));

        let mut l = lead();
        l.contact.email = "dana@GMAIL.com".into();
        assert!(policy.validate(&l).is_empty());
    }

    #[test]
    fn test_strict_blank_email_reported_once() {
        let mut l = lead();
        l.contact.email.clear();
        assert_eq!(fields(&StrictPolicy::new().validate(&l)), vec!["email"]);
    }

    #[test]
    fn test_validate_lead_wraps_errors() {
        let mut l = lead();
        l.contact.phone.clear();
        match validate_lead(&BasicPolicy, l) {
            Err(SolarRoiError::Validation(errs)) => assert_eq!(fields(&errs), vec!["phone"]),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_lead_records_policy() {
        let validated = validate_lead(&StrictPolicy::new(), lead()).unwrap();
        assert_eq!(validated.policy(), "strict");
        assert_eq!(validated.lead().contact.zip_code, "85004");
    }

    #[test]
    fn test_policy_kind_parse_and_build() {
        assert_eq!("Basic".parse::<PolicyKind>(), Ok(PolicyKind::Basic));
        assert!("lenient".parse::<PolicyKind>().is_err());
        assert_eq!(PolicyKind::Strict.build(Vec::new()).name(), "strict");
    }
}
