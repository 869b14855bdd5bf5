use chrono::Utc;
use clap::Args;
use serde_json::Value;
use std::io::{self, Write};

use solar_roi_core::lead::{
    build_payload, deliver_and_log, validate_lead, LeadInput, LeadPayload, LeadSink, PolicyKind,
};
use solar_roi_core::solar::roi;

use crate::config::SolarRoiConfig;
use crate::input;
use crate::webhook::WebhookSink;

/// Arguments for validating, projecting and delivering a lead
#[derive(Args, Debug)]
pub struct LeadArgs {
    /// Path to JSON or YAML lead file (contact + energy sections)
    #[arg(long)]
    pub input: Option<String>,

    /// Validation policy (overrides config): basic, strict
    #[arg(long)]
    pub policy: Option<PolicyKind>,

    /// Campaign attribution forwarded with the lead
    #[arg(long)]
    pub utm_source: Option<String>,

    /// Intake endpoint (overrides config)
    #[arg(long, env = "SOLAR_ROI_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Validate and project without delivering
    #[arg(long)]
    pub dry_run: bool,
}

/// A validated, projected lead whose delivery has not happened yet.
pub struct PreparedLead {
    pub output: Value,
    payload: LeadPayload,
    sink: Option<Box<dyn LeadSink>>,
}

impl PreparedLead {
    /// Hand the result to `emit` and flush stdout, then deliver. The
    /// delivery outcome is only logged.
    pub fn emit_then_deliver(self, emit: impl FnOnce(&Value)) -> bool {
        emit(&self.output);
        if let Err(e) = io::stdout().flush() {
            tracing::warn!("failed to flush output: {}", e);
        }
        match self.sink {
            Some(sink) => deliver_and_log(sink.as_ref(), &self.payload),
            None => false,
        }
    }
}

pub fn prepare_lead(
    args: LeadArgs,
    config: &SolarRoiConfig,
) -> Result<PreparedLead, Box<dyn std::error::Error>> {
    let lead: LeadInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_piped()? {
        piped
    } else {
        return Err("--input <lead.json> or stdin required for lead".into());
    };

    let policy_kind = args.policy.unwrap_or(config.validation.policy);
    let policy = policy_kind.build(config.validation.email_domains.clone());
    let validated = validate_lead(policy.as_ref(), lead)?;

    let output = roi::calculate_solar_roi(&validated.lead().energy)?;
    let payload = build_payload(
        validated.lead(),
        &output.result,
        &config.delivery.lead_source,
        args.utm_source.clone(),
        Utc::now(),
    );

    let webhook_url = args
        .webhook_url
        .clone()
        .or_else(|| config.delivery.webhook_url.clone());
    let sink = select_sink(args.dry_run, webhook_url.as_deref(), config.delivery.timeout_secs);

    let mut value = serde_json::to_value(output.map(|p| p.summary()))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("policy".into(), Value::from(validated.policy()));
        obj.insert("dry_run".into(), Value::from(args.dry_run));
        obj.insert(
            "delivery".into(),
            Value::from(sink.as_ref().map_or("none", |s| s.name())),
        );
    }

    Ok(PreparedLead {
        output: value,
        payload,
        sink,
    })
}

fn select_sink(
    dry_run: bool,
    webhook_url: Option<&str>,
    timeout_secs: u64,
) -> Option<Box<dyn LeadSink>> {
    if dry_run {
        tracing::info!("dry run; lead not delivered");
        return None;
    }

    let Some(url) = webhook_url.filter(|u| !u.trim().is_empty()) else {
        tracing::warn!("no webhook_url configured; lead not delivered");
        return None;
    };

    match WebhookSink::new(url, timeout_secs) {
        Ok(sink) => {
            tracing::debug!(url = sink.url(), "delivering lead to webhook");
            Some(Box::new(sink))
        }
        Err(error) => {
            tracing::warn!(%error, "lead delivery skipped");
            None
        }
    }
}
