//! Alerting for urgent findings.
//!
//! When an answered query surfaces high-priority action items with high
//! confidence, the engine emits one alert to an optional [`AlertSink`].
//! Notification is fire-and-forget: a sink failure is logged and swallowed,
//! never failing the query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::OkraError;
use crate::types::{ActionItem, ActionPriority, QueryContext};

/// Minimum answer confidence before an alert is considered.
pub const ALERT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Longest query excerpt quoted in an alert title.
const ALERT_TITLE_QUERY_LEN: usize = 80;

// ============================================================================
// Alert
// ============================================================================

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// One alert record emitted for urgent findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Alert identifier.
    pub id: Uuid,

    /// Short title naming the originating query.
    pub title: String,

    /// What was found.
    pub description: String,

    /// Alert severity.
    pub severity: AlertSeverity,

    /// The engine's confidence in the originating answer.
    pub ai_confidence: f32,

    /// Descriptions of the high-priority action items.
    pub suggested_actions: Vec<String>,

    /// When the alert was raised.
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// AlertSink Trait
// ============================================================================

/// Destination for urgent-finding alerts.
///
/// Implementations must be `Send + Sync`. Delivery failures are the sink's
/// own story to tell; the engine only logs them.
pub trait AlertSink: Send + Sync {
    /// Deliver one alert.
    fn notify(&self, alert: &Alert) -> Result<(), OkraError>;
}

// ============================================================================
// Emission
// ============================================================================

/// Emit an alert if the findings warrant one.
///
/// An alert is warranted when at least one action item has high priority and
/// the answer confidence exceeds [`ALERT_CONFIDENCE_THRESHOLD`]. Returns
/// whether an alert was delivered.
pub fn maybe_emit_alert(
    sink: Option<&dyn AlertSink>,
    context: &QueryContext,
    confidence: f32,
    action_items: &[ActionItem],
) -> bool {
    let Some(sink) = sink else {
        return false;
    };

    let high_priority: Vec<&ActionItem> = action_items
        .iter()
        .filter(|item| item.priority == ActionPriority::High)
        .collect();

    if high_priority.is_empty() || confidence <= ALERT_CONFIDENCE_THRESHOLD {
        return false;
    }

    let alert = build_alert(context, confidence, &high_priority);
    match sink.notify(&alert) {
        Ok(()) => {
            debug!("Delivered alert '{}'", alert.title);
            true
        }
        Err(e) => {
            // Fire-and-forget: a lost alert must not fail the query.
            warn!("Failed to deliver alert '{}': {}", alert.title, e);
            false
        }
    }
}

fn build_alert(context: &QueryContext, confidence: f32, high_priority: &[&ActionItem]) -> Alert {
    let query_excerpt: String = context.query.chars().take(ALERT_TITLE_QUERY_LEN).collect();

    Alert {
        id: Uuid::new_v4(),
        title: format!("High-priority findings for: {}", query_excerpt),
        description: format!(
            "Answering a query for organization '{}' surfaced {} high-priority action item(s).",
            context.organization_id,
            high_priority.len()
        ),
        severity: AlertSeverity::Warning,
        ai_confidence: confidence,
        suggested_actions: high_priority
            .iter()
            .map(|item| item.description.clone())
            .collect(),
        created_at: Utc::now(),
    }
}

// ============================================================================
// Tests
// ============================================================================
