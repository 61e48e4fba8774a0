use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Flat, loosely typed profile as supplied by the edit flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRecord(BTreeMap<String, Value>);

impl ProfileRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// The field's text, only when it is a string with visible content.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.0.get(field) {
            Some(Value::String(value)) if !value.trim().is_empty() => Some(value.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageId {
    Screening,
    DueDiligence,
    DealTerms,
    Closing,
}

impl StageId {
    /// Board display order.
    pub const ALL: [StageId; 4] = [
        StageId::Screening,
        StageId::DueDiligence,
        StageId::DealTerms,
        StageId::Closing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StageId::Screening => "screening",
            StageId::DueDiligence => "due-diligence",
            StageId::DealTerms => "deal-terms",
            StageId::Closing => "closing",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StageId::Screening => "Screening",
            StageId::DueDiligence => "Due Diligence",
            StageId::DealTerms => "Deal Terms",
            StageId::Closing => "Closing",
        }
    }

    pub fn position(self) -> usize {
        match self {
            StageId::Screening => 0,
            StageId::DueDiligence => 1,
            StageId::DealTerms => 2,
            StageId::Closing => 3,
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StageId::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ParseError::new("stage", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealStatus {
    New,
    #[serde(rename = "In Review")]
    InReview,
    Active,
    Negotiating,
    #[serde(other)]
    Other,
}

impl DealStatus {
    pub fn label(self) -> &'static str {
        match self {
            DealStatus::New => "New",
            DealStatus::InReview => "In Review",
            DealStatus::Active => "Active",
            DealStatus::Negotiating => "Negotiating",
            DealStatus::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub venture_name: String,
    pub industry: String,
    pub amount: f64,
    pub stage: StageId,
    pub status: DealStatus,
    pub progress: u8,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    pub last_activity: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStage {
    pub id: StageId,
    pub name: &'static str,
    pub deals: Vec<Deal>,
}

impl PipelineStage {
    pub fn empty(id: StageId) -> Self {
        Self {
            id,
            name: id.name(),
            deals: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.deals.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "Upcoming",
            SessionStatus::InProgress => "In Progress",
            SessionStatus::Completed => "Completed",
            SessionStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_open(self) -> bool {
        !matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub status: SessionStatus,
    pub expert_id: String,
    pub service_id: String,
    pub client_name: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_milestone: Option<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expert {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrend {
    pub period: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSegment {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveMetric {
    pub name: String,
    pub value: f64,
    pub industry: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAlert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AlertKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStat {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketNews {
    pub id: String,
    pub title: String,
    #[serde(default, alias = "intro")]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
}

/// The generated market overview shown at the top of the intelligence page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub executive_overview: String,
    #[serde(default)]
    pub key_insights: Vec<String>,
    pub market_sentiment: String,
    pub confidence_score: String,
    pub data_freshness: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeType {
    Primary,
    Secondary,
}

impl TradeType {
    pub fn label(self) -> &'static str {
        match self {
            TradeType::Primary => "Primary",
            TradeType::Secondary => "Secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub trade_date_time: DateTime<Utc>,
    pub trade_type: TradeType,
    pub venture_name: String,
    pub investor_buyer_name: String,
    /// Primary issues have no selling investor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investor_seller_name: Option<String>,
    pub trade_value: f64,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub industry: String,
}
