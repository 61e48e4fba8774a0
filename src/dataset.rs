use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    CompetitiveMetric, Deal, DealStatus, Expert, MarketAlert, MarketNews, MarketSegment,
    MarketStat, MarketSummary, MarketTrend, Service, Session, StageId, Trade,
};

/// Everything the views read, as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub deals: Vec<Deal>,
    pub sessions: Vec<Session>,
    pub experts: Vec<Expert>,
    pub services: Vec<Service>,
    pub market_stats: Vec<MarketStat>,
    pub market_trends: Vec<MarketTrend>,
    pub market_segments: Vec<MarketSegment>,
    pub competitive_metrics: Vec<CompetitiveMetric>,
    pub market_alerts: Vec<MarketAlert>,
    pub market_news: Vec<MarketNews>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_summary: Option<MarketSummary>,
    pub trades: Vec<Trade>,
}

pub fn load(path: &Path) -> anyhow::Result<Dataset> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let mut dataset: Dataset = serde_json::from_str(&raw)
        .with_context(|| format!("failed to decode dataset {}", path.display()))?;
    clamp_progress(&mut dataset.deals);
    tracing::debug!(
        path = %path.display(),
        deals = dataset.deals.len(),
        sessions = dataset.sessions.len(),
        trades = dataset.trades.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

fn clamp_progress(deals: &mut [Deal]) {
    for deal in deals.iter_mut().filter(|deal| deal.progress > 100) {
        tracing::warn!(deal = %deal.id, progress = deal.progress, "clamping deal progress to 100");
        deal.progress = 100;
    }
}

pub fn save(path: &Path, dataset: &Dataset) -> anyhow::Result<()> {
    let encoded = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, encoded)
        .with_context(|| format!("failed to write dataset {}", path.display()))?;
    tracing::debug!(path = %path.display(), "dataset saved");
    Ok(())
}

#[derive(Debug, Deserialize)]
struct CsvDeal {
    id: Option<String>,
    venture_name: String,
    industry: String,
    amount: f64,
    stage: String,
    status: String,
    progress: u8,
    assigned_to: String,
    last_activity: NaiveDate,
    due_date: Option<NaiveDate>,
}

impl CsvDeal {
    fn into_deal(self) -> anyhow::Result<Deal> {
        let stage: StageId = self.stage.parse()?;
        let status: DealStatus = serde_json::from_value(serde_json::Value::String(self.status))?;
        Ok(Deal {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("deal-{}", Uuid::new_v4())),
            venture_name: self.venture_name,
            industry: self.industry,
            amount: self.amount,
            stage,
            status,
            progress: self.progress.min(100),
            assigned_to: self
                .assigned_to
                .split(';')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            last_activity: start_of_day(self.last_activity),
            due_date: self.due_date.map(start_of_day),
        })
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Appends deals from a CSV export, skipping ids already present. Nothing is
/// appended unless every row decodes.
pub fn import_deals(dataset: &mut Dataset, reader: impl std::io::Read) -> anyhow::Result<usize> {
    let mut known: HashSet<String> = dataset.deals.iter().map(|deal| deal.id.clone()).collect();
    let mut reader = csv::Reader::from_reader(reader);
    let mut imported = Vec::new();

    for (line, result) in reader.deserialize::<CsvDeal>().enumerate() {
        let row = result.with_context(|| format!("invalid deal row {}", line + 1))?;
        let deal = row
            .into_deal()
            .with_context(|| format!("invalid deal row {}", line + 1))?;

        if !known.insert(deal.id.clone()) {
            tracing::warn!(deal = %deal.id, "skipping duplicate deal");
            continue;
        }
        imported.push(deal);
    }

    let inserted = imported.len();
    dataset.deals.extend(imported);
    Ok(inserted)
}

pub fn import_csv(dataset: &mut Dataset, csv_path: &Path) -> anyhow::Result<usize> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    import_deals(dataset, file)
}
