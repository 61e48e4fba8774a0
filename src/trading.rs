use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::filter::{self, Field, Predicate, Selection};
use crate::market;
use crate::models::{Deal, StageId, Trade};

/// Bucket size for the trading growth series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InsightPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
}

impl InsightPeriod {
    pub fn label(self) -> &'static str {
        match self {
            InsightPeriod::Daily => "Daily insights",
            InsightPeriod::Weekly => "Weekly insights",
            InsightPeriod::Monthly => "Monthly insights",
            InsightPeriod::Quarterly => "Quarterly insights",
        }
    }

    fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            InsightPeriod::Daily => date,
            InsightPeriod::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            InsightPeriod::Monthly => {
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
            }
            InsightPeriod::Quarterly => {
                NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1).unwrap_or(date)
            }
        }
    }

    fn bucket_label(self, start: NaiveDate) -> String {
        match self {
            InsightPeriod::Daily => start.format("%b %-d").to_string(),
            InsightPeriod::Weekly => start.format("Week of %b %-d").to_string(),
            InsightPeriod::Monthly => start.format("%b %Y").to_string(),
            InsightPeriod::Quarterly => format!("Q{} {}", start.month0() / 3 + 1, start.year()),
        }
    }
}

/// Which breakdowns the trading dashboard charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MarketFocus {
    #[default]
    AllDeals,
    Industry,
    Geo,
    PrimarySecondary,
}

impl MarketFocus {
    pub fn label(self) -> &'static str {
        match self {
            MarketFocus::AllDeals => "All deals",
            MarketFocus::Industry => "Industry focus",
            MarketFocus::Geo => "Geo focus",
            MarketFocus::PrimarySecondary => "Primary/Secondary market",
        }
    }

    pub fn breakdowns(self, trades: &[&Trade]) -> Vec<Breakdown> {
        let per_market = || Breakdown {
            title: "Trades per Market (Geo)",
            shares: trades_per(trades, |trade| trade.market.as_str()),
        };
        let per_industry = || Breakdown {
            title: "Trades per Industry",
            shares: trades_per(trades, |trade| trade.industry.as_str()),
        };
        match self {
            MarketFocus::AllDeals => vec![per_market(), per_industry()],
            MarketFocus::Industry => vec![per_industry()],
            MarketFocus::Geo => vec![per_market()],
            MarketFocus::PrimarySecondary => vec![Breakdown {
                title: "Primary vs Secondary",
                shares: trades_per(trades, |trade| trade.trade_type.label()),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeShare {
    pub label: String,
    pub count: usize,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub title: &'static str,
    pub shares: Vec<TradeShare>,
}

impl Breakdown {
    /// Pie labels by trade count, `"<label>: <share>%"`.
    pub fn share_labels(&self) -> Vec<String> {
        let total: usize = self.shares.iter().map(|share| share.count).sum();
        self.shares
            .iter()
            .map(|share| {
                let percent = market::share_percent(share.count as f64, total as f64);
                format!("{}: {percent:.0}%", share.label)
            })
            .collect()
    }
}

const UNSPECIFIED: &str = "Unspecified";

/// Groups trades by `key`, busiest group first.
pub fn trades_per<'a, F>(trades: &[&'a Trade], key: F) -> Vec<TradeShare>
where
    F: Fn(&'a Trade) -> &'a str,
{
    let mut map: HashMap<&str, (usize, f64)> = HashMap::new();
    for trade in trades {
        let label = key(*trade).trim();
        let label = if label.is_empty() { UNSPECIFIED } else { label };
        let entry = map.entry(label).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += trade.trade_value;
    }

    let mut shares: Vec<TradeShare> = map
        .into_iter()
        .map(|(label, (count, volume))| TradeShare {
            label: label.to_string(),
            count,
            volume,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    shares
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub period: String,
    pub trades: usize,
    pub volume: f64,
}

/// Trading volume per period bucket, oldest bucket first.
pub fn trading_growth(trades: &[&Trade], period: InsightPeriod) -> Vec<GrowthPoint> {
    let mut buckets: BTreeMap<NaiveDate, (usize, f64)> = BTreeMap::new();
    for trade in trades {
        let start = period.bucket_start(trade.trade_date_time.date_naive());
        let entry = buckets.entry(start).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += trade.trade_value;
    }

    buckets
        .into_iter()
        .map(|(start, (trades, volume))| GrowthPoint {
            period: period.bucket_label(start),
            trades,
            volume,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFilter {
    pub search: String,
    pub market: Selection,
    pub industry: Selection,
}

impl TradeFilter {
    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::Search(
                vec![Field::Name, Field::Buyer, Field::Seller],
                self.search.clone(),
            ),
            Predicate::Equals(Field::Region, self.market.clone()),
            Predicate::Equals(Field::Industry, self.industry.clone()),
        ]
    }

    /// Matching trades in the order supplied.
    pub fn apply<'a>(&self, trades: &'a [Trade]) -> Vec<&'a Trade> {
        filter::apply(trades, &self.predicates())
    }
}

impl Trade {
    pub fn seller_label(&self) -> &str {
        self.investor_seller_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("-")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentStats {
    pub deals_count: usize,
    pub total_deal_volume: f64,
    pub active_deals_in_pipeline: usize,
}

impl InvestmentStats {
    pub const DEALS_TARGET: f64 = 20.0;
    pub const VOLUME_TARGET: f64 = 5_000_000.0;
    pub const ACTIVE_TARGET: f64 = 10.0;

    /// Deals that have not reached closing count as active.
    pub fn from_deals(deals: &[Deal]) -> Self {
        Self {
            deals_count: deals.len(),
            total_deal_volume: deals.iter().map(|deal| deal.amount).sum(),
            active_deals_in_pipeline: deals
                .iter()
                .filter(|deal| deal.stage != StageId::Closing)
                .count(),
        }
    }

    /// Progress-bar fill against the fixed targets, capped at 100.
    pub fn bar_percentages(&self) -> [u8; 3] {
        let fill = |value: f64, target: f64| (100.0 * value / target).round().clamp(0.0, 100.0) as u8;
        [
            fill(self.deals_count as f64, Self::DEALS_TARGET),
            fill(self.total_deal_volume, Self::VOLUME_TARGET),
            fill(self.active_deals_in_pipeline as f64, Self::ACTIVE_TARGET),
        ]
    }
}
