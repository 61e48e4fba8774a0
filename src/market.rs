use chrono::{DateTime, Utc};

use crate::filter::{self, Field, Predicate, Selection};
use crate::format;
use crate::models::{
    AlertKind, CompetitiveMetric, MarketAlert, MarketNews, MarketSegment, MarketStat,
    MarketSummary, MarketTrend,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketFilters {
    pub industry: Selection,
    pub region: Selection,
}

impl MarketFilters {
    pub fn trends<'a>(&self, trends: &'a [MarketTrend]) -> Vec<&'a MarketTrend> {
        filter::apply(
            trends,
            &[
                Predicate::Equals(Field::Industry, self.industry.clone()),
                Predicate::Equals(Field::Region, self.region.clone()),
            ],
        )
    }

    /// Segments are sub-markets, so the industry selection matches by name.
    pub fn segments<'a>(&self, segments: &'a [MarketSegment]) -> Vec<&'a MarketSegment> {
        match &self.industry {
            Selection::All => segments.iter().collect(),
            Selection::Only(industry) => filter::apply(
                segments,
                &[Predicate::Search(vec![Field::Name], industry.clone())],
            ),
        }
    }

    pub fn metrics<'a>(&self, metrics: &'a [CompetitiveMetric]) -> Vec<&'a CompetitiveMetric> {
        filter::apply(
            metrics,
            &[Predicate::Equals(Field::Industry, self.industry.clone())],
        )
    }
}

/// Pie-chart labels, `"<name>: <share>%"`.
pub fn share_labels(segments: &[&MarketSegment]) -> Vec<String> {
    let total: f64 = segments.iter().map(|segment| segment.value).sum();
    segments
        .iter()
        .map(|segment| {
            format!("{}: {:.0}%", segment.name, share_percent(segment.value, total))
        })
        .collect()
}

/// Whole-number share of `total`; zero when the total is not positive.
pub fn share_percent(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        (100.0 * value / total).round()
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatIcon {
    DollarSign,
    TrendingUp,
    BarChart,
    Target,
}

impl StatIcon {
    /// Unknown keys fall back to the currency icon.
    pub fn from_key(key: &str) -> Self {
        match key {
            "TrendingUp" => StatIcon::TrendingUp,
            "BarChart3" => StatIcon::BarChart,
            "Target" => StatIcon::Target,
            _ => StatIcon::DollarSign,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            StatIcon::DollarSign => "$",
            StatIcon::TrendingUp => "↗",
            StatIcon::BarChart => "▥",
            StatIcon::Target => "◎",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard<'a> {
    pub icon: StatIcon,
    pub stat: &'a MarketStat,
}

pub fn stat_cards(stats: &[MarketStat]) -> Vec<StatCard<'_>> {
    stats
        .iter()
        .map(|stat| StatCard {
            icon: StatIcon::from_key(&stat.icon),
            stat,
        })
        .collect()
}

impl AlertKind {
    pub fn label(self) -> &'static str {
        match self {
            AlertKind::Critical => "Critical",
            AlertKind::Warning => "Warning",
            AlertKind::Info => "Info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertLine<'a> {
    pub alert: &'a MarketAlert,
    pub age: String,
}

/// Alerts in the order supplied, each with its age relative to `now`.
pub fn alert_feed(alerts: &[MarketAlert], now: DateTime<Utc>) -> Vec<AlertLine<'_>> {
    alerts
        .iter()
        .map(|alert| AlertLine {
            alert,
            age: format::format_time_ago_at(alert.date, now),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsLine<'a> {
    pub news: &'a MarketNews,
    pub age: String,
}

pub fn news_feed(news: &[MarketNews], now: DateTime<Utc>) -> Vec<NewsLine<'_>> {
    news.iter()
        .map(|news| NewsLine {
            news,
            age: format::format_time_ago_at(news.date, now),
        })
        .collect()
}

impl MarketSummary {
    pub fn freshness(&self, now: DateTime<Utc>) -> String {
        format::format_time_ago_at(self.data_freshness, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn trend(period: &str, industry: &str, region: &str) -> MarketTrend {
        MarketTrend {
            period: period.to_string(),
            value: 120.0,
            industry: Some(industry.to_string()),
            region: Some(region.to_string()),
        }
    }

    fn segment(name: &str, value: f64) -> MarketSegment {
        MarketSegment {
            name: name.to_string(),
            value,
            growth: None,
        }
    }

    fn metric(name: &str, industry: &str) -> CompetitiveMetric {
        CompetitiveMetric {
            name: name.to_string(),
            value: 50.0,
            industry: industry.to_string(),
        }
    }

    #[test]
    fn trends_filter_by_industry_and_region() {
        let trends = vec![
            trend("Jan", "Fintech", "MENA"),
            trend("Jan", "Healthtech", "MENA"),
            trend("Feb", "Fintech", "GCC"),
        ];
        let filters = MarketFilters {
            industry: Selection::parse("fintech"),
            region: Selection::parse("mena"),
        };
        let matched = filters.trends(&trends);
        assert_eq!(matched, vec![&trends[0]]);
        assert_eq!(MarketFilters::default().trends(&trends).len(), 3);
    }

    #[test]
    fn segments_match_industry_by_name() {
        let segments = vec![segment("Digital Payments", 40.0), segment("Fintech Lending", 25.0)];
        let filters = MarketFilters {
            industry: Selection::parse("fintech"),
            ..MarketFilters::default()
        };
        let matched = filters.segments(&segments);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Fintech Lending");
    }

    #[test]
    fn metrics_filter_by_industry() {
        let metrics = vec![metric("Market Share", "Fintech"), metric("Market Share", "E-commerce")];
        let filters = MarketFilters {
            industry: Selection::parse("E-COMMERCE"),
            ..MarketFilters::default()
        };
        assert_eq!(filters.metrics(&metrics), vec![&metrics[1]]);
    }

    #[test]
    fn share_labels_round_percentages() {
        let segments = [segment("Payments", 40.0), segment("Lending", 25.0), segment("Other", 35.0)];
        let refs: Vec<&MarketSegment> = segments.iter().collect();
        assert_eq!(
            share_labels(&refs),
            vec!["Payments: 40%", "Lending: 25%", "Other: 35%"]
        );

        let zeros = [segment("Empty", 0.0)];
        let refs: Vec<&MarketSegment> = zeros.iter().collect();
        assert_eq!(share_labels(&refs), vec!["Empty: 0%"]);
    }

    #[test]
    fn unknown_icon_keys_fall_back_to_currency() {
        assert_eq!(StatIcon::from_key("TrendingUp"), StatIcon::TrendingUp);
        assert_eq!(StatIcon::from_key("BarChart3"), StatIcon::BarChart);
        assert_eq!(StatIcon::from_key("MapPin"), StatIcon::DollarSign);
        assert_eq!(StatIcon::from_key("Sparkles"), StatIcon::DollarSign);
    }

    #[test]
    fn stat_cards_resolve_icons_in_order() {
        let stat = |label: &str, icon: &str| MarketStat {
            label: label.to_string(),
            value: "1.2".to_string(),
            unit: "B".to_string(),
            icon: icon.to_string(),
        };
        let stats = vec![stat("Total Funding", "DollarSign"), stat("Deals", "Target"), stat("Exits", "Rocket")];

        let cards = stat_cards(&stats);
        let resolved: Vec<(&str, StatIcon)> = cards
            .iter()
            .map(|card| (card.stat.label.as_str(), card.icon))
            .collect();
        assert_eq!(
            resolved,
            vec![
                ("Total Funding", StatIcon::DollarSign),
                ("Deals", StatIcon::Target),
                ("Exits", StatIcon::DollarSign),
            ]
        );
        assert_eq!(cards[1].icon.glyph(), "◎");
    }

    #[test]
    fn news_feed_keeps_order_and_ages_items() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let item = |id: &str, hours: i64| MarketNews {
            id: id.to_string(),
            title: format!("News {id}"),
            description: String::new(),
            date: now - Duration::hours(hours),
            source: "Desk Wire".to_string(),
            url: String::new(),
        };
        let news = vec![item("n1", 30), item("n2", 3)];

        let feed = news_feed(&news, now);
        let ages: Vec<(&str, &str)> = feed
            .iter()
            .map(|line| (line.news.id.as_str(), line.age.as_str()))
            .collect();
        assert_eq!(ages, vec![("n1", "1d ago"), ("n2", "3h ago")]);
    }

    #[test]
    fn summary_freshness_is_relative() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let summary = MarketSummary {
            executive_overview: "Growth continues.".to_string(),
            key_insights: Vec::new(),
            market_sentiment: "Positive".to_string(),
            confidence_score: "85%".to_string(),
            data_freshness: now - Duration::hours(1),
        };
        assert_eq!(summary.freshness(now), "1h ago");
    }

    #[test]
    fn alert_feed_keeps_supplied_order() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let alert = |id: &str, days: i64| MarketAlert {
            id: id.to_string(),
            title: format!("Alert {id}"),
            description: String::new(),
            date: now - Duration::days(days),
            kind: AlertKind::Info,
        };
        let alerts = vec![alert("a1", 5), alert("a2", 2), alert("a3", 10)];

        let feed = alert_feed(&alerts, now);
        let order: Vec<(&str, &str)> = feed
            .iter()
            .map(|line| (line.alert.id.as_str(), line.age.as_str()))
            .collect();
        assert_eq!(order, vec![("a1", "5d ago"), ("a2", "2d ago"), ("a3", "10d ago")]);
    }
}
