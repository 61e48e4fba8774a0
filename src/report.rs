use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::Dataset;
use crate::filter::Selection;
use crate::format;
use crate::market::{self, MarketFilters};
use crate::models::StageId;
use crate::pipeline::Board;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Standard,
    #[default]
    Comprehensive,
    Expert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    pub depth: AnalysisDepth,
    pub include_predictions: bool,
    pub include_recommendations: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            depth: AnalysisDepth::Comprehensive,
            include_predictions: true,
            include_recommendations: true,
        }
    }
}

/// A report template together with the parameters it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "template", rename_all = "kebab-case")]
pub enum ReportTemplate {
    MarketEntry {
        industry: String,
        market: String,
    },
    CompetitiveIntelligence {
        industry: String,
        competitors: Vec<String>,
    },
    InvestmentOpportunity {
        sector: String,
        stage: Option<StageId>,
    },
}

impl ReportTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            ReportTemplate::MarketEntry { .. } => "Market Entry Analysis",
            ReportTemplate::CompetitiveIntelligence { .. } => "Competitive Intelligence",
            ReportTemplate::InvestmentOpportunity { .. } => "Investment Opportunity Assessment",
        }
    }

    pub fn sections(&self) -> &'static [&'static str] {
        match self {
            ReportTemplate::MarketEntry { .. } => &[
                "Executive Summary",
                "Market Overview",
                "Competitive Landscape",
                "Regulatory Environment",
                "Entry Strategy",
                "Risk Assessment",
                "Financial Projections",
            ],
            ReportTemplate::CompetitiveIntelligence { .. } => &[
                "Executive Summary",
                "Competitor Profiles",
                "Comparative Analysis",
                "SWOT Analysis",
                "Market Positioning",
                "Competitive Advantages",
                "Strategic Recommendations",
            ],
            ReportTemplate::InvestmentOpportunity { .. } => &[
                "Executive Summary",
                "Market Opportunity",
                "Growth Potential",
                "Risk Analysis",
                "Valuation Metrics",
                "Comparable Transactions",
                "Investment Thesis",
            ],
        }
    }

    pub fn visualizations(&self) -> &'static [&'static str] {
        match self {
            ReportTemplate::MarketEntry { .. } => &[
                "Market Size Breakdown",
                "Competitive Positioning Map",
                "Regulatory Complexity Heatmap",
                "Market Growth Forecast",
            ],
            ReportTemplate::CompetitiveIntelligence { .. } => &[
                "Competitive Matrix",
                "Feature Comparison",
                "Pricing Analysis",
                "Market Share Distribution",
            ],
            ReportTemplate::InvestmentOpportunity { .. } => &[
                "Valuation Multiples",
                "Growth Projections",
                "Risk-Return Matrix",
                "Funding Landscape",
            ],
        }
    }

    pub fn default_options(&self) -> ReportOptions {
        match self {
            ReportTemplate::CompetitiveIntelligence { .. } => ReportOptions {
                depth: AnalysisDepth::Expert,
                ..ReportOptions::default()
            },
            _ => ReportOptions::default(),
        }
    }

    pub fn industry(&self) -> &str {
        match self {
            ReportTemplate::MarketEntry { industry, .. }
            | ReportTemplate::CompetitiveIntelligence { industry, .. } => industry,
            ReportTemplate::InvestmentOpportunity { sector, .. } => sector,
        }
    }

    pub fn title(&self) -> String {
        match self {
            ReportTemplate::MarketEntry { industry, market } => {
                format!("{industry} Market Entry Analysis: {market}")
            }
            ReportTemplate::CompetitiveIntelligence { industry, .. } => {
                format!("{industry} Competitive Intelligence")
            }
            ReportTemplate::InvestmentOpportunity { sector, .. } => {
                format!("{sector} Investment Opportunity Assessment")
            }
        }
    }

    fn parameter_lines(&self) -> Vec<String> {
        match self {
            ReportTemplate::MarketEntry { industry, market } => {
                vec![format!("Industry: {industry}"), format!("Market: {market}")]
            }
            ReportTemplate::CompetitiveIntelligence {
                industry,
                competitors,
            } => {
                let competitors = if competitors.is_empty() {
                    "none named".to_string()
                } else {
                    competitors.join(", ")
                };
                vec![
                    format!("Industry: {industry}"),
                    format!("Competitors: {competitors}"),
                ]
            }
            ReportTemplate::InvestmentOpportunity { sector, stage } => vec![
                format!("Sector: {sector}"),
                format!(
                    "Stage focus: {}",
                    stage.map(StageId::name).unwrap_or("all stages")
                ),
            ],
        }
    }
}

pub fn build_report(
    template: &ReportTemplate,
    options: &ReportOptions,
    dataset: &Dataset,
    now: DateTime<Utc>,
) -> String {
    let filters = MarketFilters {
        industry: Selection::parse(template.industry()),
        region: Selection::All,
    };
    let board = Board::from_deals(dataset.deals.iter().cloned());

    let mut output = String::new();
    let _ = writeln!(output, "# {}", template.title());
    let _ = writeln!(
        output,
        "{} generated {} ({:?} depth)",
        template.name(),
        format::format_date(now),
        options.depth
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Parameters");
    for line in template.parameter_lines() {
        let _ = writeln!(output, "- {line}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sections");
    for section in template.sections() {
        let _ = writeln!(output, "- {section}");
    }
    if options.include_predictions {
        let _ = writeln!(output, "- Predictions");
    }
    if options.include_recommendations {
        let _ = writeln!(output, "- Recommendations");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Visualizations");
    for visualization in template.visualizations() {
        let _ = writeln!(output, "- {visualization}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Pipeline");
    let focus = match template {
        ReportTemplate::InvestmentOpportunity { stage, .. } => *stage,
        _ => None,
    };
    if board.total() == 0 {
        let _ = writeln!(output, "No deals in the pipeline.");
    } else {
        for summary in board
            .summaries()
            .iter()
            .filter(|summary| focus.map_or(true, |stage| stage == summary.stage))
        {
            let _ = writeln!(
                output,
                "- {}: {} deals, {} committed (avg progress {:.0}%)",
                summary.stage.name(),
                summary.count,
                format::format_currency(summary.total_amount),
                summary.avg_progress
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Market Trends");
    let trends = filters.trends(&dataset.market_trends);
    if trends.is_empty() {
        let _ = writeln!(output, "No trend data for {}.", template.industry());
    } else {
        for trend in trends {
            let _ = writeln!(
                output,
                "- {} ({}): {:.0}",
                trend.period,
                trend.region.as_deref().unwrap_or("all regions"),
                trend.value
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Competitive Metrics");
    let metrics = filters.metrics(&dataset.competitive_metrics);
    if metrics.is_empty() {
        let _ = writeln!(output, "No competitive metrics for {}.", template.industry());
    } else {
        for metric in metrics {
            let _ = writeln!(output, "- {}: {:.0}", metric.name, metric.value);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Alerts");
    let alerts = market::alert_feed(&dataset.market_alerts, now);
    if alerts.is_empty() {
        let _ = writeln!(output, "No market alerts.");
    } else {
        for line in alerts.iter().take(5) {
            let _ = writeln!(
                output,
                "- [{}] {} ({})",
                line.alert.kind.label(),
                line.alert.title,
                line.age
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertKind, CompetitiveMetric, Deal, DealStatus, MarketAlert, MarketTrend};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset {
            deals: vec![Deal {
                id: "d1".to_string(),
                venture_name: "PayNest".to_string(),
                industry: "Fintech".to_string(),
                amount: 1_500_000.0,
                stage: StageId::DealTerms,
                status: DealStatus::Negotiating,
                progress: 70,
                assigned_to: vec!["Sara".to_string()],
                last_activity: now() - Duration::days(2),
                due_date: None,
            }],
            market_trends: vec![
                MarketTrend {
                    period: "Jan".to_string(),
                    value: 120.0,
                    industry: Some("Fintech".to_string()),
                    region: Some("MENA".to_string()),
                },
                MarketTrend {
                    period: "Jan".to_string(),
                    value: 80.0,
                    industry: Some("Healthtech".to_string()),
                    region: Some("MENA".to_string()),
                },
            ],
            competitive_metrics: vec![CompetitiveMetric {
                name: "Innovation Index".to_string(),
                value: 80.0,
                industry: "Fintech".to_string(),
            }],
            market_alerts: vec![MarketAlert {
                id: "a1".to_string(),
                title: "New regulatory sandbox".to_string(),
                description: String::new(),
                date: now() - Duration::days(2),
                kind: AlertKind::Critical,
            }],
            ..Dataset::default()
        }
    }

    #[test]
    fn templates_carry_their_own_sections() {
        let template = ReportTemplate::CompetitiveIntelligence {
            industry: "Fintech".to_string(),
            competitors: vec![],
        };
        assert_eq!(template.sections().len(), 7);
        assert_eq!(template.sections()[3], "SWOT Analysis");
        assert_eq!(template.default_options().depth, AnalysisDepth::Expert);
    }

    #[test]
    fn report_includes_filtered_market_data() {
        let template = ReportTemplate::MarketEntry {
            industry: "Fintech".to_string(),
            market: "UAE".to_string(),
        };
        let report = build_report(&template, &template.default_options(), &dataset(), now());

        assert!(report.starts_with("# Fintech Market Entry Analysis: UAE\n"));
        assert!(report.contains("- Market: UAE"));
        assert!(report.contains("- Regulatory Complexity Heatmap"));
        assert!(report.contains("- Deal Terms: 1 deals, $1.5M committed (avg progress 70%)"));
        assert!(report.contains("- Jan (MENA): 120"));
        assert!(!report.contains("- Jan (MENA): 80"));
        assert!(report.contains("- Innovation Index: 80"));
        assert!(report.contains("- [Critical] New regulatory sandbox (2d ago)"));
    }

    #[test]
    fn stage_focus_limits_pipeline_lines() {
        let template = ReportTemplate::InvestmentOpportunity {
            sector: "Healthtech".to_string(),
            stage: Some(StageId::Screening),
        };
        let options = ReportOptions {
            include_predictions: false,
            ..ReportOptions::default()
        };
        let report = build_report(&template, &options, &dataset(), now());

        assert!(report.contains("- Screening: 0 deals"));
        assert!(!report.contains("- Deal Terms:"));
        assert!(report.contains("No competitive metrics for Healthtech."));
        assert!(!report.contains("- Predictions"));
    }

    #[test]
    fn empty_dataset_renders_placeholders() {
        let template = ReportTemplate::MarketEntry {
            industry: "Agritech".to_string(),
            market: "Egypt".to_string(),
        };
        let report = build_report(&template, &ReportOptions::default(), &Dataset::default(), now());
        assert!(report.contains("No deals in the pipeline."));
        assert!(report.contains("No trend data for Agritech."));
        assert!(report.contains("No market alerts."));
    }
}
