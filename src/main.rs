use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use venture_desk::config::DeskConfig;
use venture_desk::dataset;
use venture_desk::filter::Selection;
use venture_desk::format;
use venture_desk::market::{self, MarketFilters};
use venture_desk::models::{ProfileRecord, StageId};
use venture_desk::pipeline::{Board, PipelineView};
use venture_desk::profile::{self, Role};
use venture_desk::report::{self, AnalysisDepth, ReportTemplate};
use venture_desk::sessions::{self, SessionLookup, SessionTab};
use venture_desk::trading::{self, InsightPeriod, InvestmentStats, MarketFocus, TradeFilter};

#[derive(Parser)]
#[command(name = "venture-desk")]
#[command(about = "Deal-flow, market and session views over a venture dataset", long_about = None)]
struct Cli {
    /// Dataset JSON (defaults to the configured path)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateKind {
    MarketEntry,
    Competitive,
    Investment,
}

#[derive(Subcommand)]
enum Commands {
    /// Show profile completion and status tier
    Profile {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Role::Founder)]
        role: Role,
    },
    /// Show the pipeline board
    Pipeline {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        stage: String,
        #[arg(long, default_value = "all")]
        industry: String,
        /// Deals listed per stage
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Move a deal to another stage and persist the board
    MoveDeal {
        #[arg(long)]
        deal: String,
        #[arg(long)]
        from: StageId,
        #[arg(long)]
        to: StageId,
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Where to write the updated dataset (defaults to the input)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show market trends, segments and competitive metrics
    Market {
        #[arg(long, default_value = "all")]
        industry: String,
        #[arg(long, default_value = "all")]
        region: String,
    },
    /// Show trading activity, breakdowns and recent trades
    Trades {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        market: String,
        #[arg(long, default_value = "all")]
        industry: String,
        #[arg(long, value_enum, default_value_t = InsightPeriod::Monthly)]
        period: InsightPeriod,
        #[arg(long, value_enum, default_value_t = MarketFocus::AllDeals)]
        focus: MarketFocus,
    },
    /// List sessions for a tab
    Sessions {
        #[arg(long, value_enum, default_value_t = SessionTab::Active)]
        tab: SessionTab,
    },
    /// Show one session
    Session {
        #[arg(long)]
        id: String,
    },
    /// Import deals from a CSV file into the dataset
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Generate a markdown report from a template
    Report {
        #[arg(long, value_enum)]
        template: TemplateKind,
        #[arg(long)]
        industry: String,
        /// Target market (market-entry)
        #[arg(long, default_value = "MENA")]
        market: String,
        /// Competitors to profile (competitive)
        #[arg(long = "competitor")]
        competitors: Vec<String>,
        /// Stage focus (investment)
        #[arg(long)]
        stage: Option<StageId>,
        #[arg(long, value_enum)]
        depth: Option<AnalysisDepth>,
        #[arg(long)]
        no_predictions: bool,
        #[arg(long)]
        no_recommendations: bool,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = DeskConfig::load().context("failed to load configuration")?;
    let dataset_path = cli.dataset.unwrap_or_else(|| config.dataset.clone());

    match cli.command {
        Commands::Profile { file, role } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read profile {}", file.display()))?;
            let record: ProfileRecord = serde_json::from_str(&raw)
                .with_context(|| format!("failed to decode profile {}", file.display()))?;
            let summary = profile::summarize(&record, &config.profile.checklist());

            println!(
                "({}) {} ({}) [{} {:?}]",
                summary.initial,
                summary.display_name,
                summary.title,
                role.label(),
                role.tag_tone()
            );
            if let Some(country) = &summary.country {
                println!("Location: {country}");
            }
            println!(
                "Profile completion: {}% ({:?})",
                summary.completion,
                profile::completion_tone(summary.completion)
            );
            println!("Status: {} Profile", summary.status.label());
        }
        Commands::Pipeline {
            search,
            stage,
            industry,
            limit,
        } => {
            let data = dataset::load(&dataset_path)?;
            let board = Board::from_deals(data.deals);
            let mut view = PipelineView::default();
            view.set_search(&search);
            view.set_stage_filter(&stage);
            view.set_industry_filter(&industry);
            let limit = limit.unwrap_or(config.preview_limit);
            let now = Utc::now();

            for stage in board.view(&view.filter) {
                println!("{} ({})", stage.name, stage.count());
                if stage.deals.is_empty() {
                    println!("  No deals in this stage");
                }
                for deal in stage.deals.iter().take(limit) {
                    println!(
                        "  - {} [{}] {} {} {}% · {} · {}",
                        deal.venture_name,
                        deal.industry,
                        format::format_currency(deal.amount),
                        deal.status.label(),
                        deal.progress,
                        format::format_days_ago(deal.last_activity, now),
                        deal.assigned_to.join(", ")
                    );
                    if let Some(due) = deal.due_date {
                        println!("    Due: {}", format::format_date(due));
                    }
                }
            }
        }
        Commands::MoveDeal {
            deal,
            from,
            to,
            index,
            out,
        } => {
            let mut data = dataset::load(&dataset_path)?;
            let mut board = Board::from_deals(std::mem::take(&mut data.deals));
            let out = out.unwrap_or_else(|| dataset_path.clone());

            let mut persisted = Ok(());
            let event = board.move_deal(&deal, from, to, index, |_, moved| {
                data.deals = moved.clone().into_deals();
                persisted = dataset::save(&out, &data);
            })?;
            persisted?;

            println!(
                "Moved {} from {} to {} at position {}; written to {}.",
                event.deal_id,
                event.from.name(),
                event.to.name(),
                event.index,
                out.display()
            );
        }
        Commands::Market { industry, region } => {
            let data = dataset::load(&dataset_path)?;
            let filters = MarketFilters {
                industry: Selection::parse(&industry),
                region: Selection::parse(&region),
            };

            let now = Utc::now();
            if let Some(summary) = &data.market_summary {
                println!("{}", summary.executive_overview);
                for insight in &summary.key_insights {
                    println!("  * {insight}");
                }
                println!(
                    "Sentiment: {} · Confidence: {} · Updated {}",
                    summary.market_sentiment,
                    summary.confidence_score,
                    summary.freshness(now)
                );
            }

            for card in market::stat_cards(&data.market_stats) {
                println!("{} {}: {} {}", card.icon.glyph(), card.stat.label, card.stat.value, card.stat.unit);
            }

            println!("Trends:");
            for trend in filters.trends(&data.market_trends) {
                println!(
                    "  {} {} {}: {:.0}",
                    trend.period,
                    trend.industry.as_deref().unwrap_or("-"),
                    trend.region.as_deref().unwrap_or("-"),
                    trend.value
                );
            }

            println!("Segments:");
            let segments = filters.segments(&data.market_segments);
            for label in market::share_labels(&segments) {
                println!("  {label}");
            }

            println!("Competitive metrics:");
            for metric in filters.metrics(&data.competitive_metrics) {
                println!("  {} ({}): {:.0}", metric.name, metric.industry, metric.value);
            }

            println!("Alerts:");
            for line in market::alert_feed(&data.market_alerts, now) {
                println!("  [{}] {} ({})", line.alert.kind.label(), line.alert.title, line.age);
            }

            println!("Recent market news:");
            for line in market::news_feed(&data.market_news, now) {
                println!("  {} ({}, {})", line.news.title, line.news.source, line.age);
            }
        }
        Commands::Trades {
            search,
            market,
            industry,
            period,
            focus,
        } => {
            let data = dataset::load(&dataset_path)?;
            let filter = TradeFilter {
                search,
                market: Selection::parse(&market),
                industry: Selection::parse(&industry),
            };
            let trades = filter.apply(&data.trades);
            let now = Utc::now();

            let stats = InvestmentStats::from_deals(&data.deals);
            let [deals_bar, volume_bar, active_bar] = stats.bar_percentages();
            println!("# of deals: {} ({deals_bar}%)", stats.deals_count);
            println!(
                "Total deal volume: {} ({volume_bar}%)",
                format::format_trade_value(stats.total_deal_volume)
            );
            println!(
                "# active deals in pipeline: {} ({active_bar}%)",
                stats.active_deals_in_pipeline
            );

            println!("{} · {}", period.label(), focus.label());
            for breakdown in focus.breakdowns(&trades) {
                println!("{}:", breakdown.title);
                for label in breakdown.share_labels() {
                    println!("  {label}");
                }
            }

            println!("Trading growth:");
            for point in trading::trading_growth(&trades, period) {
                println!(
                    "  {}: {} trades, {}",
                    point.period,
                    point.trades,
                    format::format_trade_value(point.volume)
                );
            }

            println!("Recent trades ({}):", trades.len());
            for trade in &trades {
                println!(
                    "  {} {} {} buyer {} seller {} {}",
                    trade.trade_date_time.format("%Y-%m-%d %H:%M"),
                    trade.trade_type.label(),
                    trade.venture_name,
                    trade.investor_buyer_name,
                    trade.seller_label(),
                    format::format_trade_value(trade.trade_value)
                );
            }

            println!("Recent updates:");
            for line in market::news_feed(&data.market_news, now) {
                println!("  {} ({})", line.news.title, line.age);
            }
        }
        Commands::Sessions { tab } => {
            let data = dataset::load(&dataset_path)?;
            let listed = sessions::sessions_for_tab(&data.sessions, tab);
            println!("{} ({})", tab.label(), listed.len());

            for card in sessions::join(listed, &data.experts, &data.services) {
                let service = card.service.map_or("Unknown service", |service| service.name.as_str());
                let mut line = format!(
                    "  - {} with {} on {} [{}]",
                    service,
                    card.session.client_name,
                    format::format_date(card.session.start_date),
                    card.status_label()
                );
                if let Some(expert) = card.expert {
                    line.push_str(&format!(" · expert {}", expert.name));
                }
                if let Some(progress) = card.progress() {
                    line.push_str(&format!(" · {progress}% complete"));
                }
                println!("{line}");
            }
        }
        Commands::Session { id } => {
            let data = dataset::load(&dataset_path)?;
            match sessions::lookup(&data.sessions, &data.experts, &data.services, &id) {
                SessionLookup::Found(card) => {
                    let session = card.session;
                    println!("Session {} ({})", session.id, card.status_label());
                    if let Some(service) = card.service {
                        println!("Service: {} ({})", service.name, format::format_currency(service.price));
                    }
                    if let Some(expert) = card.expert {
                        println!("Expert: {} {}", expert.name, expert.title);
                    }
                    println!("Client: {}", session.client_name);
                    println!("Starts: {}", format::format_date(session.start_date));
                    println!(
                        "Price: ${:.0} ({})",
                        session.price,
                        if session.is_paid { "Paid" } else { "Unpaid" }
                    );
                    if let Some(progress) = card.progress() {
                        println!("Progress: {progress}%");
                    }
                    if let Some(milestone) = &session.next_milestone {
                        println!("Next milestone: {milestone}");
                    }
                    println!("Open action items: {}", card.open_action_items());
                    for material in &session.materials {
                        println!(
                            "Material: {} ({}, {})",
                            material.name,
                            material.kind,
                            format::format_date(material.upload_date)
                        );
                    }
                    match &session.feedback {
                        Some(feedback) => println!("Feedback: {}/5 \"{}\"", feedback.rating, feedback.comment),
                        None => println!("No feedback has been received for this session yet."),
                    }
                }
                SessionLookup::NotFound => {
                    println!("{}", SessionLookup::NOT_FOUND_TITLE);
                    println!("{}", SessionLookup::NOT_FOUND_MESSAGE);
                }
            }
        }
        Commands::Import { csv } => {
            let mut data = if dataset_path.exists() {
                dataset::load(&dataset_path)?
            } else {
                dataset::Dataset::default()
            };
            let inserted = dataset::import_csv(&mut data, &csv)?;
            dataset::save(&dataset_path, &data)?;
            println!("Inserted {inserted} deals from {}.", csv.display());
        }
        Commands::Report {
            template,
            industry,
            market,
            competitors,
            stage,
            depth,
            no_predictions,
            no_recommendations,
            out,
        } => {
            let data = dataset::load(&dataset_path)?;
            let template = match template {
                TemplateKind::MarketEntry => ReportTemplate::MarketEntry { industry, market },
                TemplateKind::Competitive => ReportTemplate::CompetitiveIntelligence {
                    industry,
                    competitors,
                },
                TemplateKind::Investment => ReportTemplate::InvestmentOpportunity {
                    sector: industry,
                    stage,
                },
            };
            let mut options = template.default_options();
            if let Some(depth) = depth {
                options.depth = depth;
            }
            options.include_predictions &= !no_predictions;
            options.include_recommendations &= !no_recommendations;

            let rendered = report::build_report(&template, &options, &data, Utc::now());
            std::fs::write(&out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("VENTURE_DESK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
