use std::collections::HashSet;

use serde::Serialize;

use crate::filter::{self, Field, Predicate, Selection};
use crate::models::{Deal, PipelineStage, StageId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("deal '{0}' is not on the board")]
    DealNotFound(String),
    #[error("deal '{deal_id}' is in stage {actual}, not {expected}")]
    WrongSourceStage {
        deal_id: String,
        expected: StageId,
        actual: StageId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEvent {
    pub deal_id: String,
    pub from: StageId,
    pub to: StageId,
    pub index: usize,
}

/// Deals partitioned into the four stages, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    stages: Vec<PipelineStage>,
}

impl Board {
    pub fn from_deals(deals: impl IntoIterator<Item = Deal>) -> Self {
        let mut stages: Vec<PipelineStage> =
            StageId::ALL.into_iter().map(PipelineStage::empty).collect();
        for deal in deals {
            stages[deal.stage.position()].deals.push(deal);
        }
        Self { stages }
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn stage(&self, id: StageId) -> &PipelineStage {
        &self.stages[id.position()]
    }

    pub fn total(&self) -> usize {
        self.stages.iter().map(PipelineStage::count).sum()
    }

    pub fn deals(&self) -> impl Iterator<Item = &Deal> {
        self.stages.iter().flat_map(|stage| stage.deals.iter())
    }

    pub fn find_deal(&self, deal_id: &str) -> Option<&Deal> {
        filter::find_by_id(self.deals(), deal_id)
    }

    pub fn stage_of(&self, deal_id: &str) -> Option<StageId> {
        self.stages
            .iter()
            .find(|stage| filter::find_by_id(&stage.deals, deal_id).is_some())
            .map(|stage| stage.id)
    }

    /// Flattens back into a deal list, stage by stage.
    pub fn into_deals(self) -> Vec<Deal> {
        self.stages
            .into_iter()
            .flat_map(|stage| stage.deals)
            .collect()
    }

    /// Moves a deal out of `from` and into `to` at `index` (clamped to the
    /// destination length), then hands the result to `on_drop`.
    pub fn move_deal<F>(
        &mut self,
        deal_id: &str,
        from: StageId,
        to: StageId,
        index: usize,
        on_drop: F,
    ) -> Result<MoveEvent, MoveError>
    where
        F: FnOnce(&MoveEvent, &Board),
    {
        let source = &mut self.stages[from.position()].deals;
        let Some(position) = source.iter().position(|deal| deal.id == deal_id) else {
            return Err(match self.stage_of(deal_id) {
                Some(actual) => MoveError::WrongSourceStage {
                    deal_id: deal_id.to_string(),
                    expected: from,
                    actual,
                },
                None => MoveError::DealNotFound(deal_id.to_string()),
            });
        };

        let mut deal = source.remove(position);
        deal.stage = to;

        let destination = &mut self.stages[to.position()].deals;
        let index = index.min(destination.len());
        destination.insert(index, deal);

        let event = MoveEvent {
            deal_id: deal_id.to_string(),
            from,
            to,
            index,
        };
        tracing::info!(deal = %event.deal_id, %from, %to, index, "deal moved");
        on_drop(&event, &*self);
        Ok(event)
    }

    /// Every deal sits in exactly one stage, and in the stage it names.
    pub fn is_partitioned(&self) -> bool {
        let mut seen = HashSet::new();
        self.stages.iter().all(|stage| {
            stage
                .deals
                .iter()
                .all(|deal| deal.stage == stage.id && seen.insert(deal.id.as_str()))
        })
    }

    pub fn view(&self, board_filter: &BoardFilter) -> Vec<StageView<'_>> {
        let predicates = board_filter.deal_predicates();
        self.stages
            .iter()
            .filter(|stage| board_filter.stage.matches(Some(stage.id.as_str())))
            .map(|stage| StageView {
                id: stage.id,
                name: stage.name,
                deals: filter::apply(&stage.deals, &predicates),
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<StageSummary> {
        self.stages
            .iter()
            .map(|stage| {
                let count = stage.count();
                let total_amount: f64 = stage.deals.iter().map(|deal| deal.amount).sum();
                let progress: u32 = stage.deals.iter().map(|deal| u32::from(deal.progress)).sum();
                StageSummary {
                    stage: stage.id,
                    count,
                    total_amount,
                    avg_progress: if count == 0 {
                        0.0
                    } else {
                        f64::from(progress) / count as f64
                    },
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    pub search: String,
    pub stage: Selection,
    pub industry: Selection,
}

impl BoardFilter {
    fn deal_predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::Search(vec![Field::Name, Field::Industry], self.search.clone()),
            Predicate::Equals(Field::Industry, self.industry.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageView<'a> {
    pub id: StageId,
    pub name: &'static str,
    pub deals: Vec<&'a Deal>,
}

impl StageView<'_> {
    pub fn count(&self) -> usize {
        self.deals.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub stage: StageId,
    pub count: usize,
    pub total_amount: f64,
    pub avg_progress: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineTab {
    #[default]
    Overview,
    DueDiligence,
    DealTerms,
    Closing,
}

impl PipelineTab {
    pub fn for_stage(stage: StageId) -> Self {
        match stage {
            StageId::Screening => PipelineTab::Overview,
            StageId::DueDiligence => PipelineTab::DueDiligence,
            StageId::DealTerms => PipelineTab::DealTerms,
            StageId::Closing => PipelineTab::Closing,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PipelineTab::Overview => "Pipeline Overview",
            PipelineTab::DueDiligence => "Due Diligence",
            PipelineTab::DealTerms => "Deal Terms",
            PipelineTab::Closing => "Deal Closing",
        }
    }
}

/// Selection state of the investment pipeline screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineView {
    pub active_tab: PipelineTab,
    pub selected_deal: Option<String>,
    pub filter: BoardFilter,
}

impl PipelineView {
    pub fn select_deal(&mut self, board: &Board, deal_id: &str) {
        self.selected_deal = Some(deal_id.to_string());
        self.active_tab = board
            .stage_of(deal_id)
            .map(PipelineTab::for_stage)
            .unwrap_or_default();
    }

    pub fn back_to_overview(&mut self) {
        self.active_tab = PipelineTab::Overview;
    }

    pub fn selected<'a>(&self, board: &'a Board) -> Option<&'a Deal> {
        self.selected_deal
            .as_deref()
            .and_then(|deal_id| board.find_deal(deal_id))
    }

    pub fn set_search(&mut self, query: &str) {
        self.filter.search = query.to_string();
    }

    pub fn set_stage_filter(&mut self, raw: &str) {
        self.filter.stage = Selection::parse(raw);
    }

    pub fn set_industry_filter(&mut self, raw: &str) {
        self.filter.industry = Selection::parse(raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DealStatus;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn deal(id: &str, name: &str, industry: &str, stage: StageId) -> Deal {
        Deal {
            id: id.to_string(),
            venture_name: name.to_string(),
            industry: industry.to_string(),
            amount: 500_000.0,
            stage,
            status: DealStatus::New,
            progress: 40,
            assigned_to: vec!["Sara".to_string()],
            last_activity: Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap(),
            due_date: None,
        }
    }

    fn sample_board() -> Board {
        Board::from_deals(vec![
            deal("d1", "PayNest", "Fintech", StageId::Screening),
            deal("d2", "MediLink", "Healthtech", StageId::DueDiligence),
            deal("d3", "CartWave", "E-commerce", StageId::Screening),
            deal("d4", "LendLoop", "Fintech", StageId::Closing),
        ])
    }

    fn ids(stage: &PipelineStage) -> Vec<&str> {
        stage.deals.iter().map(|deal| deal.id.as_str()).collect()
    }

    #[test]
    fn board_partitions_deals_in_stage_order() {
        let board = sample_board();
        let names: Vec<&str> = board.stages().iter().map(|stage| stage.name).collect();
        assert_eq!(names, vec!["Screening", "Due Diligence", "Deal Terms", "Closing"]);
        assert_eq!(ids(board.stage(StageId::Screening)), vec!["d1", "d3"]);
        assert_eq!(board.stage(StageId::DealTerms).count(), 0);
        assert_eq!(board.total(), 4);
        assert!(board.is_partitioned());
    }

    #[test]
    fn move_reassigns_stage_and_inserts_at_index() {
        let mut board = sample_board();
        let mut dropped = Vec::new();

        let event = board
            .move_deal("d3", StageId::Screening, StageId::Closing, 0, |event, board| {
                dropped.push((event.clone(), board.total()));
            })
            .unwrap();

        assert_eq!(event.index, 0);
        assert_eq!(ids(board.stage(StageId::Screening)), vec!["d1"]);
        assert_eq!(ids(board.stage(StageId::Closing)), vec!["d3", "d4"]);
        assert_eq!(board.find_deal("d3").map(|deal| deal.stage), Some(StageId::Closing));
        assert_eq!(dropped, vec![(event, 4)]);
        assert!(board.is_partitioned());
    }

    #[test]
    fn move_clamps_index_to_destination_length() {
        let mut board = sample_board();
        let event = board
            .move_deal("d1", StageId::Screening, StageId::DealTerms, 42, |_, _| {})
            .unwrap();
        assert_eq!(event.index, 0);
        assert_eq!(ids(board.stage(StageId::DealTerms)), vec!["d1"]);
    }

    #[test]
    fn move_within_a_stage_reorders() {
        let mut board = sample_board();
        board
            .move_deal("d1", StageId::Screening, StageId::Screening, 1, |_, _| {})
            .unwrap();
        assert_eq!(ids(board.stage(StageId::Screening)), vec!["d3", "d1"]);
        assert!(board.is_partitioned());
    }

    #[test]
    fn failed_moves_leave_the_board_untouched() {
        let mut board = sample_board();
        let before = board.clone();
        let mut calls = 0;

        let missing = board.move_deal("d9", StageId::Screening, StageId::Closing, 0, |_, _| {
            calls += 1;
        });
        assert_eq!(missing, Err(MoveError::DealNotFound("d9".to_string())));

        let wrong = board.move_deal("d2", StageId::Screening, StageId::Closing, 0, |_, _| {
            calls += 1;
        });
        assert_eq!(
            wrong,
            Err(MoveError::WrongSourceStage {
                deal_id: "d2".to_string(),
                expected: StageId::Screening,
                actual: StageId::DueDiligence,
            })
        );

        assert_eq!(calls, 0);
        assert_eq!(board, before);
    }

    #[test]
    fn view_applies_stage_search_and_industry_filters() {
        let board = sample_board();

        let all = board.view(&BoardFilter::default());
        let counts: Vec<usize> = all.iter().map(StageView::count).collect();
        assert_eq!(counts, vec![2, 1, 0, 1]);

        let fintech = board.view(&BoardFilter {
            industry: Selection::parse("fintech"),
            ..BoardFilter::default()
        });
        let counts: Vec<usize> = fintech.iter().map(StageView::count).collect();
        assert_eq!(counts, vec![1, 0, 0, 1]);

        let screening_search = board.view(&BoardFilter {
            search: "WAVE".to_string(),
            stage: Selection::parse("screening"),
            ..BoardFilter::default()
        });
        assert_eq!(screening_search.len(), 1);
        assert_eq!(screening_search[0].deals[0].id, "d3");
    }

    #[test]
    fn summaries_total_amounts_and_progress() {
        let board = sample_board();
        let summaries = board.summaries();
        assert_eq!(summaries[0].count, 2);
        assert!((summaries[0].total_amount - 1_000_000.0).abs() < f64::EPSILON);
        assert!((summaries[0].avg_progress - 40.0).abs() < f64::EPSILON);
        assert_eq!(summaries[2].avg_progress, 0.0);
    }

    #[test]
    fn selecting_a_deal_switches_to_its_stage_tab() {
        let board = sample_board();
        let mut view = PipelineView::default();

        view.select_deal(&board, "d4");
        assert_eq!(view.active_tab, PipelineTab::Closing);
        assert_eq!(view.selected(&board).map(|deal| deal.venture_name.as_str()), Some("LendLoop"));

        view.select_deal(&board, "d1");
        assert_eq!(view.active_tab, PipelineTab::Overview);

        view.select_deal(&board, "d2");
        view.back_to_overview();
        assert_eq!(view.active_tab, PipelineTab::Overview);

        view.select_deal(&board, "missing");
        assert_eq!(view.active_tab, PipelineTab::Overview);
        assert_eq!(view.selected(&board), None);
    }

    #[test]
    fn view_setters_drive_the_board_filter() {
        let board = sample_board();
        let mut view = PipelineView::default();
        view.set_search("pay");
        view.set_stage_filter("ALL");
        view.set_industry_filter("Fintech");

        assert_eq!(view.filter.stage, Selection::All);
        let stages = board.view(&view.filter);
        let matched: Vec<&str> = stages
            .iter()
            .flat_map(|stage| stage.deals.iter().map(|deal| deal.id.as_str()))
            .collect();
        assert_eq!(matched, vec!["d1"]);

        view.set_stage_filter("closing");
        assert_eq!(board.view(&view.filter).len(), 1);
    }

    #[test]
    fn tab_labels_follow_stage_order() {
        let labels: Vec<&str> = StageId::ALL
            .into_iter()
            .map(|stage| PipelineTab::for_stage(stage).label())
            .collect();
        assert_eq!(
            labels,
            vec!["Pipeline Overview", "Due Diligence", "Deal Terms", "Deal Closing"]
        );
    }

    proptest! {
        #[test]
        fn moves_preserve_the_partition(
            moves in proptest::collection::vec((0..6usize, 0..4usize, 0..4usize, 0..8usize), 0..30)
        ) {
            let mut board = Board::from_deals(
                (0..6).map(|n| deal(&format!("d{n}"), "Venture", "Fintech", StageId::ALL[n % 4])),
            );

            for (deal_index, from, to, index) in moves {
                let _ = board.move_deal(
                    &format!("d{deal_index}"),
                    StageId::ALL[from],
                    StageId::ALL[to],
                    index,
                    |_, _| {},
                );
                prop_assert_eq!(board.total(), 6);
                prop_assert!(board.is_partitioned());
            }
        }
    }
}
