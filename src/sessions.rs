use serde::Serialize;

use crate::filter;
use crate::models::{Expert, Service, Session, SessionStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SessionTab {
    #[default]
    Active,
    History,
    Upcoming,
}

impl SessionTab {
    pub fn status(self) -> SessionStatus {
        match self {
            SessionTab::Active => SessionStatus::InProgress,
            SessionTab::History => SessionStatus::Completed,
            SessionTab::Upcoming => SessionStatus::Scheduled,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionTab::Active => "Active sessions",
            SessionTab::History => "Session history",
            SessionTab::Upcoming => "Upcoming appointments",
        }
    }
}

pub fn sessions_for_tab(sessions: &[Session], tab: SessionTab) -> Vec<&Session> {
    let status = tab.status();
    sessions
        .iter()
        .filter(|session| session.status == status)
        .collect()
}

/// A session joined with its expert and service, when those resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCard<'a> {
    pub session: &'a Session,
    pub expert: Option<&'a Expert>,
    pub service: Option<&'a Service>,
}

impl SessionCard<'_> {
    pub fn status_label(&self) -> &'static str {
        self.session.status.label()
    }

    pub fn progress(&self) -> Option<u8> {
        (self.session.status == SessionStatus::InProgress).then_some(self.session.progress)
    }

    pub fn open_action_items(&self) -> usize {
        self.session
            .action_items
            .iter()
            .filter(|item| !item.completed)
            .count()
    }
}

pub fn join<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    experts: &'a [Expert],
    services: &'a [Service],
) -> Vec<SessionCard<'a>> {
    sessions
        .into_iter()
        .map(|session| SessionCard {
            session,
            expert: filter::find_by_id(experts, &session.expert_id),
            service: filter::find_by_id(services, &session.service_id),
        })
        .collect()
}

pub enum SessionLookup<'a> {
    Found(SessionCard<'a>),
    NotFound,
}

impl SessionLookup<'_> {
    pub const NOT_FOUND_TITLE: &'static str = "Session Not Found";
    pub const NOT_FOUND_MESSAGE: &'static str =
        "The session you're looking for could not be found.";
}

pub fn lookup<'a>(
    sessions: &'a [Session],
    experts: &'a [Expert],
    services: &'a [Service],
    session_id: &str,
) -> SessionLookup<'a> {
    match filter::find_by_id(sessions, session_id) {
        Some(session) => SessionLookup::Found(SessionCard {
            session,
            expert: filter::find_by_id(experts, &session.expert_id),
            service: filter::find_by_id(services, &session.service_id),
        }),
        None => SessionLookup::NotFound,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailTab {
    #[default]
    Overview,
    Materials,
    Communication,
    Feedback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum SessionAction {
    SendMessage { session_id: String, text: String },
    UpdateNotes { session_id: String, text: String },
    SubmitFeedback { session_id: String, rating: u8, comment: String },
}

const DEFAULT_RATING: u8 = 5;

/// Drafts and tab selection of one open session detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDetailState {
    session_id: String,
    pub active_tab: DetailTab,
    pub message: String,
    pub note: String,
    rating: u8,
    pub comment: String,
}

impl SessionDetailState {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            active_tab: DetailTab::default(),
            message: String::new(),
            note: String::new(),
            rating: DEFAULT_RATING,
            comment: String::new(),
        }
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn set_rating(&mut self, rating: u8) {
        self.rating = rating.clamp(1, 5);
    }

    pub fn send_message(&mut self) -> Option<SessionAction> {
        let text = non_blank(&self.message)?;
        let action = SessionAction::SendMessage {
            session_id: self.session_id.clone(),
            text,
        };
        self.message.clear();
        tracing::info!(session = %self.session_id, "message sent");
        Some(action)
    }

    /// The note draft stays in place after saving.
    pub fn update_notes(&mut self) -> Option<SessionAction> {
        let text = non_blank(&self.note)?;
        tracing::info!(session = %self.session_id, "notes updated");
        Some(SessionAction::UpdateNotes {
            session_id: self.session_id.clone(),
            text,
        })
    }

    pub fn submit_feedback(&mut self) -> Option<SessionAction> {
        let comment = non_blank(&self.comment)?;
        let action = SessionAction::SubmitFeedback {
            session_id: self.session_id.clone(),
            rating: self.rating,
            comment,
        };
        self.comment.clear();
        tracing::info!(session = %self.session_id, rating = self.rating, "feedback submitted");
        Some(action)
    }
}

fn non_blank(draft: &str) -> Option<String> {
    let trimmed = draft.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
