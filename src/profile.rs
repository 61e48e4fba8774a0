use serde::Serialize;

use crate::models::ProfileRecord;

pub const REQUIRED_FIELDS: [&str; 8] = [
    "fullName",
    "email",
    "phone",
    "linkedinProfile",
    "country",
    "currentOccupation",
    "yearsExperience",
    "industryExpertise",
];

pub const ENHANCEMENT_FIELDS: [&str; 6] = [
    "entrepreneurialExperience",
    "marketExpertise",
    "keySkills",
    "company",
    "companyLinkedin",
    "industryFocus",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ProfileStatus {
    Basic,
    Enhanced,
    Verified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Purple,
    Yellow,
    Blue,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeIcon {
    User,
    Award,
    Shield,
}

impl ProfileStatus {
    pub fn from_enhanced_count(count: usize) -> Self {
        match count {
            5.. => ProfileStatus::Verified,
            3.. => ProfileStatus::Enhanced,
            _ => ProfileStatus::Basic,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileStatus::Basic => "Basic",
            ProfileStatus::Enhanced => "Enhanced",
            ProfileStatus::Verified => "Verified",
        }
    }

    pub fn badge(self) -> (Tone, BadgeIcon) {
        match self {
            ProfileStatus::Basic => (Tone::Yellow, BadgeIcon::User),
            ProfileStatus::Enhanced => (Tone::Blue, BadgeIcon::Award),
            ProfileStatus::Verified => (Tone::Green, BadgeIcon::Shield),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Founder,
    Investor,
    Expert,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Founder => "Founder",
            Role::Investor => "Investor",
            Role::Expert => "Expert",
        }
    }

    pub fn tag_tone(self) -> Tone {
        match self {
            Role::Founder => Tone::Purple,
            Role::Investor => Tone::Blue,
            Role::Expert => Tone::Green,
        }
    }
}

/// Field lists the evaluator checks a profile against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checklist {
    pub required: Vec<String>,
    pub enhancement: Vec<String>,
}

impl Default for Checklist {
    fn default() -> Self {
        Self {
            required: REQUIRED_FIELDS.iter().map(|field| field.to_string()).collect(),
            enhancement: ENHANCEMENT_FIELDS.iter().map(|field| field.to_string()).collect(),
        }
    }
}

fn filled_count(record: &ProfileRecord, fields: &[String]) -> usize {
    fields
        .iter()
        .filter(|field| record.text(field).is_some())
        .count()
}

pub fn completion_percentage(record: &ProfileRecord, required: &[String]) -> u8 {
    if required.is_empty() {
        return 0;
    }
    let filled = filled_count(record, required) as f64;
    (100.0 * filled / required.len() as f64).round() as u8
}

pub fn status(record: &ProfileRecord, enhancement: &[String]) -> ProfileStatus {
    ProfileStatus::from_enhanced_count(filled_count(record, enhancement))
}

pub fn completion_tone(percentage: u8) -> Tone {
    match percentage {
        0..=49 => Tone::Red,
        50..=79 => Tone::Yellow,
        _ => Tone::Green,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub display_name: String,
    pub title: String,
    pub initial: char,
    pub country: Option<String>,
    pub completion: u8,
    pub status: ProfileStatus,
}

pub fn summarize(record: &ProfileRecord, checklist: &Checklist) -> ProfileSummary {
    let name = record.text("fullName");
    ProfileSummary {
        display_name: name.unwrap_or("Your Name").to_string(),
        title: record
            .text("currentOccupation")
            .unwrap_or("Your Title")
            .to_string(),
        initial: name
            .and_then(|name| name.trim().chars().next())
            .map(|first| first.to_uppercase().next().unwrap_or(first))
            .unwrap_or('?'),
        country: record.text("country").map(str::to_string),
        completion: completion_percentage(record, &checklist.required),
        status: status(record, &checklist.enhancement),
    }
}
