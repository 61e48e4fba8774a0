use crate::models::{
    CompetitiveMetric, Deal, Expert, MarketAlert, MarketSegment, MarketTrend, Service, Session,
    Trade,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Industry,
    Region,
    Period,
    Stage,
    Status,
    Buyer,
    Seller,
}

/// A record that exposes some of its fields to predicates.
pub trait Record {
    fn field(&self, field: Field) -> Option<&str>;
}

/// A dropdown value where `all` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(raw.to_string())
        }
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value.is_some_and(|value| value.eq_ignore_ascii_case(wanted)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals(Field, Selection),
    /// Case-insensitive substring match against any of the fields.
    Search(Vec<Field>, String),
}

impl Predicate {
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::Equals(field, selection) => selection.matches(record.field(*field)),
            Predicate::Search(fields, needle) => {
                if needle.is_empty() {
                    return true;
                }
                let needle = needle.to_lowercase();
                fields.iter().any(|field| {
                    record
                        .field(*field)
                        .is_some_and(|value| value.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

pub fn matches_all<R: Record + ?Sized>(record: &R, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|predicate| predicate.matches(record))
}

/// Keeps the records satisfying every predicate, in their original order.
pub fn apply<'a, R, I>(records: I, predicates: &[Predicate]) -> Vec<&'a R>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter(|record| matches_all(*record, predicates))
        .collect()
}

pub fn find_by_id<'a, R, I>(records: I, id: &str) -> Option<&'a R>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .find(|record| record.field(Field::Id) == Some(id))
}

impl Record for Deal {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => Some(self.id.as_str()),
            Field::Name => Some(self.venture_name.as_str()),
            Field::Industry => Some(self.industry.as_str()),
            Field::Stage => Some(self.stage.as_str()),
            Field::Status => Some(self.status.label()),
            Field::Region | Field::Period | Field::Buyer | Field::Seller => None,
        }
    }
}

impl Record for Session {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => Some(self.id.as_str()),
            Field::Name => Some(self.client_name.as_str()),
            Field::Status => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Record for Expert {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => Some(self.id.as_str()),
            Field::Name => Some(self.name.as_str()),
            _ => None,
        }
    }
}

impl Record for Service {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => Some(self.id.as_str()),
            Field::Name => Some(self.name.as_str()),
            _ => None,
        }
    }
}

impl Record for MarketTrend {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Period => Some(self.period.as_str()),
            Field::Industry => self.industry.as_deref(),
            Field::Region => self.region.as_deref(),
            _ => None,
        }
    }
}

impl Record for MarketSegment {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(self.name.as_str()),
            _ => None,
        }
    }
}

impl Record for CompetitiveMetric {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(self.name.as_str()),
            Field::Industry => Some(self.industry.as_str()),
            _ => None,
        }
    }
}

impl Record for MarketAlert {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => Some(self.id.as_str()),
            Field::Name => Some(self.title.as_str()),
            _ => None,
        }
    }
}

impl Record for Trade {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => Some(self.id.as_str()),
            Field::Name => Some(self.venture_name.as_str()),
            Field::Industry => Some(self.industry.as_str()),
            Field::Region => Some(self.market.as_str()),
            Field::Status => Some(self.trade_type.label()),
            Field::Buyer => Some(self.investor_buyer_name.as_str()),
            Field::Seller => self.investor_seller_name.as_deref(),
            Field::Period | Field::Stage => None,
        }
    }
}
