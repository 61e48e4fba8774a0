//! Derived views for the venture deal-flow desk: profile completion, record
//! filtering, the investment pipeline board, market intelligence, secondary
//! trading, expert sessions and report rendering, all computed from an in-memory dataset.

pub mod config;
pub mod dataset;
pub mod filter;
pub mod format;
pub mod market;
pub mod models;
pub mod nav;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod sessions;
pub mod trading;
