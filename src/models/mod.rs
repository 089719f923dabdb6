//! Core data models returned by the match service.

mod league;
mod live_match;
mod summoner;

pub use league::*;
pub use live_match::*;
pub use summoner::*;
