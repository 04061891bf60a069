//! Domain model for the BrainAi dashboard: owner-scoped notes, events and
//! conversations, the account records around them, and the pure logic that
//! sits on top (search filtering, the recent-activity feed, avatar checks).
//!
//! Nothing here knows about HTTP or SQL. Storage backends implement
//! [`store::RecordStore`] and [`account::AccountStore`].

pub mod account;
pub mod activity;
pub mod avatar;
pub mod error;
pub mod filter;
pub mod record;
pub mod store;

pub use error::{Error, Result};
