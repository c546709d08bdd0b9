//! Core types and engines for the doorlist guest check-in tracker.
//!
//! No HTTP or database code lives here. The filter, transition and
//! aggregation engines are pure functions over explicit inputs; storage is
//! reached only through [`store::RosterStore`], and [`roster`] composes the
//! two into the operations door staff perform.

pub mod error;
pub mod guest;
pub mod host;
pub mod query;
pub mod roster;
pub mod stats;
pub mod store;
pub mod transition;

pub use error::{Error, Result};
