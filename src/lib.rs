#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

//! A list of alarms kept in local key-value storage.
//!
//! [`AlarmStore`] holds the alarm list itself and [`AlarmStateStore`] holds the
//! enabled flag of each alarm, keyed by the alarm's time. Both sit on top of a
//! [`Preferences`] namespace.

pub mod alarm;
pub mod config;
pub mod error;
pub mod listing;
pub mod preferences;
pub mod state;
pub mod store;

/// creating and editing alarms
pub mod alarm_edit;

pub use alarm::{Alarm, AlarmId, AlarmTime, Day};
pub use alarm_edit::{AlarmDraft, EditingState};
pub use error::{Error, Result};
pub use preferences::{FilePreferences, MemoryPreferences, Preferences, Value};
pub use state::{state_entries, AlarmStateStore, StateEntry};
pub use store::AlarmStore;
