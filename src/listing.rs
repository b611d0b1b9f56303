//! Text shown by the front end for the alarm list and the stored flags.

use std::fmt::Write;

use crate::{alarm::Alarm, alarm_edit::EditingState, state::StateEntry};

pub const NO_ALARMS: &str = "No alarms set yet";
pub const NO_STATES: &str = "No alarm states stored";

/// one card per alarm, or [`NO_ALARMS`] for an empty list
#[must_use]
pub fn render_alarms(
    alarms: &[Alarm],
    enabled: impl Fn(&Alarm) -> bool,
    time_format: &str,
) -> String {
    if alarms.is_empty() {
        return format!("{NO_ALARMS}\n");
    }
    let mut out = String::new();
    for alarm in alarms {
        let state = if enabled(alarm) { "on" } else { "off" };
        // writing to a String can't fail
        let _ = writeln!(
            out,
            "[{}] Alarm: {} ({state})",
            alarm.id,
            alarm.time.format(time_format).trim()
        );
        let _ = writeln!(out, "    Days: {}", alarm.days_label());
    }
    out
}

#[must_use]
pub fn render_states(entries: &[StateEntry]) -> String {
    if entries.is_empty() {
        return format!("{NO_STATES}\n");
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{}: {}{}",
            entry.time,
            if entry.enabled { "on" } else { "off" },
            if entry.orphaned { " (no alarm)" } else { "" }
        );
    }
    out
}

#[must_use]
pub fn render_saved(title: &str, state: &EditingState) -> String {
    match state {
        EditingState::Done(alarm) => format!("{title}: [{}] {alarm}", alarm.id),
        EditingState::Cancelled => format!("{title}: cancelled"),
    }
}
