use std::collections::BTreeSet;

use log::debug;

use crate::{
    alarm::{Alarm, AlarmTime, Day},
    error::Result,
    preferences::Preferences,
    store::AlarmStore,
};

/// an alarm being created or edited
///
/// the alarm being edited travels inside the draft, so whoever finishes the
/// edit gets it handed over instead of looking it up somewhere shared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmDraft {
    time: AlarmTime,
    selected: BTreeSet<Day>,
    editing: Option<Alarm>,
}

impl Default for AlarmDraft {
    /// a new alarm starts at the current time with no repeat days
    fn default() -> Self {
        Self {
            time: AlarmTime::now(),
            selected: BTreeSet::new(),
            editing: None,
        }
    }
}

impl AlarmDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// if alarm is set for 07:30 on M and W the draft starts out showing exactly that
    #[must_use]
    pub fn edit(alarm: Alarm) -> Self {
        Self {
            time: alarm.time,
            selected: alarm.days.iter().copied().collect(),
            editing: Some(alarm),
        }
    }

    #[must_use]
    pub const fn time(&self) -> AlarmTime {
        self.time
    }

    pub fn set_time(&mut self, time: AlarmTime) {
        self.time = time;
    }

    /// flips a day on or off, returns whether it is now selected
    pub fn toggle_day(&mut self, day: Day) -> bool {
        if self.selected.remove(&day) {
            false
        } else {
            self.selected.insert(day);
            true
        }
    }

    pub fn set_days(&mut self, days: impl IntoIterator<Item = Day>) {
        self.selected = days.into_iter().collect();
    }

    #[must_use]
    pub fn is_selected(&self, day: Day) -> bool {
        self.selected.contains(&day)
    }

    /// selected days in calendar order
    #[must_use]
    pub fn selected_days(&self) -> Vec<Day> {
        self.selected.iter().copied().collect()
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&Alarm> {
        self.editing.as_ref()
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Alarm"
        } else {
            "Set Alarm"
        }
    }

    #[must_use]
    pub fn build(&self) -> Alarm {
        Alarm::new(self.time, self.selected_days())
    }

    /// writes the draft to `store`
    ///
    /// a new alarm is appended. an edited alarm is replaced in place when its id still
    /// holds the alarm the draft started from, otherwise every alarm equal to the
    /// original is swapped for the new one.
    ///
    /// # Errors
    /// if the store can't be written
    pub fn save<P: Preferences>(self, store: &mut AlarmStore<P>) -> Result<EditingState> {
        let new = self.build();
        let saved = match self.editing {
            None => store.add(new)?,
            Some(old) => {
                // ids get reused, so the id alone doesn't prove it is still the same alarm
                let unchanged = old.id.is_assigned() && store.get(old.id).as_ref() == Some(&old);
                let by_id = if unchanged {
                    store.update_by_id(old.id, new.time, new.days.clone())?
                } else {
                    None
                };
                match by_id {
                    Some(saved) => saved,
                    None => {
                        debug!("alarm {} is gone or changed, replacing by value", old.id);
                        store.update(&old, new)?
                    }
                }
            }
        };
        Ok(EditingState::Done(saved))
    }

    #[must_use]
    pub fn cancel(self) -> EditingState {
        EditingState::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditingState {
    Cancelled,
    Done(Alarm),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;

    fn time(s: &str) -> AlarmTime {
        s.parse().unwrap()
    }

    #[test]
    fn new_draft_has_no_days() {
        let draft = AlarmDraft::new();
        assert!(draft.selected_days().is_empty());
        assert_eq!(draft.title(), "Set Alarm");
        assert!(draft.editing().is_none());
    }

    #[test]
    fn selected_days_come_out_in_calendar_order() {
        let mut draft = AlarmDraft::new();
        assert!(draft.toggle_day(Day::S));
        assert!(draft.toggle_day(Day::M));
        assert!(draft.toggle_day(Day::Su));
        assert!(!draft.toggle_day(Day::S));
        assert_eq!(draft.selected_days(), vec![Day::Su, Day::M]);
    }

    #[test]
    fn edit_starts_from_the_alarm() {
        let alarm = Alarm::new(time("07:30"), vec![Day::W, Day::M]);
        let draft = AlarmDraft::edit(alarm.clone());
        assert_eq!(draft.title(), "Edit Alarm");
        assert_eq!(draft.time(), time("07:30"));
        assert!(draft.is_selected(Day::M) && draft.is_selected(Day::W));
        assert_eq!(draft.editing(), Some(&alarm));
    }

    #[test]
    fn saving_new_draft_appends() {
        let mut store = AlarmStore::new(MemoryPreferences::new());
        let mut draft = AlarmDraft::new();
        draft.set_time(time("06:45"));
        draft.set_days([Day::F]);
        let EditingState::Done(saved) = draft.save(&mut store).unwrap() else {
            panic!("expected a saved alarm");
        };
        assert_eq!(store.list(), vec![saved]);
    }

    #[test]
    fn saving_edit_keeps_position() {
        let mut store = AlarmStore::new(MemoryPreferences::new());
        let first = store.add(Alarm::new(time("06:00"), vec![Day::M])).unwrap();
        store.add(Alarm::new(time("07:00"), vec![Day::Tu])).unwrap();

        let mut draft = AlarmDraft::edit(first.clone());
        draft.set_time(time("06:15"));
        draft.save(&mut store).unwrap();

        let alarms = store.list();
        assert_eq!(alarms[0].time, time("06:15"));
        assert_eq!(alarms[0].id, first.id);
        assert_eq!(alarms.len(), 2);
    }

    #[test]
    fn saving_edit_of_unstored_alarm_replaces_by_value() {
        let mut store = AlarmStore::new(MemoryPreferences::new());
        store.add(Alarm::new(time("06:00"), vec![Day::M])).unwrap();
        store.add(Alarm::new(time("07:00"), vec![Day::Tu])).unwrap();

        // no id, only the definition identifies it
        let mut draft = AlarmDraft::edit(Alarm::new(time("06:00"), vec![Day::M]));
        draft.set_days([Day::M, Day::F]);
        draft.save(&mut store).unwrap();

        let alarms = store.list();
        assert_eq!(alarms.len(), 2);
        assert_eq!(alarms[1], Alarm::new(time("06:00"), vec![Day::M, Day::F]));
    }

    #[test]
    fn stale_edit_leaves_alarm_with_reused_id_alone() {
        let mut store = AlarmStore::new(MemoryPreferences::new());
        store.add(Alarm::new(time("06:00"), vec![Day::M])).unwrap();
        let second = store.add(Alarm::new(time("07:00"), vec![Day::Tu])).unwrap();

        let mut draft = AlarmDraft::edit(second.clone());
        draft.set_time(time("07:15"));

        store.delete_by_id(second.id).unwrap();
        let reused = store.add(Alarm::new(time("08:00"), vec![Day::W])).unwrap();
        assert_eq!(reused.id, second.id);

        draft.save(&mut store).unwrap();

        let alarms = store.list();
        assert_eq!(alarms.len(), 3);
        assert!(alarms
            .iter()
            .any(|a| a.id == reused.id && *a == Alarm::new(time("08:00"), vec![Day::W])));
        assert_eq!(alarms[2], Alarm::new(time("07:15"), vec![Day::Tu]));
    }

    #[test]
    fn cancel_leaves_store_alone() {
        let store = AlarmStore::new(MemoryPreferences::new());
        let draft = AlarmDraft::edit(Alarm::new(time("06:00"), vec![]));
        assert_eq!(draft.cancel(), EditingState::Cancelled);
        assert!(store.list().is_empty());
    }
}
