use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use log::{debug, warn};

use crate::{
    alarm::Alarm,
    error::Result,
    preferences::{FilePreferences, Preferences, Value},
};

pub const STATES_NAMESPACE: &str = "alarm_states";

/// enabled/disabled flags, one entry per alarm time
///
/// the key is only the `HH:MM` time, so alarms sharing a time share a flag.
/// entries are never removed, deleting an alarm leaves its flag behind.
#[derive(Debug)]
pub struct AlarmStateStore<P> {
    prefs: P,
}

impl AlarmStateStore<FilePreferences> {
    #[must_use]
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self::new(FilePreferences::open(root, STATES_NAMESPACE))
    }
}

impl<P: Preferences> AlarmStateStore<P> {
    pub const fn new(prefs: P) -> Self {
        Self { prefs }
    }

    pub fn into_inner(self) -> P {
        self.prefs
    }

    /// alarms are enabled until explicitly disabled
    pub fn get(&self, alarm: &Alarm) -> bool {
        let key = alarm.state_key();
        match self.prefs.get_bool(&key) {
            Ok(flag) => flag.unwrap_or(true),
            Err(e) => {
                warn!("couldn't read state of {key}, assuming enabled: {e}");
                true
            }
        }
    }

    /// # Errors
    /// if the flag can't be written
    pub fn set(&mut self, alarm: &Alarm, enabled: bool) -> Result<()> {
        let key = alarm.state_key();
        debug!("setting {key} enabled={enabled}");
        self.prefs.put(&key, Value::Bool(enabled))
    }

    /// every stored flag by time, including ones no alarm refers to anymore
    pub fn entries(&self) -> BTreeMap<String, bool> {
        let keys = self.prefs.keys().unwrap_or_else(|e| {
            warn!("couldn't list alarm states: {e}");
            vec![]
        });
        keys.into_iter()
            .filter_map(|key| match self.prefs.get_bool(&key) {
                Ok(Some(flag)) => Some((key, flag)),
                _ => None,
            })
            .collect()
    }
}

/// one stored flag, and whether any alarm still uses it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    pub time: String,
    pub enabled: bool,
    pub orphaned: bool,
}

/// pairs stored flags with the current alarm list, marking flags no alarm refers to
#[must_use]
pub fn state_entries(alarms: &[Alarm], entries: BTreeMap<String, bool>) -> Vec<StateEntry> {
    let in_use: BTreeSet<String> = alarms.iter().map(Alarm::state_key).collect();
    entries
        .into_iter()
        .map(|(time, enabled)| StateEntry {
            orphaned: !in_use.contains(&time),
            time,
            enabled,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{alarm::Day, preferences::MemoryPreferences};

    #[test]
    fn non_boolean_entry_reads_as_enabled() {
        let mut prefs = MemoryPreferences::new();
        prefs.put("07:30", "nope".into()).unwrap();
        let store = AlarmStateStore::new(prefs);
        let alarm = Alarm::new("07:30".parse().unwrap(), vec![Day::M]);
        assert!(store.get(&alarm));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn flags_without_alarm_are_orphaned() {
        let alarms = vec![Alarm::new("07:30".parse().unwrap(), vec![Day::M])];
        let entries = [("06:00".to_string(), false), ("07:30".to_string(), true)]
            .into_iter()
            .collect();
        assert_eq!(
            state_entries(&alarms, entries),
            vec![
                StateEntry {
                    time: "06:00".to_string(),
                    enabled: false,
                    orphaned: true,
                },
                StateEntry {
                    time: "07:30".to_string(),
                    enabled: true,
                    orphaned: false,
                },
            ]
        );
    }

    #[test]
    fn set_overwrites() {
        let mut store = AlarmStateStore::new(MemoryPreferences::new());
        let alarm = Alarm::new("22:15".parse().unwrap(), vec![]);
        store.set(&alarm, false).unwrap();
        store.set(&alarm, true).unwrap();
        assert!(store.get(&alarm));
        assert_eq!(store.entries().get("22:15"), Some(&true));
    }
}
