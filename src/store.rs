use std::{collections::HashSet, path::Path};

use log::{debug, warn};

use crate::{
    alarm::{Alarm, AlarmId, AlarmTime, Day},
    error::{Error, Result},
    preferences::{FilePreferences, Preferences},
};

pub const ALARMS_NAMESPACE: &str = "alarms";
pub const ALARMS_KEY: &str = "alarms";

/// the ordered alarm list, kept as a single json blob under one key
///
/// every operation reads the blob, changes it in memory and writes all of it back.
/// nothing is cached between calls.
#[derive(Debug)]
pub struct AlarmStore<P> {
    prefs: P,
}

impl AlarmStore<FilePreferences> {
    #[must_use]
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self::new(FilePreferences::open(root, ALARMS_NAMESPACE))
    }
}

impl<P: Preferences> AlarmStore<P> {
    pub const fn new(prefs: P) -> Self {
        Self { prefs }
    }

    pub fn into_inner(self) -> P {
        self.prefs
    }

    /// all alarms in stored order
    ///
    /// a missing or unreadable blob is an empty list, never an error
    pub fn list(&self) -> Vec<Alarm> {
        let blob = match self.prefs.get_string(ALARMS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return vec![],
            Err(e) => {
                warn!("couldn't read alarms, treating as empty: {e}");
                return vec![];
            }
        };
        let mut alarms: Vec<Alarm> = serde_json::from_str(&blob).unwrap_or_else(|e| {
            warn!("discarding unparseable alarm list: {e}");
            vec![]
        });
        if assign_ids(&mut alarms).is_none() {
            warn!("discarding alarm list, its ids overflow");
            return vec![];
        }
        alarms
    }

    #[must_use]
    pub fn get(&self, id: AlarmId) -> Option<Alarm> {
        self.list().into_iter().find(|alarm| alarm.id == id)
    }

    /// appends `alarm` without checking for duplicates, returns it with its new id
    ///
    /// # Errors
    /// if the list can't be written back
    pub fn add(&mut self, mut alarm: Alarm) -> Result<Alarm> {
        let mut alarms = self.list();
        alarm.id = next_id(&alarms).ok_or(Error::IdsExhausted)?;
        debug!("adding alarm {} ({alarm})", alarm.id);
        alarms.push(alarm.clone());
        self.save(&alarms)?;
        Ok(alarm)
    }

    /// removes every alarm equal to `old` then appends `new` at the end
    ///
    /// `new` is appended even if nothing matched
    ///
    /// # Errors
    /// if the list can't be written back
    pub fn update(&mut self, old: &Alarm, mut new: Alarm) -> Result<Alarm> {
        let mut alarms = self.list();
        let before = alarms.len();
        alarms.retain(|alarm| alarm != old);
        debug!(
            "updating alarm {old} -> {new}, {} record(s) replaced",
            before - alarms.len()
        );
        new.id = next_id(&alarms).ok_or(Error::IdsExhausted)?;
        alarms.push(new.clone());
        self.save(&alarms)?;
        Ok(new)
    }

    /// removes every alarm equal to `target`, no match is a no-op
    ///
    /// # Errors
    /// if the list can't be written back
    pub fn delete(&mut self, target: &Alarm) -> Result<()> {
        let mut alarms = self.list();
        let before = alarms.len();
        alarms.retain(|alarm| alarm != target);
        debug!(
            "deleting alarm {target}, {} record(s) removed",
            before - alarms.len()
        );
        self.save(&alarms)
    }

    /// replaces the one alarm with `id` in place, keeping its id and position
    ///
    /// # Errors
    /// if the list can't be written back
    pub fn update_by_id(
        &mut self,
        id: AlarmId,
        time: AlarmTime,
        days: Vec<Day>,
    ) -> Result<Option<Alarm>> {
        let mut alarms = self.list();
        let Some(alarm) = alarms.iter_mut().find(|alarm| alarm.id == id) else {
            debug!("no alarm {id} to update");
            return Ok(None);
        };
        alarm.time = time;
        alarm.days = days;
        let updated = alarm.clone();
        debug!("updated alarm {id} to {updated}");
        self.save(&alarms)?;
        Ok(Some(updated))
    }

    /// removes the one alarm with `id`, returns whether it existed
    ///
    /// # Errors
    /// if the list can't be written back
    pub fn delete_by_id(&mut self, id: AlarmId) -> Result<bool> {
        let mut alarms = self.list();
        let Some(index) = alarms.iter().position(|alarm| alarm.id == id) else {
            debug!("no alarm {id} to delete");
            return Ok(false);
        };
        let removed = alarms.remove(index);
        debug!("deleted alarm {id} ({removed})");
        self.save(&alarms)?;
        Ok(true)
    }

    fn save(&mut self, alarms: &[Alarm]) -> Result<()> {
        let blob = serde_json::to_string(alarms)?;
        self.prefs.put(ALARMS_KEY, blob.into())
    }
}

fn next_id(alarms: &[Alarm]) -> Option<AlarmId> {
    alarms
        .iter()
        .map(|alarm| alarm.id)
        .max()
        .unwrap_or(AlarmId::UNASSIGNED)
        .checked_next()
}

/// gives every alarm stored without an id (or with a clashing one) a fresh one
///
/// `None` if the ids run past `u64::MAX`. on success there is always room for one more id.
fn assign_ids(alarms: &mut [Alarm]) -> Option<()> {
    let mut next = next_id(alarms)?;
    let mut seen = HashSet::new();
    for alarm in alarms.iter_mut() {
        if !alarm.id.is_assigned() || !seen.insert(alarm.id) {
            alarm.id = next;
            seen.insert(next);
            next = next.checked_next()?;
        }
    }
    Some(())
}
