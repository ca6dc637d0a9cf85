//! Append-only journal of switch events

use chrono::{DateTime, Utc};
use heirswitch_types::{Address, SwitchEvent, SwitchEventKind, SwitchId};

#[derive(Debug, Default)]
pub struct EventJournal {
    events: Vec<SwitchEvent>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        switch_id: SwitchId,
        owner: Address,
        kind: SwitchEventKind,
        at: DateTime<Utc>,
    ) -> &SwitchEvent {
        let sequence = self.events.len() as u64;
        self.events.push(SwitchEvent {
            sequence,
            switch_id,
            owner,
            kind,
            at,
        });
        &self.events[self.events.len() - 1]
    }

    pub fn all(&self) -> &[SwitchEvent] {
        &self.events
    }

    pub fn for_owner(&self, owner: &Address) -> Vec<SwitchEvent> {
        self.events
            .iter()
            .filter(|e| &e.owner == owner)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
