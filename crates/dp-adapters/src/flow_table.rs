//! A deterministic in-memory `FlowTable`. Lookup is linear scan by
//! priority; good enough for tests and the demo binary, not a performance
//! claim.

use std::cell::Cell;

use dp_model::entry::{EntryRef, FlowEntry};
use dp_model::error::OfpError;
use dp_model::message::{FlowMod, FlowModCommand, FlowStatsEntry};
use dp_model::oxm::{OxmField, FIELD_ETH_DST, FIELD_ETH_SRC, FIELD_IPV4_DST};
use dp_model::packet::HandleStd;
use dp_model::ports::{FlowModOutcome, FlowTable};
use dp_model::table::{TableDesc, TableFeatures, TableStats};

pub struct InMemoryFlowTable {
    table_id: u8,
    entries: Vec<Option<FlowEntry>>,
    next_id: u64,
    desc: TableDesc,
    features: TableFeatures,
    saved_features: TableFeatures,
    lookup_count: Cell<u64>,
    matched_count: Cell<u64>,
}

impl InMemoryFlowTable {
    pub fn new(table_id: u8) -> Self {
        Self {
            table_id,
            entries: Vec::new(),
            next_id: 0,
            desc: TableDesc::default(),
            features: TableFeatures { max_entries: 1024, ..Default::default() },
            saved_features: TableFeatures::default(),
            lookup_count: Cell::new(0),
            matched_count: Cell::new(0),
        }
    }

    fn active(&self) -> impl Iterator<Item = &FlowEntry> {
        self.entries.iter().filter_map(Option::as_ref)
    }

    fn active_mut(&mut self) -> impl Iterator<Item = &mut FlowEntry> {
        self.entries.iter_mut().filter_map(Option::as_mut)
    }

    fn field_matches(field: &OxmField, handle: &HandleStd) -> bool {
        match field {
            OxmField::EthDst(addr) => handle.lookup(FIELD_ETH_DST).map(|b| b == addr).unwrap_or(false),
            OxmField::EthSrc(addr) => handle.lookup(FIELD_ETH_SRC).map(|b| b == addr).unwrap_or(false),
            OxmField::Ipv4Dst(want) => handle
                .lookup(FIELD_IPV4_DST)
                .and_then(|b| <[u8; 4]>::try_from(b).ok())
                .map(|b| u32::from_be_bytes(b) == *want)
                .unwrap_or(false),
            OxmField::Ipv4DstMasked { value, mask } => handle
                .lookup(FIELD_IPV4_DST)
                .and_then(|b| <[u8; 4]>::try_from(b).ok())
                .map(|b| (u32::from_be_bytes(b) & mask) == (value & mask))
                .unwrap_or(false),
            OxmField::Opaque { field_id, value } => handle.lookup(*field_id).map(|b| b == value.as_slice()).unwrap_or(false),
        }
    }

    fn entry_matches(entry: &FlowEntry, handle: &HandleStd) -> bool {
        entry.table_match.fields().iter().all(|f| Self::field_matches(f, handle))
    }

    fn find_by_match(&self, table_match: &dp_model::oxm::Match, priority: Option<u16>) -> Vec<u64> {
        self.active()
            .filter(|e| &e.table_match == table_match && priority.map_or(true, |p| p == e.priority))
            .map(|e| e.id)
            .collect()
    }
}

impl FlowTable for InMemoryFlowTable {
    fn id(&self) -> u8 {
        self.table_id
    }

    fn lookup(&self, fields: &HandleStd) -> Option<FlowStatsEntry> {
        self.lookup_count.set(self.lookup_count.get() + 1);
        let best = self.active().filter(|e| Self::entry_matches(e, fields)).max_by_key(|e| e.priority)?;
        self.matched_count.set(self.matched_count.get() + 1);
        Some(FlowStatsEntry {
            table_id: self.table_id,
            priority: best.priority,
            table_match: best.table_match.clone(),
            instructions: best.instructions.clone(),
            stats: best.stats.clone(),
        })
    }

    fn flow_mod(&mut self, msg: &FlowMod) -> Result<FlowModOutcome, OfpError> {
        match msg.command {
            FlowModCommand::Add => {
                let id = self.next_id;
                self.next_id += 1;
                let entry = FlowEntry::new(id, msg.priority, msg.table_match.clone(), msg.instructions.clone(), msg.cookie);
                self.entries.push(Some(entry));
                Ok(FlowModOutcome { entry_id: Some(id) })
            }
            FlowModCommand::Modify | FlowModCommand::ModifyStrict => {
                let priority = matches!(msg.command, FlowModCommand::ModifyStrict).then_some(msg.priority);
                let ids = self.find_by_match(&msg.table_match, priority);
                let mut last_id = None;
                for id in ids {
                    if let Some(Some(entry)) = self.entries.get_mut(id as usize) {
                        entry.instructions = msg.instructions.clone();
                        last_id = Some(id);
                    }
                }
                Ok(FlowModOutcome { entry_id: last_id })
            }
            FlowModCommand::Delete | FlowModCommand::DeleteStrict => {
                let priority = matches!(msg.command, FlowModCommand::DeleteStrict).then_some(msg.priority);
                for id in self.find_by_match(&msg.table_match, priority) {
                    if let Some(slot) = self.entries.get_mut(id as usize) {
                        *slot = None;
                    }
                }
                Ok(FlowModOutcome { entry_id: None })
            }
        }
    }

    fn set_sync_slave(&mut self, entry_id: u64, link: Option<EntryRef>) {
        if let Some(Some(entry)) = self.entries.get_mut(entry_id as usize) {
            entry.sync_slave = link;
        }
    }

    fn set_sync_master(&mut self, entry_id: u64, link: Option<EntryRef>) {
        if let Some(Some(entry)) = self.entries.get_mut(entry_id as usize) {
            entry.sync_master = link;
        }
    }

    fn sync_slave(&self, entry_id: u64) -> Option<EntryRef> {
        self.entries.get(entry_id as usize)?.as_ref()?.sync_slave
    }

    fn flow_stats(&self) -> Vec<FlowStatsEntry> {
        self.active()
            .map(|e| FlowStatsEntry {
                table_id: self.table_id,
                priority: e.priority,
                table_match: e.table_match.clone(),
                instructions: e.instructions.clone(),
                stats: e.stats.clone(),
            })
            .collect()
    }

    fn aggregate_stats(&self) -> (u64, u64, u32) {
        self.active().fold((0, 0, 0), |(p, b, f), e| (p + e.stats.packet_count, b + e.stats.byte_count, f + 1))
    }

    fn stats(&self) -> TableStats {
        TableStats {
            table_id: self.table_id,
            active_count: self.active().count() as u32,
            lookup_count: self.lookup_count.get(),
            matched_count: self.matched_count.get(),
        }
    }

    fn desc(&self) -> &TableDesc {
        &self.desc
    }

    fn desc_mut(&mut self) -> &mut TableDesc {
        &mut self.desc
    }

    fn features(&self) -> &TableFeatures {
        &self.features
    }

    fn set_features(&mut self, features: TableFeatures) {
        self.features = features;
    }

    fn saved_features(&self) -> &TableFeatures {
        &self.saved_features
    }

    fn set_saved_features(&mut self, features: TableFeatures) {
        self.saved_features = features;
    }

    fn timeout(&mut self) {
        let _ = self.active_mut();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dp_model::instruction::Instruction;
    use dp_model::oxm::Match;

    #[test]
    fn table_miss_entry_matches_any_packet() {
        let mut table = InMemoryFlowTable::new(0);
        table
            .flow_mod(&FlowMod {
                command: FlowModCommand::Add,
                table_id: 0,
                priority: 0,
                cookie: 0,
                table_match: Match::new(vec![]),
                instructions: vec![Instruction::ClearActions],
                buffer_id: None,
            })
            .unwrap();

        let result = table.lookup(&HandleStd::default());
        assert!(result.is_some());
    }

    #[test]
    fn higher_priority_entry_wins_lookup() {
        let mut table = InMemoryFlowTable::new(0);
        let add = |t: &mut InMemoryFlowTable, priority, m| {
            t.flow_mod(&FlowMod { command: FlowModCommand::Add, table_id: 0, priority, cookie: 0, table_match: m, instructions: vec![], buffer_id: None }).unwrap();
        };
        add(&mut table, 0, Match::new(vec![]));
        add(&mut table, 10, Match::new(vec![]));

        let result = table.lookup(&HandleStd::default()).unwrap();
        assert_eq!(result.priority, 10);
    }
}
