//! Flow entry and the sibling cross-link used by table 62 <-> 63 sync.

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;
use crate::oxm::Match;

/// An index into a table's entry arena. Kept as plain data (table id +
/// entry id) rather than an owning pointer so the master/slave cross-link
/// pair never forms an ownership cycle; deleting an entry is then just
/// invalidating the index the peer holds, not a pointer chase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRef {
    pub table_id: u8,
    pub entry_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryStats {
    pub packet_count: u64,
    pub byte_count: u64,
    pub cookie: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEntry {
    pub id: u64,
    pub priority: u16,
    pub table_match: Match,
    /// Kept in canonical executor order (see `instruction::sort_canonical`);
    /// the flow-mod handler normalizes this before insertion.
    pub instructions: Vec<Instruction>,
    pub stats: EntryStats,
    /// Set only on entries in table 62, pointing at their transposed
    /// mirror in table 63. Single-producer: written once at add time,
    /// never reassigned.
    pub sync_slave: Option<EntryRef>,
    /// Set only on entries in table 63, pointing back at the table 62
    /// entry that produced them.
    pub sync_master: Option<EntryRef>,
}

/// Free-standing form of [`FlowEntry::is_table_miss`] for callers that only
/// hold a lookup result (`ports::FlowTable::lookup` returns a
/// `FlowStatsEntry`, not a `FlowEntry`).
pub fn is_table_miss(priority: u16, table_match: &Match) -> bool {
    priority == 0 && table_match.is_empty()
}

impl FlowEntry {
    pub fn new(id: u64, priority: u16, table_match: Match, instructions: Vec<Instruction>, cookie: u64) -> Self {
        Self {
            id,
            priority,
            table_match,
            instructions,
            stats: EntryStats { cookie, ..Default::default() },
            sync_slave: None,
            sync_master: None,
        }
    }

    /// A table-miss entry is priority 0 with an empty OXM list (glossary:
    /// "the lowest-priority catch-all entry in a table").
    pub fn is_table_miss(&self) -> bool {
        is_table_miss(self.priority, &self.table_match)
    }

    pub fn entry_ref(&self, table_id: u8) -> EntryRef {
        EntryRef { table_id, entry_id: self.id }
    }
}
