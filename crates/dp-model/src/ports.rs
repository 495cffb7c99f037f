//! External collaborator trait seams (§6).
//!
//! `dp-core` is written entirely against these traits; `dp-adapters`
//! supplies deterministic in-memory implementations for tests and the
//! demo binary. None of this is the flow-table data structure itself
//! (lookup algorithm, eviction policy) — that remains the collaborator's
//! business, named only by the shape of what it returns.

use crate::action::Action;
use crate::entry::EntryRef;
use crate::error::OfpError;
use crate::message::{FlowMod, FlowStatsEntry};
use crate::packet::{HandleStd, Packet, PacketInReason};
use crate::table::{TableDesc, TableFeatures, TableStats};

/// The result of a successful `flow_mod` dispatch to a single table.
/// `entry_id` is `None` for delete commands (nothing was produced to
/// cross-link or re-inject packets against).
#[derive(Debug, Clone, Copy)]
pub struct FlowModOutcome {
    pub entry_id: Option<u64>,
}

/// A single flow table. Lookup, storage and timeout policy are entirely
/// the implementor's business; this crate only needs the seam.
pub trait FlowTable {
    fn id(&self) -> u8;

    /// Highest-priority matching entry for `fields`, or `None` on miss.
    fn lookup(&self, fields: &HandleStd) -> Option<FlowStatsEntry>;

    fn flow_mod(&mut self, msg: &FlowMod) -> Result<FlowModOutcome, OfpError>;

    fn set_sync_slave(&mut self, entry_id: u64, link: Option<EntryRef>);
    fn set_sync_master(&mut self, entry_id: u64, link: Option<EntryRef>);
    fn sync_slave(&self, entry_id: u64) -> Option<EntryRef>;

    fn flow_stats(&self) -> Vec<FlowStatsEntry>;
    fn aggregate_stats(&self) -> (u64, u64, u32);
    fn stats(&self) -> TableStats;

    fn desc(&self) -> &TableDesc;
    fn desc_mut(&mut self) -> &mut TableDesc;

    fn features(&self) -> &TableFeatures;
    fn set_features(&mut self, features: TableFeatures);

    fn saved_features(&self) -> &TableFeatures;
    fn set_saved_features(&mut self, features: TableFeatures);

    fn timeout(&mut self);
}

pub trait BufferPool {
    fn save(&mut self, pkt: Packet) -> u32;
    fn retrieve(&mut self, id: u32) -> Option<Packet>;
}

/// `meter_id` may drop the packet outright (`Ok(None)`); wire-level
/// meter-band configuration is the implementor's business.
pub trait MeterTable {
    fn apply(&mut self, pkt: Packet, meter_id: u32) -> Option<Packet>;
}

/// Executes an action list against a live packet. `None` means the packet
/// was consumed (forwarded, punted, or dropped) during execution.
pub trait DpActions {
    fn execute_list(&self, pkt: Packet, actions: &[Action], cookie: u64, reason: PacketInReason) -> Option<Packet>;
    fn validate(&self, actions: &[Action]) -> Result<(), OfpError>;
    fn check_set_field_req(&self, actions: &[Action]) -> Result<(), OfpError>;
}

pub trait DatapathSink {
    fn send_message(&mut self, msg: crate::message::DpMessage, sender: Option<crate::message::ConnectionId>);
}
