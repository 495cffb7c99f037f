//! Packet and its parsed-field handle.
//!
//! Field extraction itself (out of scope, §1) lives with a collaborator;
//! `HandleStd` only carries the fields the pipeline reads or writes
//! directly: TTL validity and the metadata register.

use std::collections::HashMap;

use crate::action::ActionSet;
use crate::table::TableId;

/// The parsed view of a packet's header fields. Only one handle is ever
/// updated by write-metadata, even if the packet has other stale handles
/// referencing the same bytes — a known limitation carried over from the
/// instruction executor's contract (§4.2), not fixed here.
#[derive(Debug, Clone, Default)]
pub struct HandleStd {
    pub ttl_valid: bool,
    pub metadata: u64,
    pub table_miss: bool,
    pub fields: HashMap<u32, Vec<u8>>,
}

impl HandleStd {
    pub fn is_ttl_valid(&self) -> bool {
        self.ttl_valid
    }

    /// Minimal structural sanity check a real parser would perform in much
    /// more depth; this crate only needs a seam to call.
    pub fn validate(&self) -> bool {
        true
    }

    pub fn lookup(&self, field_id: u32) -> Option<&[u8]> {
        self.fields.get(&field_id).map(Vec::as_slice)
    }

    /// `(metadata & !mask) | (value & mask)`, the write-metadata rule
    /// (invariant 8).
    pub fn write_metadata(&mut self, value: u64, mask: u64) {
        self.metadata = (self.metadata & !mask) | (value & mask);
    }
}

/// Reason attached to a `PACKET_IN` or an Apply-Actions execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketInReason {
    InvalidTtl,
    ActionSet,
    ApplyAction,
    TableMiss,
}

/// Cookie used when committing an action-set at the end of a walk with no
/// goto-table set (§4.1).
pub const ACTION_SET_COOKIE: u64 = 0xFFFF_FFFF_FFFF_FFFF;

#[derive(Debug, Clone)]
pub struct Packet {
    pub buffer: Vec<u8>,
    pub handle_std: HandleStd,
    pub action_set: ActionSet,
    pub table_id: TableId,
    pub buffer_id: Option<u32>,
    pub in_port: u32,
}

impl Packet {
    pub fn new(buffer: Vec<u8>, handle_std: HandleStd, in_port: u32) -> Self {
        Self {
            buffer,
            handle_std,
            action_set: ActionSet::new(),
            table_id: 0,
            buffer_id: None,
            in_port,
        }
    }
}
