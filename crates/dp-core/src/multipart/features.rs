//! Table-features reassembly state machine and reply fragmentation (§4.6).
//!
//! Per-connection state machine: `Idle` (no slot) / `Accumulating(xid, body,
//! last_seen)`. See `spec.md` design notes for the full transition table;
//! this only implements the two transitions that matter operationally
//! (merge-and-wait, merge-and-complete) plus the xid-mismatch error path.

use std::collections::HashMap;
use std::time::Instant;

use dp_model::error::OfpError;
use dp_model::message::{ConnectionId, DpMessage, TableFeaturesEntry, TableFeaturesFragment, TableFeaturesReplyChunk};
use dp_model::ports::{DatapathSink, FlowTable};

use crate::constants::TABLE_FEATURES_REPLY_GROUP;
use crate::pipeline::Pipeline;

struct Slot {
    xid: u32,
    body: Vec<TableFeaturesEntry>,
    /// Intended for an external janitor's timeout sweep; this crate never
    /// reads it back (§5, §9: "known gap").
    #[allow(dead_code)]
    last_seen: Instant,
}

/// One reassembly slot per controller connection. At most one in-flight
/// fragmented request per connection (§3).
#[derive(Default)]
pub struct FeaturesReassembly {
    slots: HashMap<ConnectionId, Slot>,
}

impl FeaturesReassembly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one fragment in. Returns `Ok(None)` while still accumulating,
    /// `Ok(Some(body))` once the request is complete (the slot is consumed
    /// in that case), or `Err` on an xid mismatch (the pending slot is left
    /// untouched, per §7).
    pub fn ingest(&mut self, sender: ConnectionId, fragment: TableFeaturesFragment) -> Result<Option<Vec<TableFeaturesEntry>>, OfpError> {
        match self.slots.remove(&sender) {
            None => {
                if fragment.more {
                    self.slots.insert(sender, Slot { xid: fragment.xid, body: fragment.entries, last_seen: Instant::now() });
                    Ok(None)
                } else {
                    Ok(Some(fragment.entries))
                }
            }
            Some(mut slot) => {
                if slot.xid != fragment.xid {
                    let xid = slot.xid;
                    self.slots.insert(sender, slot);
                    tracing::warn!(expected_xid = xid, got_xid = fragment.xid, "multipart xid mismatch");
                    return Err(OfpError::BadRequestMultipartBufferOverflow);
                }
                slot.body.extend(fragment.entries);
                slot.last_seen = Instant::now();
                if fragment.more {
                    self.slots.insert(sender, slot);
                    Ok(None)
                } else {
                    Ok(Some(slot.body))
                }
            }
        }
    }
}

fn apply_features<T: FlowTable>(pipeline: &mut Pipeline<T>, body: &[TableFeaturesEntry]) {
    for entry in body {
        match pipeline.table_mut(entry.table_id) {
            Some(table) => {
                // Overwrites unconditionally; the prior features record is
                // not explicitly freed here (no Rust analogue needed, but
                // noted per the source's acknowledged-leak comment, §9).
                table.set_features(entry.features.clone());
            }
            None => tracing::warn!(table_id = entry.table_id, "table-features entry for unknown table id"),
        }
    }
}

fn build_reply_chunks<T: FlowTable>(pipeline: &Pipeline<T>) -> Vec<TableFeaturesReplyChunk> {
    let entries: Vec<TableFeaturesEntry> =
        pipeline.tables().iter().enumerate().map(|(id, table)| TableFeaturesEntry { table_id: id as u8, features: table.features().clone() }).collect();

    let group = TABLE_FEATURES_REPLY_GROUP as usize;
    let total_chunks = entries.len().div_ceil(group);

    entries
        .chunks(group)
        .enumerate()
        .map(|(i, chunk)| TableFeaturesReplyChunk { entries: chunk.to_vec(), more: i + 1 < total_chunks })
        .collect()
}

pub fn handle<T: FlowTable, S: DatapathSink>(
    pipeline: &mut Pipeline<T>,
    reassembly: &mut FeaturesReassembly,
    sink: &mut S,
    sender: ConnectionId,
    fragment: TableFeaturesFragment,
) -> Result<(), OfpError> {
    let Some(body) = reassembly.ingest(sender, fragment)? else {
        return Ok(());
    };

    apply_features(pipeline, &body);

    for chunk in build_reply_chunks(pipeline) {
        sink.send_message(DpMessage::TableFeaturesReply(chunk), Some(sender));
    }

    Ok(())
}
