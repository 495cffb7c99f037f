//! Drives a packet through the table array (§4.1).
//!
//! The walker never re-enters itself on the same packet and never
//! retries a terminal decision; every branch below either returns or
//! advances strictly to a higher table id.

use dp_model::entry::is_table_miss;
use dp_model::message::{ConnectionId, DpMessage};
use dp_model::packet::{Packet, PacketInReason, ACTION_SET_COOKIE};
use dp_model::ports::{DatapathSink, DpActions, FlowTable, MeterTable};

use crate::config::DatapathConfig;
use crate::executor;
use crate::pipeline::Pipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The action-set was committed and the packet destroyed (outcome a).
    ActionSetCommitted,
    /// The packet left the pipeline's hands mid-walk: no match, a meter
    /// drop, or an apply-actions instruction that consumed it (which
    /// covers both a drop and a forward/controller-punt issued by the
    /// action executor collaborator — that distinction is internal to
    /// `DpActions` and not visible here) (outcome b or d).
    Dropped,
    /// The packet was punted to the controller directly by the walker
    /// itself (the invalid-TTL path, the only punt decision this crate
    /// makes unmediated by `DpActions`) (outcome c).
    Punted,
}

#[allow(clippy::too_many_arguments)]
pub fn walk<T, M, A, S>(
    pipeline: &Pipeline<T>,
    meter_table: &mut M,
    dp_actions: &A,
    sink: &mut S,
    config: &DatapathConfig,
    mut packet: Packet,
    sender: Option<ConnectionId>,
) -> WalkOutcome
where
    T: FlowTable,
    M: MeterTable,
    A: DpActions,
    S: DatapathSink,
{
    if !packet.handle_std.is_ttl_valid() {
        if config.invalid_ttl_to_controller {
            let data = packet.buffer.clone();
            sink.send_message(
                DpMessage::PacketIn { reason: PacketInReason::InvalidTtl, table_id: 0, cookie: 0, buffer_id: None, data },
                sender,
            );
            tracing::info!(table_id = 0, "invalid TTL, punted to controller");
            return WalkOutcome::Punted;
        }
        tracing::debug!("invalid TTL, dropped silently");
        return WalkOutcome::Dropped;
    }

    let mut current_table = 0u8;

    loop {
        let Some(table) = pipeline.table(current_table) else {
            tracing::warn!(current_table, "walker advanced past the last table");
            return WalkOutcome::Dropped;
        };

        packet.table_id = current_table;

        let Some(entry) = table.lookup(&packet.handle_std) else {
            return WalkOutcome::Dropped;
        };

        packet.handle_std.table_miss = is_table_miss(entry.priority, &entry.table_match);
        let cookie = entry.stats.cookie;
        let miss = packet.handle_std.table_miss;

        let result = executor::execute(&entry.instructions, packet, cookie, miss, meter_table, dp_actions);

        let Some(mut pkt) = result.packet else {
            return WalkOutcome::Dropped;
        };

        match result.next_table {
            Some(next) => {
                debug_assert!(next > current_table, "goto-table must advance pipeline position");
                current_table = next;
                packet = pkt;
            }
            None => {
                let actions = pkt.action_set.actions();
                pkt.action_set.clear();
                let _ = dp_actions.execute_list(pkt, &actions, ACTION_SET_COOKIE, PacketInReason::ActionSet);
                return WalkOutcome::ActionSetCommitted;
            }
        }
    }
}
