//! Instruction execution in the canonical OpenFlow order (§4.2).
//!
//! Entries are expected to carry their instructions already sorted by
//! [`dp_model::instruction::sort_canonical`] (the flow-mod handler's job);
//! this module iterates storage order as-is.

use dp_model::instruction::Instruction;
use dp_model::packet::{Packet, PacketInReason};
use dp_model::ports::{DpActions, MeterTable};

/// Outcome of running one entry's instruction list against a packet.
pub struct ExecResult {
    /// `None` if the packet was consumed (meter drop, action drop, or a
    /// controller punt) at some instruction.
    pub packet: Option<Packet>,
    /// Set by a `Goto-Table` instruction, if any was present.
    pub next_table: Option<u8>,
}

pub fn execute<M: MeterTable, A: DpActions>(
    instructions: &[Instruction],
    packet: Packet,
    cookie: u64,
    is_table_miss: bool,
    meter_table: &mut M,
    dp_actions: &A,
) -> ExecResult {
    let mut packet = Some(packet);
    let mut next_table = None;

    for instruction in instructions {
        let Some(pkt) = packet.take() else {
            break;
        };

        match instruction {
            Instruction::Meter { meter_id } => {
                packet = meter_table.apply(pkt, *meter_id);
                if packet.is_none() {
                    return ExecResult { packet: None, next_table: None };
                }
            }
            Instruction::ApplyActions { actions } => {
                let reason = if is_table_miss { PacketInReason::TableMiss } else { PacketInReason::ApplyAction };
                packet = dp_actions.execute_list(pkt, actions, cookie, reason);
                if packet.is_none() {
                    return ExecResult { packet: None, next_table: None };
                }
            }
            Instruction::ClearActions => {
                let mut pkt = pkt;
                pkt.action_set.clear();
                packet = Some(pkt);
            }
            Instruction::WriteActions { actions } => {
                let mut pkt = pkt;
                pkt.action_set.write(actions);
                packet = Some(pkt);
            }
            Instruction::WriteMetadata { value, mask } => {
                let mut pkt = pkt;
                pkt.handle_std.write_metadata(*value, *mask);
                packet = Some(pkt);
            }
            Instruction::GotoTable { table_id } => {
                next_table = Some(*table_id);
                packet = Some(pkt);
            }
            Instruction::Experimenter { experimenter_id, .. } => {
                tracing::debug!(experimenter_id, "experimenter instruction, no hook installed");
                packet = Some(pkt);
            }
        }
    }

    ExecResult { packet, next_table }
}
