//! Flow-mod handling: validation, table-61 LPM constraint, dispatch, table
//! 62 -> 63 sibling sync, and buffered-packet re-injection (§4.3).

use dp_model::entry::EntryRef;
use dp_model::error::OfpError;
use dp_model::instruction::{sort_canonical, Instruction};
use dp_model::message::{ConnectionId, FlowMod, FlowModCommand};
use dp_model::oxm::{prefix_len, OxmField};
use dp_model::ports::{BufferPool, DatapathSink, DpActions, FlowTable, MeterTable};
use dp_model::role::{require_not_slave, ControllerRole};

use crate::config::DatapathConfig;
use crate::constants::{ALL_TABLES, LPM_TABLE_ID, SYNC_MASTER_TABLE, SYNC_SLAVE_TABLE};
use crate::pipeline::Pipeline;
use crate::walker;

#[allow(clippy::too_many_arguments)]
pub fn handle<T, B, M, A, S>(
    pipeline: &mut Pipeline<T>,
    buffer_pool: &mut B,
    meter_table: &mut M,
    dp_actions: &A,
    sink: &mut S,
    config: &DatapathConfig,
    role: ControllerRole,
    mut msg: FlowMod,
    sender: Option<ConnectionId>,
) -> Result<(), OfpError>
where
    T: FlowTable,
    B: BufferPool,
    M: MeterTable,
    A: DpActions,
    S: DatapathSink,
{
    require_not_slave(role)?;

    sort_canonical(&mut msg.instructions);
    validate_actions(&msg.instructions, dp_actions)?;
    validate_goto(&msg)?;

    if msg.table_id == LPM_TABLE_ID && msg.command == FlowModCommand::Add {
        validate_lpm(&msg)?;
    }

    if msg.table_id == ALL_TABLES {
        if !msg.command.is_delete() {
            return Err(OfpError::FlowModFailedBadTableId);
        }
        for table in pipeline.tables_mut() {
            table.flow_mod(&msg)?;
        }
        return Ok(());
    }

    let table = pipeline.table_mut(msg.table_id).ok_or(OfpError::FlowModFailedBadTableId)?;
    let outcome = table.flow_mod(&msg)?;

    if msg.table_id == SYNC_MASTER_TABLE && msg.command == FlowModCommand::Add {
        if let Some(master_id) = outcome.entry_id {
            sync_sibling(pipeline, master_id, &msg);
        }
    }

    if matches!(msg.command, FlowModCommand::Add | FlowModCommand::Modify | FlowModCommand::ModifyStrict) {
        if let Some(buffer_id) = msg.buffer_id {
            match buffer_pool.retrieve(buffer_id) {
                Some(pkt) => {
                    walker::walk(pipeline, meter_table, dp_actions, sink, config, pkt, sender);
                }
                None => {
                    tracing::warn!(buffer_id, "buffered packet retrieval failed for flow-mod injection");
                }
            }
        }
    }

    Ok(())
}

fn validate_actions<A: DpActions>(instructions: &[Instruction], dp_actions: &A) -> Result<(), OfpError> {
    for instruction in instructions {
        let actions = match instruction {
            Instruction::ApplyActions { actions } => actions,
            Instruction::WriteActions { actions } => actions,
            _ => continue,
        };
        dp_actions.validate(actions)?;
        dp_actions.check_set_field_req(actions)?;
    }
    Ok(())
}

/// Goto-table must strictly advance the pipeline position (invariant 1):
/// enforced here, at insert time, so the walker never has to guard against
/// a backward or self-referencing goto at packet-processing time (§4.2).
fn validate_goto(msg: &FlowMod) -> Result<(), OfpError> {
    for instruction in &msg.instructions {
        if let Instruction::GotoTable { table_id } = instruction {
            if *table_id <= msg.table_id {
                return Err(OfpError::BadInstructionBadTableId);
            }
        }
    }
    Ok(())
}

fn validate_lpm(msg: &FlowMod) -> Result<(), OfpError> {
    for field in msg.table_match.fields() {
        match field {
            OxmField::Ipv4DstMasked { mask, .. } => {
                let prefix = prefix_len(*mask).ok_or(OfpError::BadMatchBadNwAddrMask)?;
                if msg.priority as u32 != prefix {
                    return Err(OfpError::FlowModFailedBadPriority);
                }
            }
            OxmField::Ipv4Dst(_) => {
                if msg.priority != 32 {
                    return Err(OfpError::FlowModFailedBadPriority);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Clones `msg` with `ETH_DST`/`ETH_SRC` transposed and installs it into
/// table 63. Failure is logged and swallowed: the master add already
/// succeeded and is not rolled back (§4.3, §9).
fn sync_sibling<T: FlowTable>(pipeline: &mut Pipeline<T>, master_id: u64, msg: &FlowMod) {
    let mut slave_msg = msg.clone();
    slave_msg.table_id = SYNC_SLAVE_TABLE;
    slave_msg.table_match = msg.table_match.transposed_eth();

    let Some(slave_table) = pipeline.table_mut(SYNC_SLAVE_TABLE) else {
        return;
    };

    match slave_table.flow_mod(&slave_msg) {
        Ok(outcome) => {
            if let Some(slave_id) = outcome.entry_id {
                let master_ref = EntryRef { table_id: SYNC_MASTER_TABLE, entry_id: master_id };
                let slave_ref = EntryRef { table_id: SYNC_SLAVE_TABLE, entry_id: slave_id };
                if let Some(master_table) = pipeline.table_mut(SYNC_MASTER_TABLE) {
                    master_table.set_sync_slave(master_id, Some(slave_ref));
                }
                if let Some(slave_table) = pipeline.table_mut(SYNC_SLAVE_TABLE) {
                    slave_table.set_sync_master(slave_id, Some(master_ref));
                }
            }
        }
        Err(error) => {
            tracing::warn!(%error, master_id, "sibling install into table 63 failed, master add retained");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dp_adapters::actions::{AcceptAllActions, PassThroughMeter};
    use dp_adapters::buffer_pool::InMemoryBufferPool;
    use dp_adapters::flow_table::InMemoryFlowTable;
    use dp_adapters::sink::RecordingSink;
    use dp_model::oxm::Match;

    fn lpm_msg(priority: u16, field: OxmField) -> FlowMod {
        FlowMod {
            command: FlowModCommand::Add,
            table_id: LPM_TABLE_ID,
            priority,
            cookie: 0,
            table_match: Match::new(vec![field]),
            instructions: vec![],
            buffer_id: None,
        }
    }

    #[test]
    fn backward_goto_is_rejected_before_any_mutation() {
        let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
        let mut buffer_pool = InMemoryBufferPool::new();
        let mut meter_table = PassThroughMeter;
        let dp_actions = AcceptAllActions;
        let mut sink = RecordingSink::new();
        let config = DatapathConfig::default();

        let msg = FlowMod {
            command: FlowModCommand::Add,
            table_id: 5,
            priority: 0,
            cookie: 0,
            table_match: Match::new(vec![]),
            instructions: vec![Instruction::GotoTable { table_id: 5 }],
            buffer_id: None,
        };
        let result = handle(&mut pipeline, &mut buffer_pool, &mut meter_table, &dp_actions, &mut sink, &config, ControllerRole::Master, msg, None);

        assert_eq!(result, Err(OfpError::BadInstructionBadTableId));
        assert_eq!(pipeline.table(5).unwrap().stats().active_count, 0);
    }

    #[test]
    fn lpm_priority_mismatch_is_rejected_and_table_unchanged() {
        let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
        let mut buffer_pool = InMemoryBufferPool::new();
        let mut meter_table = PassThroughMeter;
        let dp_actions = AcceptAllActions;
        let mut sink = RecordingSink::new();
        let config = DatapathConfig::default();

        let msg = lpm_msg(16, OxmField::Ipv4DstMasked { value: 0, mask: 0xFFFF_FF00 });
        let result = handle(&mut pipeline, &mut buffer_pool, &mut meter_table, &dp_actions, &mut sink, &config, ControllerRole::Master, msg, None);

        assert_eq!(result, Err(OfpError::FlowModFailedBadPriority));
        assert_eq!(pipeline.table(LPM_TABLE_ID).unwrap().stats().active_count, 0);
    }

    #[test]
    fn slave_role_is_rejected_before_any_mutation() {
        let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
        let mut buffer_pool = InMemoryBufferPool::new();
        let mut meter_table = PassThroughMeter;
        let dp_actions = AcceptAllActions;
        let mut sink = RecordingSink::new();
        let config = DatapathConfig::default();

        let msg = lpm_msg(32, OxmField::Ipv4Dst(0));
        let result = handle(&mut pipeline, &mut buffer_pool, &mut meter_table, &dp_actions, &mut sink, &config, ControllerRole::Slave, msg, None);

        assert_eq!(result, Err(OfpError::BadRequestIsSlave));
    }

    #[test]
    fn sibling_add_to_table_62_creates_cross_linked_table_63_entry() {
        let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
        let mut buffer_pool = InMemoryBufferPool::new();
        let mut meter_table = PassThroughMeter;
        let dp_actions = AcceptAllActions;
        let mut sink = RecordingSink::new();
        let config = DatapathConfig::default();

        let msg = FlowMod {
            command: FlowModCommand::Add,
            table_id: SYNC_MASTER_TABLE,
            priority: 5,
            cookie: 0,
            table_match: Match::new(vec![OxmField::EthDst([0xAA; 6]), OxmField::EthSrc([0xBB; 6])]),
            instructions: vec![],
            buffer_id: None,
        };

        handle(&mut pipeline, &mut buffer_pool, &mut meter_table, &dp_actions, &mut sink, &config, ControllerRole::Master, msg, None).unwrap();

        assert_eq!(pipeline.table(SYNC_SLAVE_TABLE).unwrap().stats().active_count, 1);
        let slave_entries = pipeline.table(SYNC_SLAVE_TABLE).unwrap().flow_stats();
        let slave = &slave_entries[0];
        assert!(slave.table_match.fields().contains(&OxmField::EthDst([0xBB; 6])));
        assert!(slave.table_match.fields().contains(&OxmField::EthSrc([0xAA; 6])));
    }
}
