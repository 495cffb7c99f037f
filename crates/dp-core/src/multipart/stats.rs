//! Flow, table and aggregate stats (§4.5). Each accepts a table id
//! (possibly `ALL_TABLES`) and sends a single reply.

use dp_model::message::{
    AggregateStatsReply, AggregateStatsRequest, ConnectionId, DpMessage, FlowStatsReply, FlowStatsRequest, TableStatsReply,
    TableStatsRequest,
};
use dp_model::ports::{DatapathSink, FlowTable};

use crate::constants::ALL_TABLES;
use crate::pipeline::Pipeline;

fn target_tables<T: FlowTable>(pipeline: &Pipeline<T>, table_id: u8) -> Vec<&T> {
    if table_id == ALL_TABLES {
        pipeline.tables().iter().collect()
    } else {
        pipeline.table(table_id).into_iter().collect()
    }
}

pub fn flow_stats<T: FlowTable>(pipeline: &Pipeline<T>, req: &FlowStatsRequest) -> FlowStatsReply {
    let entries = target_tables(pipeline, req.table_id).into_iter().flat_map(FlowTable::flow_stats).collect();
    FlowStatsReply { entries }
}

pub fn table_stats<T: FlowTable>(pipeline: &Pipeline<T>, req: &TableStatsRequest) -> TableStatsReply {
    let stats = target_tables(pipeline, req.table_id).into_iter().map(FlowTable::stats).collect();
    TableStatsReply { stats }
}

pub fn aggregate_stats<T: FlowTable>(pipeline: &Pipeline<T>, req: &AggregateStatsRequest) -> AggregateStatsReply {
    let mut reply = AggregateStatsReply::default();
    for table in target_tables(pipeline, req.table_id) {
        let (packets, bytes, flows) = table.aggregate_stats();
        reply.packet_count += packets;
        reply.byte_count += bytes;
        reply.flow_count += flows;
    }
    reply
}

pub fn handle_flow_stats<T: FlowTable, S: DatapathSink>(
    pipeline: &Pipeline<T>,
    sink: &mut S,
    req: &FlowStatsRequest,
    sender: Option<ConnectionId>,
) {
    sink.send_message(DpMessage::FlowStatsReply(flow_stats(pipeline, req)), sender);
}

pub fn handle_table_stats<T: FlowTable, S: DatapathSink>(
    pipeline: &Pipeline<T>,
    sink: &mut S,
    req: &TableStatsRequest,
    sender: Option<ConnectionId>,
) {
    sink.send_message(DpMessage::TableStatsReply(table_stats(pipeline, req)), sender);
}

pub fn handle_aggregate_stats<T: FlowTable, S: DatapathSink>(
    pipeline: &Pipeline<T>,
    sink: &mut S,
    req: &AggregateStatsRequest,
    sender: Option<ConnectionId>,
) {
    sink.send_message(DpMessage::AggregateStatsReply(aggregate_stats(pipeline, req)), sender);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dp_adapters::flow_table::InMemoryFlowTable;

    #[test]
    fn aggregate_stats_sums_across_all_tables() {
        let pipeline = Pipeline::new(InMemoryFlowTable::new);
        let reply = aggregate_stats(&pipeline, &AggregateStatsRequest { table_id: ALL_TABLES });
        assert_eq!(reply.flow_count, 0);
    }
}
