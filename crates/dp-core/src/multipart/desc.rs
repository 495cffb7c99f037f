//! Table-description replies with a live vacancy patch (§4.7).

use dp_model::message::{ConnectionId, DpMessage, TableDescEntry, TableDescReplyChunk};
use dp_model::ports::{DatapathSink, FlowTable};
use dp_model::table::vacancy_percent;

use crate::constants::TABLE_DESC_REPLY_GROUP;
use crate::pipeline::Pipeline;

fn build_reply_chunks<T: FlowTable>(pipeline: &Pipeline<T>) -> Vec<TableDescReplyChunk> {
    let entries: Vec<TableDescEntry> = pipeline
        .tables()
        .iter()
        .enumerate()
        .map(|(id, table)| {
            let mut desc = table.desc().clone();
            if desc.config.vacancy_events {
                let active = table.stats().active_count;
                let max_entries = table.features().max_entries;
                if let Some(vacancy) = desc.vacancy_mut() {
                    vacancy.vacancy = vacancy_percent(max_entries, active);
                }
            }
            TableDescEntry { table_id: id as u8, desc }
        })
        .collect();

    let group = TABLE_DESC_REPLY_GROUP as usize;
    let total_chunks = entries.len().div_ceil(group);

    entries.chunks(group).enumerate().map(|(i, chunk)| TableDescReplyChunk { entries: chunk.to_vec(), more: i + 1 < total_chunks }).collect()
}

pub fn handle<T: FlowTable, S: DatapathSink>(pipeline: &Pipeline<T>, sink: &mut S, sender: ConnectionId) {
    for chunk in build_reply_chunks(pipeline) {
        sink.send_message(DpMessage::TableDescReply(chunk), Some(sender));
    }
}
