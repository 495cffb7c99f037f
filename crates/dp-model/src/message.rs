//! Controller-facing message shapes: the slice of `FLOW_MOD`, `TABLE_MOD`
//! and `MULTIPART_REQUEST`/`MULTIPART_REPLY` this core actually handles.
//! Wire encoding/decoding of these is a collaborator's job (§1); these are
//! the already-parsed, in-memory shapes the handlers operate on.

use crate::entry::EntryStats;
use crate::instruction::Instruction;
use crate::oxm::Match;
use crate::packet::PacketInReason;
use crate::table::{TableDesc, TableFeatures, TableId, TableStats};

/// Identifies the controller connection a request arrived on and a reply
/// should be sent to. Opaque to this crate; the connection manager (§1,
/// out of scope) owns its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowModCommand {
    Add,
    Modify,
    ModifyStrict,
    Delete,
    DeleteStrict,
}

impl FlowModCommand {
    pub fn is_delete(self) -> bool {
        matches!(self, FlowModCommand::Delete | FlowModCommand::DeleteStrict)
    }
}

#[derive(Debug, Clone)]
pub struct FlowMod {
    pub command: FlowModCommand,
    pub table_id: TableId,
    pub priority: u16,
    pub cookie: u64,
    pub table_match: Match,
    pub instructions: Vec<Instruction>,
    pub buffer_id: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct TableMod {
    pub table_id: TableId,
    pub config: crate::table::TableConfigFlags,
    pub properties: Vec<crate::table::TableProperty>,
}

#[derive(Debug, Clone, Copy)]
pub struct FlowStatsRequest {
    pub table_id: TableId,
}

#[derive(Debug, Clone)]
pub struct FlowStatsEntry {
    pub table_id: TableId,
    pub priority: u16,
    pub table_match: Match,
    pub instructions: Vec<Instruction>,
    pub stats: EntryStats,
}

#[derive(Debug, Clone, Default)]
pub struct FlowStatsReply {
    pub entries: Vec<FlowStatsEntry>,
}

#[derive(Debug, Clone, Copy)]
pub struct TableStatsRequest {
    pub table_id: TableId,
}

#[derive(Debug, Clone, Default)]
pub struct TableStatsReply {
    pub stats: Vec<TableStats>,
}

#[derive(Debug, Clone, Copy)]
pub struct AggregateStatsRequest {
    pub table_id: TableId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateStatsReply {
    pub packet_count: u64,
    pub byte_count: u64,
    pub flow_count: u32,
}

#[derive(Debug, Clone)]
pub struct TableFeaturesEntry {
    pub table_id: TableId,
    pub features: TableFeatures,
}

/// One fragment of a (possibly chained) table-features request.
#[derive(Debug, Clone)]
pub struct TableFeaturesFragment {
    pub xid: u32,
    pub more: bool,
    pub entries: Vec<TableFeaturesEntry>,
}

#[derive(Debug, Clone)]
pub struct TableFeaturesReplyChunk {
    pub entries: Vec<TableFeaturesEntry>,
    pub more: bool,
}

#[derive(Debug, Clone)]
pub struct TableDescEntry {
    pub table_id: TableId,
    pub desc: TableDesc,
}

#[derive(Debug, Clone)]
pub struct TableDescReplyChunk {
    pub entries: Vec<TableDescEntry>,
    pub more: bool,
}

/// Everything this core can hand to `ports::DatapathSink::send_message`.
#[derive(Debug, Clone)]
pub enum DpMessage {
    PacketIn { reason: PacketInReason, table_id: TableId, cookie: u64, buffer_id: Option<u32>, data: Vec<u8> },
    FlowStatsReply(FlowStatsReply),
    TableStatsReply(TableStatsReply),
    AggregateStatsReply(AggregateStatsReply),
    TableFeaturesReply(TableFeaturesReplyChunk),
    TableDescReply(TableDescReplyChunk),
}
