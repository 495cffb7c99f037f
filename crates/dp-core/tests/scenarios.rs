//! Scenarios S1-S6 from spec §8, against the in-memory adapters.

use dp_adapters::actions::{AcceptAllActions, ConfigurableMeter, PassThroughMeter, RecordingActions};
use dp_adapters::buffer_pool::InMemoryBufferPool;
use dp_adapters::flow_table::InMemoryFlowTable;
use dp_adapters::sink::RecordingSink;
use dp_core::config::DatapathConfig;
use dp_core::{flow_mod, walker, Pipeline, WalkOutcome};
use dp_model::instruction::Instruction;
use dp_model::message::{ConnectionId, DpMessage, FlowMod, FlowModCommand};
use dp_model::ports::FlowTable;
use dp_model::oxm::{Match, OxmField, FIELD_ETH_DST, FIELD_ETH_SRC};
use dp_model::packet::{HandleStd, Packet, PacketInReason};
use dp_model::role::ControllerRole;

fn eth_packet(ttl_valid: bool, eth_dst: [u8; 6], eth_src: [u8; 6]) -> Packet {
    let mut handle = HandleStd { ttl_valid, ..Default::default() };
    handle.fields.insert(FIELD_ETH_DST, eth_dst.to_vec());
    handle.fields.insert(FIELD_ETH_SRC, eth_src.to_vec());
    Packet::new(vec![0u8; 14], handle, 1)
}

fn add(table_id: u8, priority: u16, table_match: Match, instructions: Vec<Instruction>) -> FlowMod {
    FlowMod { command: FlowModCommand::Add, table_id, priority, cookie: 0, table_match, instructions, buffer_id: None }
}

#[test]
fn s1_ttl_drop_to_controller() {
    let pipeline = Pipeline::new(InMemoryFlowTable::new);
    let mut meter = PassThroughMeter;
    let dp_actions = AcceptAllActions;
    let mut sink = RecordingSink::new();
    let config = DatapathConfig { invalid_ttl_to_controller: true, ..Default::default() };

    let pkt = eth_packet(false, [0; 6], [0; 6]);
    let outcome = walker::walk(&pipeline, &mut meter, &dp_actions, &mut sink, &config, pkt, None);

    assert_eq!(outcome, WalkOutcome::Punted);
    assert_eq!(sink.sent.len(), 1);
    match &sink.sent[0] {
        DpMessage::PacketIn { reason, table_id, .. } => {
            assert_eq!(*reason, PacketInReason::InvalidTtl);
            assert_eq!(*table_id, 0);
        }
        other => panic!("expected PacketIn, got {other:?}"),
    }
    assert_eq!(pipeline.table(0).unwrap().stats().lookup_count, 0);
}

#[test]
fn s2_two_table_goto_forwards_and_sends_no_packet_in() {
    let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
    let mut buffer_pool = InMemoryBufferPool::new();
    let mut meter = ConfigurableMeter::default();
    let dp_actions = RecordingActions::default();
    let mut sink = RecordingSink::new();
    let config = DatapathConfig::default();

    flow_mod::handle(
        &mut pipeline,
        &mut buffer_pool,
        &mut meter,
        &dp_actions,
        &mut sink,
        &config,
        ControllerRole::Master,
        add(0, 10, Match::new(vec![]), vec![Instruction::GotoTable { table_id: 1 }]),
        None,
    )
    .unwrap();
    flow_mod::handle(
        &mut pipeline,
        &mut buffer_pool,
        &mut meter,
        &dp_actions,
        &mut sink,
        &config,
        ControllerRole::Master,
        add(1, 10, Match::new(vec![]), vec![Instruction::ApplyActions { actions: vec![dp_model::action::Action::Output { port: 2 }] }]),
        None,
    )
    .unwrap();

    let pkt = eth_packet(true, [1; 6], [2; 6]);
    walker::walk(&pipeline, &mut meter, &dp_actions, &mut sink, &config, pkt, None);

    let sent = dp_actions.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].port, 2);
    assert!(sink.sent.is_empty(), "no PACKET_IN expected");
}

#[test]
fn s3_lpm_priority_mismatch_rejected() {
    let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
    let mut buffer_pool = InMemoryBufferPool::new();
    let mut meter = PassThroughMeter;
    let dp_actions = AcceptAllActions;
    let mut sink = RecordingSink::new();
    let config = DatapathConfig::default();

    let msg = add(61, 16, Match::new(vec![OxmField::Ipv4DstMasked { value: 0, mask: 0xFFFF_FF00 }]), vec![]);
    let result = flow_mod::handle(&mut pipeline, &mut buffer_pool, &mut meter, &dp_actions, &mut sink, &config, ControllerRole::Master, msg, None);

    assert!(result.is_err());
    assert_eq!(pipeline.table(61).unwrap().stats().active_count, 0);
}

#[test]
fn s4_sibling_mac_swap() {
    let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
    let mut buffer_pool = InMemoryBufferPool::new();
    let mut meter = PassThroughMeter;
    let dp_actions = AcceptAllActions;
    let mut sink = RecordingSink::new();
    let config = DatapathConfig::default();

    let dst = [0xAA; 6];
    let src = [0xBB; 6];
    let msg = add(
        62,
        5,
        Match::new(vec![OxmField::EthDst(dst), OxmField::EthSrc(src)]),
        vec![Instruction::ApplyActions { actions: vec![dp_model::action::Action::Output { port: 3 }] }],
    );
    flow_mod::handle(&mut pipeline, &mut buffer_pool, &mut meter, &dp_actions, &mut sink, &config, ControllerRole::Master, msg, None).unwrap();

    let master_entries = pipeline.table(62).unwrap().flow_stats();
    let slave_entries = pipeline.table(63).unwrap().flow_stats();
    assert_eq!(slave_entries.len(), 1);
    assert!(slave_entries[0].table_match.fields().contains(&OxmField::EthDst(src)));
    assert!(slave_entries[0].table_match.fields().contains(&OxmField::EthSrc(dst)));
    assert_eq!(slave_entries[0].priority, master_entries[0].priority);
    assert_eq!(slave_entries[0].instructions, master_entries[0].instructions);
}

#[test]
fn s5_fragmented_table_features_reassembly() {
    use dp_core::multipart::{features, FeaturesReassembly};
    use dp_model::message::{TableFeaturesEntry, TableFeaturesFragment};
    use dp_model::table::TableFeatures;

    let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
    let mut reassembly = FeaturesReassembly::new();
    let mut sink = RecordingSink::new();
    let sender = ConnectionId(7);

    let frag1 = TableFeaturesFragment {
        xid: 0x1234,
        more: true,
        entries: (0..8).map(|id| TableFeaturesEntry { table_id: id, features: TableFeatures::default() }).collect(),
    };
    features::handle(&mut pipeline, &mut reassembly, &mut sink, sender, frag1).unwrap();
    assert!(sink.sent.is_empty(), "no reply after first fragment");

    let frag2 = TableFeaturesFragment {
        xid: 0x1234,
        more: false,
        entries: (8..dp_core::constants::NUM_TABLES).map(|id| TableFeaturesEntry { table_id: id, features: TableFeatures::default() }).collect(),
    };
    features::handle(&mut pipeline, &mut reassembly, &mut sink, sender, frag2).unwrap();

    let expected = dp_core::constants::NUM_TABLES as usize / dp_core::constants::TABLE_FEATURES_REPLY_GROUP as usize;
    assert_eq!(sink.sent.len(), expected);
    for (i, msg) in sink.sent.iter().enumerate() {
        match msg {
            DpMessage::TableFeaturesReply(chunk) => assert_eq!(chunk.more, i + 1 < expected),
            other => panic!("expected TableFeaturesReply, got {other:?}"),
        }
    }

    let frag3 = TableFeaturesFragment { xid: 0x5678, more: true, entries: vec![] };
    let mut sink2 = RecordingSink::new();
    let result = features::handle(&mut pipeline, &mut reassembly, &mut sink2, sender, frag3);
    assert!(result.is_err());
}

#[test]
fn s6_meter_drops_mid_pipeline() {
    let mut pipeline = Pipeline::new(InMemoryFlowTable::new);
    let mut buffer_pool = InMemoryBufferPool::new();
    let mut meter = ConfigurableMeter { dropping: [1].into_iter().collect() };
    let dp_actions = RecordingActions::default();
    let mut sink = RecordingSink::new();
    let config = DatapathConfig::default();

    flow_mod::handle(
        &mut pipeline,
        &mut buffer_pool,
        &mut meter,
        &dp_actions,
        &mut sink,
        &config,
        ControllerRole::Master,
        add(0, 10, Match::new(vec![]), vec![Instruction::Meter { meter_id: 1 }, Instruction::GotoTable { table_id: 1 }]),
        None,
    )
    .unwrap();

    let pkt = eth_packet(true, [1; 6], [2; 6]);
    let outcome = walker::walk(&pipeline, &mut meter, &dp_actions, &mut sink, &config, pkt, None);

    assert_eq!(outcome, WalkOutcome::Dropped);
    assert_eq!(pipeline.table(1).unwrap().stats().lookup_count, 0, "table 1 never consulted");
    assert!(dp_actions.sent.borrow().is_empty(), "action-set never committed");
}
