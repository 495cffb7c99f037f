//! In-memory `MeterTable`/`DpActions` stand-ins. None of these model real
//! packet forwarding; they exist so `dp-core` can be exercised without a
//! real datapath underneath it.

use std::cell::RefCell;
use std::collections::HashSet;

use dp_model::action::Action;
use dp_model::error::OfpError;
use dp_model::packet::{Packet, PacketInReason};
use dp_model::ports::{DpActions, MeterTable};

pub struct PassThroughMeter;
impl MeterTable for PassThroughMeter {
    fn apply(&mut self, pkt: Packet, _meter_id: u32) -> Option<Packet> {
        Some(pkt)
    }
}

pub struct DropMeter;
impl MeterTable for DropMeter {
    fn apply(&mut self, _pkt: Packet, _meter_id: u32) -> Option<Packet> {
        None
    }
}

/// A meter table where specific meter ids are configured to drop, and
/// everything else passes through.
#[derive(Default)]
pub struct ConfigurableMeter {
    pub dropping: HashSet<u32>,
}

impl MeterTable for ConfigurableMeter {
    fn apply(&mut self, pkt: Packet, meter_id: u32) -> Option<Packet> {
        if self.dropping.contains(&meter_id) {
            None
        } else {
            Some(pkt)
        }
    }
}

/// Accepts any action list as valid and executes it as a no-op, returning
/// the packet unconsumed. Useful where a test only cares about flow-mod
/// validation, not about what an action actually does.
pub struct AcceptAllActions;
impl DpActions for AcceptAllActions {
    fn execute_list(&self, pkt: Packet, _actions: &[Action], _cookie: u64, _reason: PacketInReason) -> Option<Packet> {
        Some(pkt)
    }
    fn validate(&self, _actions: &[Action]) -> Result<(), OfpError> {
        Ok(())
    }
    fn check_set_field_req(&self, _actions: &[Action]) -> Result<(), OfpError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedOutput {
    pub port: u32,
    pub cookie: u64,
    pub reason: PacketInReason,
}

/// Records `Output` actions as "sent frames" and treats them as consuming
/// the packet (as a real output action would). Other action kinds are
/// accepted but have no further effect here.
#[derive(Default)]
pub struct RecordingActions {
    pub sent: RefCell<Vec<RecordedOutput>>,
}

impl DpActions for RecordingActions {
    fn execute_list(&self, pkt: Packet, actions: &[Action], cookie: u64, reason: PacketInReason) -> Option<Packet> {
        let mut consumed = false;
        for action in actions {
            if let Action::Output { port } = action {
                self.sent.borrow_mut().push(RecordedOutput { port: *port, cookie, reason });
                consumed = true;
            }
        }
        if consumed {
            None
        } else {
            Some(pkt)
        }
    }

    fn validate(&self, _actions: &[Action]) -> Result<(), OfpError> {
        Ok(())
    }

    fn check_set_field_req(&self, _actions: &[Action]) -> Result<(), OfpError> {
        Ok(())
    }
}
