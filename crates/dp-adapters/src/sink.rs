//! Captures every message the pipeline sends, for test assertions.

use dp_model::message::{ConnectionId, DpMessage};
use dp_model::ports::DatapathSink;

#[derive(Default)]
pub struct RecordingSink {
    pub sent: Vec<DpMessage>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatapathSink for RecordingSink {
    fn send_message(&mut self, msg: DpMessage, _sender: Option<ConnectionId>) {
        self.sent.push(msg);
    }
}
