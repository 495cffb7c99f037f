//! Deterministic in-memory buffer pool.

use std::collections::HashMap;

use dp_model::packet::Packet;
use dp_model::ports::BufferPool;

#[derive(Default)]
pub struct InMemoryBufferPool {
    next_id: u32,
    store: HashMap<u32, Packet>,
}

impl InMemoryBufferPool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BufferPool for InMemoryBufferPool {
    fn save(&mut self, pkt: Packet) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.store.insert(id, pkt);
        id
    }

    fn retrieve(&mut self, id: u32) -> Option<Packet> {
        self.store.remove(&id)
    }
}
