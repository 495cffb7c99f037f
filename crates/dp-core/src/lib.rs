//! dp-core: packet-processing pipeline core of an OpenFlow 1.3+ switch
//! datapath.
//!
//! - `pipeline`: the fixed `N`-table array and its lifecycle.
//! - `walker`: drives a packet through the table array to a terminal
//!   outcome.
//! - `executor`: runs one matched entry's instructions in canonical order.
//! - `flow_mod` / `table_mod`: the controller-facing mutation protocol.
//! - `multipart`: stats, table-features reassembly, table-desc.
//! - `lifecycle`: features save/restore, timeout fan-out.
//! - `config`: the two runtime datapath flags spec.md names directly.
//!
//! Field extraction, the flow-table data structure, action/meter
//! execution, the buffer pool and message serialization are all
//! collaborators reached only through `dp_model::ports` trait objects; see
//! `dp-adapters` for the in-memory implementations used by tests.

pub mod config;
pub mod constants;
pub mod executor;
pub mod flow_mod;
pub mod lifecycle;
pub mod multipart;
pub mod pipeline;
pub mod table_mod;
pub mod walker;

pub use pipeline::Pipeline;
pub use walker::WalkOutcome;
