//! Multipart request/reply handling (§4.5-4.7): stats, fragmented
//! table-features reassembly, and table-desc.

pub mod desc;
pub mod features;
pub mod stats;

pub use features::FeaturesReassembly;
