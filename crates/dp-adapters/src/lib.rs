//! dp-adapters: in-memory reference implementations of `dp-model::ports`.
//!
//! Not part of the specified pipeline contract — purely test and demo
//! infrastructure, the way the teacher's own adapter crate implements
//! trait seams defined by its domain/core crates.

pub mod actions;
pub mod buffer_pool;
pub mod flow_table;
pub mod sink;
