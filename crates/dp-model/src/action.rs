//! Action and action-set representation.
//!
//! Executing an action against a packet is a collaborator's job
//! (`ports::DpActions`); this module only defines enough shape to build,
//! merge and validate action lists.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::oxm::OxmField;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Output { port: u32 },
    SetField { field: OxmField },
    Group { group_id: u32 },
    Meter { meter_id: u32 },
}

/// The discriminant an action merges on inside an action-set. Two actions
/// of the same kind are considered "the same slot": a later write replaces
/// an earlier one. `SetField` merges per concrete field, not per `SetField`
/// in general, matching the standard's "one set-field per field type" rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Output,
    SetField(&'static str),
    Group,
    Meter,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Output { .. } => ActionKind::Output,
            Action::Group { .. } => ActionKind::Group,
            Action::Meter { .. } => ActionKind::Meter,
            Action::SetField { field } => ActionKind::SetField(match field {
                OxmField::EthDst(_) => "eth_dst",
                OxmField::EthSrc(_) => "eth_src",
                OxmField::Ipv4Dst(_) | OxmField::Ipv4DstMasked { .. } => "ipv4_dst",
                OxmField::Opaque { .. } => "opaque",
            }),
        }
    }
}

/// The packet's accumulated action-set (glossary: "the ordered,
/// de-duplicated collection of actions accumulated across Write-Actions
/// instructions").
///
/// Backed by an `IndexMap` keyed on `ActionKind` so that a later
/// Write-Actions overwriting an earlier one of the same kind is a plain
/// map insert, while iteration order (insertion order of each *first*
/// occurrence) stays stable for execution.
#[derive(Debug, Clone, Default)]
pub struct ActionSet {
    actions: IndexMap<ActionKind, Action>,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `actions` into the set: each action overwrites any existing
    /// entry of the same kind, keeping the earlier slot position.
    pub fn write(&mut self, actions: &[Action]) {
        for action in actions {
            self.actions.insert(action.kind(), action.clone());
        }
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.values().cloned().collect()
    }
}
