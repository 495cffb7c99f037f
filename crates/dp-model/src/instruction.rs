//! Instruction representation and canonical ordering.
//!
//! The executor (`dp-core::executor`) assumes instructions already sit in
//! canonical order; the flow-mod handler (`dp-core::flow_mod`) is
//! responsible for sorting a new entry's instruction list once, at insert
//! time, using [`rank`].

use serde::{Deserialize, Serialize};

use crate::action::Action;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Meter { meter_id: u32 },
    ApplyActions { actions: Vec<Action> },
    ClearActions,
    WriteActions { actions: Vec<Action> },
    WriteMetadata { value: u64, mask: u64 },
    GotoTable { table_id: u8 },
    Experimenter { experimenter_id: u32, data: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InstructionKind {
    Meter,
    ApplyActions,
    ClearActions,
    WriteActions,
    WriteMetadata,
    GotoTable,
    Experimenter,
}

impl Instruction {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Instruction::Meter { .. } => InstructionKind::Meter,
            Instruction::ApplyActions { .. } => InstructionKind::ApplyActions,
            Instruction::ClearActions => InstructionKind::ClearActions,
            Instruction::WriteActions { .. } => InstructionKind::WriteActions,
            Instruction::WriteMetadata { .. } => InstructionKind::WriteMetadata,
            Instruction::GotoTable { .. } => InstructionKind::GotoTable,
            Instruction::Experimenter { .. } => InstructionKind::Experimenter,
        }
    }
}

/// Numeric rank used to sort an entry's instruction list into the
/// executor's canonical order: Meter, Apply, Clear, Write-Actions,
/// Write-Metadata, Goto-Table, Experimenter. `ApplyActions` and
/// `ClearActions` are assigned consecutive ranks so Apply always precedes
/// Clear; no separate tie-break logic is needed at sort time, it falls out
/// of the rank table directly.
pub fn rank(kind: InstructionKind) -> u8 {
    match kind {
        InstructionKind::Meter => 0,
        InstructionKind::ApplyActions => 1,
        InstructionKind::ClearActions => 2,
        InstructionKind::WriteActions => 3,
        InstructionKind::WriteMetadata => 4,
        InstructionKind::GotoTable => 5,
        InstructionKind::Experimenter => 6,
    }
}

/// Sorts `instructions` into canonical executor order in place, stably
/// (two instructions of the same kind, which shouldn't occur, keep their
/// relative order).
pub fn sort_canonical(instructions: &mut [Instruction]) {
    instructions.sort_by_key(|i| rank(i.kind()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_sorts_before_clear_regardless_of_input_order() {
        let mut instructions = vec![
            Instruction::ClearActions,
            Instruction::GotoTable { table_id: 1 },
            Instruction::Meter { meter_id: 1 },
            Instruction::ApplyActions { actions: vec![] },
        ];
        sort_canonical(&mut instructions);
        let kinds: Vec<_> = instructions.iter().map(Instruction::kind).collect();
        assert_eq!(
            kinds,
            vec![
                InstructionKind::Meter,
                InstructionKind::ApplyActions,
                InstructionKind::ClearActions,
                InstructionKind::GotoTable,
            ]
        );
    }
}
