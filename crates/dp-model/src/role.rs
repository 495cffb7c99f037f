//! Controller role and the mutation gate every handler checks first.

use crate::error::OfpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerRole {
    Master,
    Slave,
    Equal,
}

/// Flow-mod and table-mod both start with this check (§4.3, §4.4): a
/// `SLAVE` sender may never mutate table state.
pub fn require_not_slave(role: ControllerRole) -> Result<(), OfpError> {
    if role == ControllerRole::Slave {
        Err(OfpError::BadRequestIsSlave)
    } else {
        Ok(())
    }
}
