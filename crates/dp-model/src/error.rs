//! The closed set of OpenFlow `(error_type, error_code)` pairs this core
//! can produce, per spec §7's error taxonomy.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OfpError {
    #[error("BAD_REQUEST / IS_SLAVE")]
    BadRequestIsSlave,

    #[error("FLOW_MOD_FAILED / BAD_TABLE_ID")]
    FlowModFailedBadTableId,

    #[error("BAD_INSTRUCTION / BAD_TABLE_ID")]
    BadInstructionBadTableId,

    #[error("BAD_MATCH / BAD_NW_ADDR_MASK")]
    BadMatchBadNwAddrMask,

    #[error("FLOW_MOD_FAILED / BAD_PRIORITY")]
    FlowModFailedBadPriority,

    #[error("TABLE_FEATURES_FAILED / BAD_ARGUMENT")]
    TableFeaturesFailedBadArgument,

    #[error("BAD_REQUEST / MULTIPART_BUFFER_OVERFLOW")]
    BadRequestMultipartBufferOverflow,

    #[error("action validation failed: {0}")]
    ActionValidationFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}
