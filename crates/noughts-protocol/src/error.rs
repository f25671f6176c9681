//! Error types for the protocol layer.
//!
//! Every variant here is a flavour of "malformed packet". None of them is
//! ever fatal: the dispatcher logs and drops the packet, or answers
//! NEGATED where the command warrants a reply.

use crate::Opcode;

/// Errors that can occur while decoding a packet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Shorter than the smallest valid packet.
    #[error("packet too short: {0} bytes")]
    TooShort(usize),

    /// The opcode is unassigned, or is not valid in this direction
    /// (e.g. a client sending a server-only opcode).
    #[error("unknown opcode {0}")]
    UnknownOpcode(u32),

    /// A known opcode with the wrong total packet length.
    #[error("{opcode} packet must be {expected} bytes, got {actual}")]
    WrongLength {
        opcode: Opcode,
        expected: usize,
        actual: usize,
    },

    /// A field holds a value outside its domain.
    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: u32 },
}
