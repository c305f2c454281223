use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    /// there is no symbol to build a tree from
    #[error("input is empty, nothing to encode")]
    EmptyInput,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// the tree and the bits don't belong together, or the payload was cut off
    #[error("corrupt stream at bit {bit_pos}: {reason}")]
    CorruptStream { bit_pos: u64, reason: &'static str },
    #[error("allocation failed: {0}")]
    AllocationFailure(#[from] TryReserveError),
    #[error("symbol {0} has no code in the code table")]
    SymbolNotInTable(u8),
    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),
}

impl HuffError {
    pub fn corrupt(bit_pos: u64, reason: &'static str) -> Self {
        HuffError::CorruptStream { bit_pos, reason }
    }
}

pub type Result<T> = std::result::Result<T, HuffError>;
