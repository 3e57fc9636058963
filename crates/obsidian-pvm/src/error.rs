use thiserror::Error;

/// Errors produced while decoding a program blob.
///
/// Decode failures are distinct from every runtime [`crate::ExitReason`]:
/// a malformed blob never becomes a `Panic`, it is rejected before an
/// execution context ever exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error("blob truncated: needed {needed} more byte(s) at offset {offset}")]
    UnexpectedEnd { offset: usize, needed: usize },

    #[error("varint exceeds 32 bits at offset {0}")]
    VarintOverflow(usize),

    #[error("invalid jump-table entry width {0} (expected 1..=4)")]
    InvalidEntryWidth(u8),

    #[error("boundary bitmask is {actual} byte(s), code of {code_len} byte(s) needs {expected}")]
    BitmaskMismatch {
        expected: usize,
        actual: usize,
        code_len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProgramError::InvalidEntryWidth(9);
        assert!(err.to_string().contains("entry width 9"));

        let err = ProgramError::BitmaskMismatch {
            expected: 2,
            actual: 1,
            code_len: 9,
        };
        assert!(err.to_string().contains("needs 2"));
    }
}
