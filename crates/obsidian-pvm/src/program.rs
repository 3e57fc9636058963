//! Program blobs and their decoded, immutable view.
//!
//! Blob layout, in order:
//! - varint: jump-table entry count
//! - u8: jump-table entry width in bytes (1..=4 when the count is nonzero)
//! - the entries, fixed-width little-endian
//! - varint: boundary-bitmask byte length
//! - the packed bitmask, 1 bit per code byte (1 = instruction start)
//! - all remaining bytes: the code
//!
//! The bitmask must cover the code exactly (`ceil(code_len / 8)` bytes);
//! anything inconsistent is a [`ProgramError`], never a runtime exit.
//!
//! A `Program` is built once per code blob and reused across many
//! invocations. The per-address skip distances and basic-block-beginning
//! flags depend only on the code, so they are computed here, once, and
//! are immutable thereafter.

use bytes::Bytes;

use crate::error::ProgramError;
use crate::isa;
use crate::MAX_ARG_LEN;

/// Immutable decoded view of a code blob.
#[derive(Debug, Clone)]
pub struct Program {
    code: Bytes,
    jump_table: Vec<u32>,
    boundary_mask: Vec<u8>,
    /// Distance from each address to the next instruction boundary,
    /// capped at `1 + MAX_ARG_LEN` and clamped to the end of code.
    skip: Vec<u8>,
    block_begin: Vec<bool>,
}

/// Little-endian base-128 varint, at most 32 bits.
fn read_varint(blob: &[u8], offset: &mut usize) -> Result<u32, ProgramError> {
    let mut value: u32 = 0;
    let mut shift: u32 = 0;
    loop {
        let b = *blob.get(*offset).ok_or(ProgramError::UnexpectedEnd {
            offset: *offset,
            needed: 1,
        })?;
        *offset += 1;
        if shift > 28 || (shift == 28 && (b & 0x7F) > 0x0F) {
            return Err(ProgramError::VarintOverflow(*offset - 1));
        }
        value |= ((b & 0x7F) as u32) << shift;
        if b & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

fn take<'a>(blob: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8], ProgramError> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= blob.len())
        .ok_or(ProgramError::UnexpectedEnd {
            offset: *offset,
            needed: len.saturating_sub(blob.len() - *offset),
        })?;
    let slice = &blob[*offset..end];
    *offset = end;
    Ok(slice)
}

impl Program {
    /// Decode a full program blob.
    pub fn parse(blob: &[u8]) -> Result<Self, ProgramError> {
        let mut offset = 0usize;

        let entry_count = read_varint(blob, &mut offset)? as usize;
        let entry_width = *take(blob, &mut offset, 1)?.first().unwrap_or(&0);
        if entry_count > 0 && !(1..=4).contains(&entry_width) {
            return Err(ProgramError::InvalidEntryWidth(entry_width));
        }

        let mut jump_table = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            let raw = take(blob, &mut offset, entry_width as usize)?;
            let mut entry = 0u32;
            for (i, b) in raw.iter().enumerate() {
                entry |= (*b as u32) << (8 * i);
            }
            jump_table.push(entry);
        }

        let mask_len = read_varint(blob, &mut offset)? as usize;
        let boundary_mask = take(blob, &mut offset, mask_len)?.to_vec();
        let code = Bytes::copy_from_slice(&blob[offset..]);

        Self::new(code, jump_table, boundary_mask)
    }

    /// Build a program from already-separated parts, validating that the
    /// bitmask covers the code.
    pub fn new(
        code: Bytes,
        jump_table: Vec<u32>,
        boundary_mask: Vec<u8>,
    ) -> Result<Self, ProgramError> {
        let expected = code.len().div_ceil(8);
        if boundary_mask.len() != expected {
            return Err(ProgramError::BitmaskMismatch {
                expected,
                actual: boundary_mask.len(),
                code_len: code.len(),
            });
        }

        let (skip, block_begin) = Self::index_code(&code, &boundary_mask);
        tracing::trace!(
            code_len = code.len(),
            jump_entries = jump_table.len(),
            "program decoded"
        );

        Ok(Self {
            code,
            jump_table,
            boundary_mask,
            skip,
            block_begin,
        })
    }

    /// Precompute the skip table and the block-beginning flags.
    fn index_code(code: &[u8], mask: &[u8]) -> (Vec<u8>, Vec<bool>) {
        let len = code.len();
        let boundary = |i: usize| mask[i / 8] & (1 << (i % 8)) != 0;

        let mut skip = vec![0u8; len];
        let mut next_boundary = len;
        for pc in (0..len).rev() {
            let distance = (next_boundary - pc).min(1 + MAX_ARG_LEN as usize);
            skip[pc] = distance as u8;
            if boundary(pc) {
                next_boundary = pc;
            }
        }

        // An address begins a basic block iff it is a boundary and its
        // predecessor instruction (if any) ends one.
        let mut block_begin = vec![false; len];
        let mut prev: Option<usize> = None;
        for pc in 0..len {
            if !boundary(pc) {
                continue;
            }
            block_begin[pc] = match prev {
                None => true,
                Some(p) => isa::is_terminator(code[p]),
            };
            prev = Some(pc);
        }

        (skip, block_begin)
    }

    /// The raw code bytes.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Valid dynamic-jump targets, 2-byte-aligned indexing.
    pub fn jump_table(&self) -> &[u32] {
        &self.jump_table
    }

    /// Distance from `pc` to the next instruction boundary (the full
    /// instruction length at a boundary address). Zero past the end.
    pub fn skip(&self, pc: u32) -> u32 {
        self.skip.get(pc as usize).map(|&s| s as u32).unwrap_or(0)
    }

    /// Whether an instruction starts at `pc`.
    pub fn is_instruction_boundary(&self, pc: u32) -> bool {
        let i = pc as usize;
        i < self.code.len() && self.boundary_mask[i / 8] & (1 << (i % 8)) != 0
    }

    /// Whether `pc` is a legal branch/jump landing site.
    pub fn is_block_beginning(&self, pc: u32) -> bool {
        self.block_begin.get(pc as usize).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::opcode;

    fn mask_for(bits: &[usize], code_len: usize) -> Vec<u8> {
        let mut mask = vec![0u8; code_len.div_ceil(8)];
        for &b in bits {
            mask[b / 8] |= 1 << (b % 8);
        }
        mask
    }

    #[test]
    fn test_parse_roundtrip() {
        // 1 jump-table entry (width 2) pointing at pc 3, then a 4-byte
        // code section: jump_ind at 0, trap at 3.
        let code = [opcode::JUMP_IND, 0x00, 0x00, opcode::TRAP];
        let blob = [
            1u8, 2, // count, width
            3, 0, // entry = 3
            1,    // mask length
            0b0000_1001, // boundaries at 0 and 3
            code[0], code[1], code[2], code[3],
        ];
        let program = Program::parse(&blob).unwrap();
        assert_eq!(program.code(), &code);
        assert_eq!(program.jump_table(), &[3]);
        assert_eq!(program.skip(0), 3);
        assert_eq!(program.skip(3), 1);
        assert!(program.is_instruction_boundary(3));
        assert!(!program.is_instruction_boundary(1));
    }

    #[test]
    fn test_truncated_blob() {
        assert!(matches!(
            Program::parse(&[]),
            Err(ProgramError::UnexpectedEnd { .. })
        ));
        // Claims 4 jump-table entries, provides none.
        assert!(matches!(
            Program::parse(&[4, 2]),
            Err(ProgramError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_bitmask_must_cover_code() {
        // No jump table, 1 mask byte, 9 code bytes (needs 2 mask bytes).
        let mut blob = vec![0u8, 0, 1, 0b0000_0001];
        blob.extend_from_slice(&[opcode::FALLTHROUGH; 9]);
        assert!(matches!(
            Program::parse(&blob),
            Err(ProgramError::BitmaskMismatch { expected: 2, .. })
        ));
    }

    #[test]
    fn test_invalid_entry_width() {
        assert!(matches!(
            Program::parse(&[1, 9]),
            Err(ProgramError::InvalidEntryWidth(9))
        ));
    }

    #[test]
    fn test_block_beginnings() {
        // add_32 (not a terminator) at 0, fallthrough at 3, add_32 at 4.
        let code = vec![opcode::ADD_32, 0x21, 3, opcode::FALLTHROUGH, opcode::ADD_32, 0x21, 3];
        let mask = mask_for(&[0, 3, 4], code.len());
        let program = Program::new(Bytes::from(code), vec![], mask).unwrap();

        assert!(program.is_block_beginning(0));
        // Preceded by add_32: boundary, but not a block beginning.
        assert!(!program.is_block_beginning(3));
        // Preceded by fallthrough: a fresh block.
        assert!(program.is_block_beginning(4));
        // Not a boundary at all.
        assert!(!program.is_block_beginning(1));
        // Out of range.
        assert!(!program.is_block_beginning(99));
    }

    #[test]
    fn test_skip_is_capped() {
        // One opcode followed by 30 argument bytes and no further
        // boundary: skip saturates at 1 + MAX_ARG_LEN.
        let code = vec![opcode::LOAD_IMM; 31];
        let mask = mask_for(&[0], code.len());
        let program = Program::new(Bytes::from(code), vec![], mask).unwrap();
        assert_eq!(program.skip(0), 1 + MAX_ARG_LEN);
    }

    #[test]
    fn test_varint_multibyte() {
        let mut offset = 0;
        assert_eq!(read_varint(&[0x80, 0x02], &mut offset).unwrap(), 256);
        assert_eq!(offset, 2);

        let mut offset = 0;
        assert!(matches!(
            read_varint(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF], &mut offset),
            Err(ProgramError::VarintOverflow(_))
        ));
    }
}
