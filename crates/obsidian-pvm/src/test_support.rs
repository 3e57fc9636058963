//! Tiny in-crate assembler for unit tests: builds a `Program` from a
//! list of complete instructions, deriving the boundary bitmask.

use bytes::Bytes;

use crate::program::Program;

pub(crate) fn assemble(instrs: &[&[u8]]) -> Program {
    assemble_with_jump_table(instrs, Vec::new())
}

pub(crate) fn assemble_with_jump_table(instrs: &[&[u8]], jump_table: Vec<u32>) -> Program {
    let mut code = Vec::new();
    let mut starts = Vec::new();
    for ins in instrs {
        starts.push(code.len());
        code.extend_from_slice(ins);
    }
    let mut mask = vec![0u8; code.len().div_ceil(8)];
    for s in starts {
        mask[s / 8] |= 1 << (s % 8);
    }
    Program::new(Bytes::from(code), jump_table, mask).expect("valid test program")
}
