//! Instruction-argument decoding.
//!
//! Every opcode carries its trailing bytes in one of a small set of
//! argument shapes. Each decoder here is a pure, total function over the
//! already-sliced argument bytes: missing bytes read as zero, extra
//! bytes are ignored. Branch offsets come back signed and relative; the
//! interpreter resolves them against the instruction's own address.
//!
//! Immediates follow the protocol's variable-length little-endian
//! convention with sign extension: an `n`-byte value represents a
//! two's-complement quantity in `[-2^(8n-1), 2^(8n-1))`.

use crate::REGISTER_COUNT;

/// Sign-extend an `n`-byte little-endian value to 64 bits.
///
/// Identity for `n == 0` and `n >= 8`.
pub fn sign_extend(n: usize, value: u64) -> u64 {
    if n == 0 || n >= 8 {
        return value;
    }
    let mask = (1u64 << (8 * n)) - 1;
    let value = value & mask;
    let sign_bit = 1u64 << (8 * n - 1);
    if value & sign_bit != 0 {
        value | !mask
    } else {
        value
    }
}

#[inline]
fn byte(args: &[u8], i: usize) -> u8 {
    args.get(i).copied().unwrap_or(0)
}

/// Little-endian value of `len` bytes at `start`, zero-padded.
fn le_value(args: &[u8], start: usize, len: usize) -> u64 {
    let mut value = 0u64;
    for i in 0..len.min(8) {
        value |= (byte(args, start + i) as u64) << (8 * i);
    }
    value
}

fn imm(args: &[u8], start: usize, len: usize) -> u64 {
    sign_extend(len, le_value(args, start, len))
}

#[inline]
fn reg(nibble: u8) -> u8 {
    nibble.min(REGISTER_COUNT as u8 - 1)
}

/// Single variable-length immediate, no register operand.
pub fn one_imm(args: &[u8]) -> u64 {
    imm(args, 0, args.len().min(4))
}

/// Register selector plus a fixed-width 8-byte immediate.
pub fn one_reg_ext_imm(args: &[u8]) -> (u8, u64) {
    (reg(byte(args, 0) & 0x0F), le_value(args, 1, 8))
}

/// Two immediates; the first byte's low 3 bits give the first length.
pub fn two_imm(args: &[u8]) -> (u64, u64) {
    let l1 = ((byte(args, 0) & 7) as usize).min(4);
    let l2 = args.len().saturating_sub(1 + l1).min(4);
    (imm(args, 1, l1), imm(args, 1 + l1, l2))
}

/// Single signed branch displacement.
pub fn one_offset(args: &[u8]) -> i64 {
    imm(args, 0, args.len().min(4)) as i64
}

/// Register selector in the low nibble, immediate in the rest.
pub fn one_reg_one_imm(args: &[u8]) -> (u8, u64) {
    let lx = args.len().saturating_sub(1).min(4);
    (reg(byte(args, 0) & 0x0F), imm(args, 1, lx))
}

/// Register selector plus two immediates; the high nibble (mod 8) of
/// the first byte gives the first immediate's length.
pub fn one_reg_two_imm(args: &[u8]) -> (u8, u64, u64) {
    let l1 = (((byte(args, 0) >> 4) & 7) as usize).min(4);
    let l2 = args.len().saturating_sub(1 + l1).min(4);
    (
        reg(byte(args, 0) & 0x0F),
        imm(args, 1, l1),
        imm(args, 1 + l1, l2),
    )
}

/// Register selector, immediate, and a trailing signed offset.
pub fn one_reg_one_imm_one_offset(args: &[u8]) -> (u8, u64, i64) {
    let l1 = (((byte(args, 0) >> 4) & 7) as usize).min(4);
    let ly = args.len().saturating_sub(1 + l1).min(4);
    (
        reg(byte(args, 0) & 0x0F),
        imm(args, 1, l1),
        imm(args, 1 + l1, ly) as i64,
    )
}

/// Two register selectors packed in one byte.
pub fn two_reg(args: &[u8]) -> (u8, u8) {
    let b = byte(args, 0);
    (reg(b & 0x0F), reg(b >> 4))
}

/// Two register selectors plus one immediate.
pub fn two_reg_one_imm(args: &[u8]) -> (u8, u8, u64) {
    let (a, b) = two_reg(args);
    let lx = args.len().saturating_sub(1).min(4);
    (a, b, imm(args, 1, lx))
}

/// Two register selectors plus one signed offset.
pub fn two_reg_one_offset(args: &[u8]) -> (u8, u8, i64) {
    let (a, b, v) = two_reg_one_imm(args);
    (a, b, v as i64)
}

/// Two register selectors plus two immediates; the second byte's low
/// 3 bits give the first immediate's length.
pub fn two_reg_two_imm(args: &[u8]) -> (u8, u8, u64, u64) {
    let (a, b) = two_reg(args);
    let l1 = ((byte(args, 1) & 7) as usize).min(4);
    let l2 = args.len().saturating_sub(2 + l1).min(4);
    (a, b, imm(args, 2, l1), imm(args, 2 + l1, l2))
}

/// Three register selectors: two packed in the first byte, the
/// destination in the second.
pub fn three_reg(args: &[u8]) -> (u8, u8, u8) {
    let (a, b) = two_reg(args);
    (a, b, reg(byte(args, 1)))
}
