//! Opcode dispatch table.
//!
//! One handler per opcode, registered in a 256-entry table so dispatch
//! is a single index and adding or auditing an instruction is
//! mechanical. Each handler decodes its own arguments with the shape
//! function its opcode block prescribes, applies the effect to the
//! context, and reports how it left the program counter.
//!
//! Register conventions:
//! - two-register ops: low nibble = destination, high nibble = source
//!   (for stores, low nibble = value source, high nibble = base);
//! - three-register ops: the packed byte carries the two sources, the
//!   following byte the destination.
//!
//! Fixed-width (`_32`) results are computed at 32 bits and then
//! sign-extended into the full 64-bit register, RV64 style. Division
//! and remainder follow RISC-V edge semantics: division by zero yields
//! all ones, remainder by zero yields the dividend, and signed
//! `MIN / -1` yields `MIN` with a zero remainder. None of these panic
//! or cost extra gas.

use once_cell::sync::Lazy;

use crate::context::ExecutionContext;
use crate::decode;
use crate::interpreter::{dynamic_jump, take_branch, Control, ExitReason};
use crate::isa::opcode::*;
use crate::program::Program;

pub(crate) type ExecFn =
    fn(&Program, &mut ExecutionContext, &[u8], u32) -> Result<Control, ExitReason>;

#[derive(Clone, Copy)]
pub(crate) struct OpHandler {
    pub name: &'static str,
    pub exec: ExecFn,
}

static TABLE: Lazy<[OpHandler; 256]> = Lazy::new(build_table);

#[inline]
pub(crate) fn lookup(op: u8) -> OpHandler {
    TABLE[op as usize]
}

/// Mnemonic for an opcode; "invalid" for unassigned numbers.
pub fn name(op: u8) -> &'static str {
    TABLE[op as usize].name
}

// ---------------------------------------------------------------------
// Shared executor plumbing
// ---------------------------------------------------------------------

/// Sign-extend a 32-bit result into the 64-bit register storage.
#[inline]
fn sext32(v: u32) -> u64 {
    v as i32 as i64 as u64
}

fn load(
    ctx: &mut ExecutionContext,
    dst: u8,
    addr: u32,
    len: usize,
    signed: bool,
) -> Result<Control, ExitReason> {
    let mut buf = [0u8; 8];
    ctx.memory
        .read_into(addr, &mut buf[..len])
        .map_err(|address| ExitReason::PageFault { address })?;
    let mut value = u64::from_le_bytes(buf);
    if signed {
        value = decode::sign_extend(len, value);
    }
    ctx.registers.set(dst, value);
    Ok(Control::Next)
}

fn store(
    ctx: &mut ExecutionContext,
    addr: u32,
    value: u64,
    len: usize,
) -> Result<Control, ExitReason> {
    let bytes = value.to_le_bytes();
    ctx.memory
        .write_at(addr, &bytes[..len])
        .map_err(|address| ExitReason::PageFault { address })?;
    Ok(Control::Next)
}

/// `store_imm_*`: immediate address, immediate value.
fn store_imm(ctx: &mut ExecutionContext, args: &[u8], len: usize) -> Result<Control, ExitReason> {
    let (addr, value) = decode::two_imm(args);
    store(ctx, addr as u32, value, len)
}

/// `load_*`: absolute immediate address into a register.
fn load_abs(
    ctx: &mut ExecutionContext,
    args: &[u8],
    len: usize,
    signed: bool,
) -> Result<Control, ExitReason> {
    let (dst, addr) = decode::one_reg_one_imm(args);
    load(ctx, dst, addr as u32, len, signed)
}

/// `store_*`: register value to an absolute immediate address.
fn store_abs(ctx: &mut ExecutionContext, args: &[u8], len: usize) -> Result<Control, ExitReason> {
    let (src, addr) = decode::one_reg_one_imm(args);
    let value = ctx.registers.get(src);
    store(ctx, addr as u32, value, len)
}

/// `store_imm_ind_*`: immediate value to base register + offset.
fn store_imm_ind(
    ctx: &mut ExecutionContext,
    args: &[u8],
    len: usize,
) -> Result<Control, ExitReason> {
    let (base, offset, value) = decode::one_reg_two_imm(args);
    let addr = ctx.registers.get(base).wrapping_add(offset) as u32;
    store(ctx, addr, value, len)
}

/// `store_ind_*`: register value to base register + offset.
fn store_ind(ctx: &mut ExecutionContext, args: &[u8], len: usize) -> Result<Control, ExitReason> {
    let (src, base, offset) = decode::two_reg_one_imm(args);
    let addr = ctx.registers.get(base).wrapping_add(offset) as u32;
    let value = ctx.registers.get(src);
    store(ctx, addr, value, len)
}

/// `load_ind_*`: base register + offset into a register.
fn load_ind(
    ctx: &mut ExecutionContext,
    args: &[u8],
    len: usize,
    signed: bool,
) -> Result<Control, ExitReason> {
    let (dst, base, offset) = decode::two_reg_one_imm(args);
    let addr = ctx.registers.get(base).wrapping_add(offset) as u32;
    load(ctx, dst, addr, len, signed)
}

/// `branch_*_imm`: compare one register against an immediate.
fn branch_imm(
    program: &Program,
    ctx: &mut ExecutionContext,
    args: &[u8],
    pc: u32,
    taken: fn(u64, u64) -> bool,
) -> Result<Control, ExitReason> {
    let (reg, imm, offset) = decode::one_reg_one_imm_one_offset(args);
    if taken(ctx.registers.get(reg), imm) {
        take_branch(program, pc, offset)
    } else {
        Ok(Control::Next)
    }
}

/// `branch_*`: compare two registers.
fn branch_reg(
    program: &Program,
    ctx: &mut ExecutionContext,
    args: &[u8],
    pc: u32,
    taken: fn(u64, u64) -> bool,
) -> Result<Control, ExitReason> {
    let (a, b, offset) = decode::two_reg_one_offset(args);
    if taken(ctx.registers.get(a), ctx.registers.get(b)) {
        take_branch(program, pc, offset)
    } else {
        Ok(Control::Next)
    }
}

/// Register/immediate ALU op writing the destination register.
fn alu_imm(ctx: &mut ExecutionContext, args: &[u8], f: fn(u64, u64) -> u64) -> Result<Control, ExitReason> {
    let (dst, src, imm) = decode::two_reg_one_imm(args);
    let value = f(ctx.registers.get(src), imm);
    ctx.registers.set(dst, value);
    Ok(Control::Next)
}

/// Three-register ALU op.
fn alu_reg(ctx: &mut ExecutionContext, args: &[u8], f: fn(u64, u64) -> u64) -> Result<Control, ExitReason> {
    let (a, b, dst) = decode::three_reg(args);
    let value = f(ctx.registers.get(a), ctx.registers.get(b));
    ctx.registers.set(dst, value);
    Ok(Control::Next)
}

/// Unary two-register op.
fn unary_reg(ctx: &mut ExecutionContext, args: &[u8], f: fn(u64) -> u64) -> Result<Control, ExitReason> {
    let (dst, src) = decode::two_reg(args);
    let value = f(ctx.registers.get(src));
    ctx.registers.set(dst, value);
    Ok(Control::Next)
}

// ---------------------------------------------------------------------
// ALU semantics
// ---------------------------------------------------------------------

fn add_32(a: u64, b: u64) -> u64 {
    sext32((a as u32).wrapping_add(b as u32))
}

fn sub_32(a: u64, b: u64) -> u64 {
    sext32((a as u32).wrapping_sub(b as u32))
}

fn mul_32(a: u64, b: u64) -> u64 {
    sext32((a as u32).wrapping_mul(b as u32))
}

fn div_u_32(a: u64, b: u64) -> u64 {
    match b as u32 {
        0 => u64::MAX,
        d => sext32(a as u32 / d),
    }
}

fn div_u_64(a: u64, b: u64) -> u64 {
    match b {
        0 => u64::MAX,
        d => a / d,
    }
}

fn div_s_32(a: u64, b: u64) -> u64 {
    let (a, b) = (a as u32 as i32, b as u32 as i32);
    match (a, b) {
        (_, 0) => u64::MAX,
        (i32::MIN, -1) => sext32(i32::MIN as u32),
        _ => sext32((a / b) as u32),
    }
}

fn div_s_64(a: u64, b: u64) -> u64 {
    let (a, b) = (a as i64, b as i64);
    match (a, b) {
        (_, 0) => u64::MAX,
        (i64::MIN, -1) => i64::MIN as u64,
        _ => (a / b) as u64,
    }
}

fn rem_u_32(a: u64, b: u64) -> u64 {
    match b as u32 {
        0 => sext32(a as u32),
        d => sext32(a as u32 % d),
    }
}

fn rem_u_64(a: u64, b: u64) -> u64 {
    match b {
        0 => a,
        d => a % d,
    }
}

fn rem_s_32(a: u64, b: u64) -> u64 {
    let (a, b) = (a as u32 as i32, b as u32 as i32);
    match (a, b) {
        (_, 0) => sext32(a as u32),
        (i32::MIN, -1) => 0,
        _ => sext32((a % b) as u32),
    }
}

fn rem_s_64(a: u64, b: u64) -> u64 {
    let (a, b) = (a as i64, b as i64);
    match (a, b) {
        (_, 0) => a as u64,
        (i64::MIN, -1) => 0,
        _ => (a % b) as u64,
    }
}

fn shlo_l_32(a: u64, b: u64) -> u64 {
    sext32((a as u32) << (b as u32 & 31))
}

fn shlo_l_64(a: u64, b: u64) -> u64 {
    a << (b & 63)
}

fn shlo_r_32(a: u64, b: u64) -> u64 {
    sext32((a as u32) >> (b as u32 & 31))
}

fn shlo_r_64(a: u64, b: u64) -> u64 {
    a >> (b & 63)
}

fn shar_r_32(a: u64, b: u64) -> u64 {
    sext32(((a as u32 as i32) >> (b as u32 & 31)) as u32)
}

fn shar_r_64(a: u64, b: u64) -> u64 {
    ((a as i64) >> (b & 63)) as u64
}

fn mul_upper_s_s(a: u64, b: u64) -> u64 {
    (((a as i64 as i128) * (b as i64 as i128)) >> 64) as u64
}

fn mul_upper_u_u(a: u64, b: u64) -> u64 {
    (((a as u128) * (b as u128)) >> 64) as u64
}

fn mul_upper_s_u(a: u64, b: u64) -> u64 {
    (((a as i64 as i128) * (b as u128 as i128)) >> 64) as u64
}

// ---------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------

fn op_invalid(_: &Program, _: &mut ExecutionContext, _: &[u8], _: u32) -> Result<Control, ExitReason> {
    Err(ExitReason::Panic)
}

fn op_trap(_: &Program, _: &mut ExecutionContext, _: &[u8], _: u32) -> Result<Control, ExitReason> {
    Err(ExitReason::Panic)
}

fn op_fallthrough(_: &Program, _: &mut ExecutionContext, _: &[u8], _: u32) -> Result<Control, ExitReason> {
    Ok(Control::Next)
}

/// Suspends the loop; the embedder resumes past this instruction.
fn op_ecalli(_: &Program, _: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    Err(ExitReason::HostCall {
        code: decode::one_imm(args) as u8,
    })
}

fn op_load_imm_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    let (dst, value) = decode::one_reg_ext_imm(args);
    ctx.registers.set(dst, value);
    Ok(Control::Next)
}

fn op_store_imm_u8(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_imm(ctx, args, 1)
}

fn op_store_imm_u16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_imm(ctx, args, 2)
}

fn op_store_imm_u32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_imm(ctx, args, 4)
}

fn op_store_imm_u64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_imm(ctx, args, 8)
}

fn op_jump(program: &Program, _: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    take_branch(program, pc, decode::one_offset(args))
}

fn op_jump_ind(program: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    let (base, offset) = decode::one_reg_one_imm(args);
    let addr = ctx.registers.get(base).wrapping_add(offset) as u32;
    dynamic_jump(program, addr)
}

fn op_load_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    let (dst, value) = decode::one_reg_one_imm(args);
    ctx.registers.set(dst, value);
    Ok(Control::Next)
}

fn op_load_u8(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_abs(ctx, args, 1, false)
}

fn op_load_i8(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_abs(ctx, args, 1, true)
}

fn op_load_u16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_abs(ctx, args, 2, false)
}

fn op_load_i16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_abs(ctx, args, 2, true)
}

fn op_load_u32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_abs(ctx, args, 4, false)
}

fn op_load_i32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_abs(ctx, args, 4, true)
}

fn op_load_u64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_abs(ctx, args, 8, false)
}

fn op_store_u8(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_abs(ctx, args, 1)
}

fn op_store_u16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_abs(ctx, args, 2)
}

fn op_store_u32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_abs(ctx, args, 4)
}

fn op_store_u64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_abs(ctx, args, 8)
}

fn op_store_imm_ind_u8(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_imm_ind(ctx, args, 1)
}

fn op_store_imm_ind_u16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_imm_ind(ctx, args, 2)
}

fn op_store_imm_ind_u32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_imm_ind(ctx, args, 4)
}

fn op_store_imm_ind_u64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_imm_ind(ctx, args, 8)
}

/// Sets the link register, then transfers. The register write stands
/// even when the transfer itself panics.
fn op_load_imm_jump(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    let (dst, value, offset) = decode::one_reg_one_imm_one_offset(args);
    ctx.registers.set(dst, value);
    take_branch(program, pc, offset)
}

fn op_branch_eq_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| a == b)
}

fn op_branch_ne_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| a != b)
}

fn op_branch_lt_u_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| a < b)
}

fn op_branch_le_u_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| a <= b)
}

fn op_branch_ge_u_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| a >= b)
}

fn op_branch_gt_u_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| a > b)
}

fn op_branch_lt_s_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| (a as i64) < b as i64)
}

fn op_branch_le_s_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| a as i64 <= b as i64)
}

fn op_branch_ge_s_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| a as i64 >= b as i64)
}

fn op_branch_gt_s_imm(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_imm(program, ctx, args, pc, |a, b| a as i64 > b as i64)
}

fn op_move_reg(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| v)
}

fn op_sbrk(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    let (dst, src) = decode::two_reg(args);
    let delta = ctx.registers.get(src) as u32;
    let pointer = ctx.memory.sbrk(delta);
    ctx.registers.set(dst, pointer as u64);
    Ok(Control::Next)
}

fn op_count_set_bits_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| v.count_ones() as u64)
}

fn op_count_set_bits_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| (v as u32).count_ones() as u64)
}

fn op_leading_zero_bits_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| v.leading_zeros() as u64)
}

fn op_leading_zero_bits_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| (v as u32).leading_zeros() as u64)
}

fn op_trailing_zero_bits_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| v.trailing_zeros() as u64)
}

fn op_trailing_zero_bits_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| (v as u32).trailing_zeros() as u64)
}

fn op_sign_extend_8(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| decode::sign_extend(1, v))
}

fn op_sign_extend_16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| decode::sign_extend(2, v))
}

fn op_zero_extend_16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, |v| v & 0xFFFF)
}

fn op_reverse_bytes(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    unary_reg(ctx, args, u64::swap_bytes)
}

fn op_store_ind_u8(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_ind(ctx, args, 1)
}

fn op_store_ind_u16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_ind(ctx, args, 2)
}

fn op_store_ind_u32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_ind(ctx, args, 4)
}

fn op_store_ind_u64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    store_ind(ctx, args, 8)
}

fn op_load_ind_u8(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_ind(ctx, args, 1, false)
}

fn op_load_ind_i8(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_ind(ctx, args, 1, true)
}

fn op_load_ind_u16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_ind(ctx, args, 2, false)
}

fn op_load_ind_i16(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_ind(ctx, args, 2, true)
}

fn op_load_ind_u32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_ind(ctx, args, 4, false)
}

fn op_load_ind_i32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_ind(ctx, args, 4, true)
}

fn op_load_ind_u64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    load_ind(ctx, args, 8, false)
}

fn op_add_imm_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, add_32)
}

fn op_add_imm_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, u64::wrapping_add)
}

fn op_and_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| a & b)
}

fn op_xor_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| a ^ b)
}

fn op_or_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| a | b)
}

fn op_mul_imm_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, mul_32)
}

fn op_mul_imm_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, u64::wrapping_mul)
}

fn op_set_lt_u_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| (a < b) as u64)
}

fn op_set_lt_s_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| ((a as i64) < b as i64) as u64)
}

fn op_shlo_l_imm_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, shlo_l_32)
}

fn op_shlo_l_imm_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, shlo_l_64)
}

fn op_shlo_r_imm_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, shlo_r_32)
}

fn op_shlo_r_imm_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, shlo_r_64)
}

fn op_shar_r_imm_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, shar_r_32)
}

fn op_shar_r_imm_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, shar_r_64)
}

fn op_neg_add_imm_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| sub_32(b, a))
}

fn op_neg_add_imm_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| b.wrapping_sub(a))
}

fn op_set_gt_u_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| (a > b) as u64)
}

fn op_set_gt_s_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| (a as i64 > b as i64) as u64)
}

fn op_cmov_iz_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    let (dst, cond, value) = decode::two_reg_one_imm(args);
    if ctx.registers.get(cond) == 0 {
        ctx.registers.set(dst, value);
    }
    Ok(Control::Next)
}

fn op_cmov_nz_imm(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    let (dst, cond, value) = decode::two_reg_one_imm(args);
    if ctx.registers.get(cond) != 0 {
        ctx.registers.set(dst, value);
    }
    Ok(Control::Next)
}

fn op_rot_r_imm_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| sext32((a as u32).rotate_right(b as u32 & 31)))
}

fn op_rot_r_imm_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_imm(ctx, args, |a, b| a.rotate_right(b as u32 & 63))
}

fn op_branch_eq(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_reg(program, ctx, args, pc, |a, b| a == b)
}

fn op_branch_ne(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_reg(program, ctx, args, pc, |a, b| a != b)
}

fn op_branch_lt_u(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_reg(program, ctx, args, pc, |a, b| a < b)
}

fn op_branch_lt_s(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_reg(program, ctx, args, pc, |a, b| (a as i64) < b as i64)
}

fn op_branch_ge_u(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_reg(program, ctx, args, pc, |a, b| a >= b)
}

fn op_branch_ge_s(program: &Program, ctx: &mut ExecutionContext, args: &[u8], pc: u32) -> Result<Control, ExitReason> {
    branch_reg(program, ctx, args, pc, |a, b| a as i64 >= b as i64)
}

/// Reads the base register before writing the link register, so the
/// pair behaves as one simultaneous assignment even when both name the
/// same register.
fn op_load_imm_jump_ind(program: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    let (dst, base, value, offset) = decode::two_reg_two_imm(args);
    let addr = ctx.registers.get(base).wrapping_add(offset) as u32;
    ctx.registers.set(dst, value);
    dynamic_jump(program, addr)
}

fn op_add_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, add_32)
}

fn op_add_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, u64::wrapping_add)
}

fn op_sub_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, sub_32)
}

fn op_sub_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, u64::wrapping_sub)
}

fn op_mul_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, mul_32)
}

fn op_mul_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, u64::wrapping_mul)
}

fn op_div_u_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, div_u_32)
}

fn op_div_u_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, div_u_64)
}

fn op_div_s_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, div_s_32)
}

fn op_div_s_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, div_s_64)
}

fn op_rem_u_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, rem_u_32)
}

fn op_rem_u_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, rem_u_64)
}

fn op_rem_s_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, rem_s_32)
}

fn op_rem_s_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, rem_s_64)
}

fn op_shlo_l_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, shlo_l_32)
}

fn op_shlo_l_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, shlo_l_64)
}

fn op_shlo_r_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, shlo_r_32)
}

fn op_shlo_r_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, shlo_r_64)
}

fn op_shar_r_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, shar_r_32)
}

fn op_shar_r_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, shar_r_64)
}

fn op_and(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| a & b)
}

fn op_xor(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| a ^ b)
}

fn op_or(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| a | b)
}

fn op_mul_upper_s_s(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, mul_upper_s_s)
}

fn op_mul_upper_u_u(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, mul_upper_u_u)
}

fn op_mul_upper_s_u(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, mul_upper_s_u)
}

fn op_set_lt_u(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| (a < b) as u64)
}

fn op_set_lt_s(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| ((a as i64) < b as i64) as u64)
}

fn op_cmov_iz(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    let (src, cond, dst) = decode::three_reg(args);
    if ctx.registers.get(cond) == 0 {
        let value = ctx.registers.get(src);
        ctx.registers.set(dst, value);
    }
    Ok(Control::Next)
}

fn op_cmov_nz(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    let (src, cond, dst) = decode::three_reg(args);
    if ctx.registers.get(cond) != 0 {
        let value = ctx.registers.get(src);
        ctx.registers.set(dst, value);
    }
    Ok(Control::Next)
}

fn op_rot_l_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| sext32((a as u32).rotate_left(b as u32 & 31)))
}

fn op_rot_l_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| a.rotate_left(b as u32 & 63))
}

fn op_rot_r_32(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| sext32((a as u32).rotate_right(b as u32 & 31)))
}

fn op_rot_r_64(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| a.rotate_right(b as u32 & 63))
}

fn op_and_inv(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| a & !b)
}

fn op_or_inv(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| a | !b)
}

fn op_xnor(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| !(a ^ b))
}

fn op_max(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| (a as i64).max(b as i64) as u64)
}

fn op_max_u(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, u64::max)
}

fn op_min(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, |a, b| (a as i64).min(b as i64) as u64)
}

fn op_min_u(_: &Program, ctx: &mut ExecutionContext, args: &[u8], _: u32) -> Result<Control, ExitReason> {
    alu_reg(ctx, args, u64::min)
}

fn build_table() -> [OpHandler; 256] {
    let mut table = [OpHandler {
        name: "invalid",
        exec: op_invalid as ExecFn,
    }; 256];

    let defs: &[(u8, &'static str, ExecFn)] = &[
        (TRAP, "trap", op_trap),
        (FALLTHROUGH, "fallthrough", op_fallthrough),
        (ECALLI, "ecalli", op_ecalli),
        (LOAD_IMM_64, "load_imm_64", op_load_imm_64),
        (STORE_IMM_U8, "store_imm_u8", op_store_imm_u8),
        (STORE_IMM_U16, "store_imm_u16", op_store_imm_u16),
        (STORE_IMM_U32, "store_imm_u32", op_store_imm_u32),
        (STORE_IMM_U64, "store_imm_u64", op_store_imm_u64),
        (JUMP, "jump", op_jump),
        (JUMP_IND, "jump_ind", op_jump_ind),
        (LOAD_IMM, "load_imm", op_load_imm),
        (LOAD_U8, "load_u8", op_load_u8),
        (LOAD_I8, "load_i8", op_load_i8),
        (LOAD_U16, "load_u16", op_load_u16),
        (LOAD_I16, "load_i16", op_load_i16),
        (LOAD_U32, "load_u32", op_load_u32),
        (LOAD_I32, "load_i32", op_load_i32),
        (LOAD_U64, "load_u64", op_load_u64),
        (STORE_U8, "store_u8", op_store_u8),
        (STORE_U16, "store_u16", op_store_u16),
        (STORE_U32, "store_u32", op_store_u32),
        (STORE_U64, "store_u64", op_store_u64),
        (STORE_IMM_IND_U8, "store_imm_ind_u8", op_store_imm_ind_u8),
        (STORE_IMM_IND_U16, "store_imm_ind_u16", op_store_imm_ind_u16),
        (STORE_IMM_IND_U32, "store_imm_ind_u32", op_store_imm_ind_u32),
        (STORE_IMM_IND_U64, "store_imm_ind_u64", op_store_imm_ind_u64),
        (LOAD_IMM_JUMP, "load_imm_jump", op_load_imm_jump),
        (BRANCH_EQ_IMM, "branch_eq_imm", op_branch_eq_imm),
        (BRANCH_NE_IMM, "branch_ne_imm", op_branch_ne_imm),
        (BRANCH_LT_U_IMM, "branch_lt_u_imm", op_branch_lt_u_imm),
        (BRANCH_LE_U_IMM, "branch_le_u_imm", op_branch_le_u_imm),
        (BRANCH_GE_U_IMM, "branch_ge_u_imm", op_branch_ge_u_imm),
        (BRANCH_GT_U_IMM, "branch_gt_u_imm", op_branch_gt_u_imm),
        (BRANCH_LT_S_IMM, "branch_lt_s_imm", op_branch_lt_s_imm),
        (BRANCH_LE_S_IMM, "branch_le_s_imm", op_branch_le_s_imm),
        (BRANCH_GE_S_IMM, "branch_ge_s_imm", op_branch_ge_s_imm),
        (BRANCH_GT_S_IMM, "branch_gt_s_imm", op_branch_gt_s_imm),
        (MOVE_REG, "move_reg", op_move_reg),
        (SBRK, "sbrk", op_sbrk),
        (COUNT_SET_BITS_64, "count_set_bits_64", op_count_set_bits_64),
        (COUNT_SET_BITS_32, "count_set_bits_32", op_count_set_bits_32),
        (LEADING_ZERO_BITS_64, "leading_zero_bits_64", op_leading_zero_bits_64),
        (LEADING_ZERO_BITS_32, "leading_zero_bits_32", op_leading_zero_bits_32),
        (TRAILING_ZERO_BITS_64, "trailing_zero_bits_64", op_trailing_zero_bits_64),
        (TRAILING_ZERO_BITS_32, "trailing_zero_bits_32", op_trailing_zero_bits_32),
        (SIGN_EXTEND_8, "sign_extend_8", op_sign_extend_8),
        (SIGN_EXTEND_16, "sign_extend_16", op_sign_extend_16),
        (ZERO_EXTEND_16, "zero_extend_16", op_zero_extend_16),
        (REVERSE_BYTES, "reverse_bytes", op_reverse_bytes),
        (STORE_IND_U8, "store_ind_u8", op_store_ind_u8),
        (STORE_IND_U16, "store_ind_u16", op_store_ind_u16),
        (STORE_IND_U32, "store_ind_u32", op_store_ind_u32),
        (STORE_IND_U64, "store_ind_u64", op_store_ind_u64),
        (LOAD_IND_U8, "load_ind_u8", op_load_ind_u8),
        (LOAD_IND_I8, "load_ind_i8", op_load_ind_i8),
        (LOAD_IND_U16, "load_ind_u16", op_load_ind_u16),
        (LOAD_IND_I16, "load_ind_i16", op_load_ind_i16),
        (LOAD_IND_U32, "load_ind_u32", op_load_ind_u32),
        (LOAD_IND_I32, "load_ind_i32", op_load_ind_i32),
        (LOAD_IND_U64, "load_ind_u64", op_load_ind_u64),
        (ADD_IMM_32, "add_imm_32", op_add_imm_32),
        (ADD_IMM_64, "add_imm_64", op_add_imm_64),
        (AND_IMM, "and_imm", op_and_imm),
        (XOR_IMM, "xor_imm", op_xor_imm),
        (OR_IMM, "or_imm", op_or_imm),
        (MUL_IMM_32, "mul_imm_32", op_mul_imm_32),
        (MUL_IMM_64, "mul_imm_64", op_mul_imm_64),
        (SET_LT_U_IMM, "set_lt_u_imm", op_set_lt_u_imm),
        (SET_LT_S_IMM, "set_lt_s_imm", op_set_lt_s_imm),
        (SHLO_L_IMM_32, "shlo_l_imm_32", op_shlo_l_imm_32),
        (SHLO_L_IMM_64, "shlo_l_imm_64", op_shlo_l_imm_64),
        (SHLO_R_IMM_32, "shlo_r_imm_32", op_shlo_r_imm_32),
        (SHLO_R_IMM_64, "shlo_r_imm_64", op_shlo_r_imm_64),
        (SHAR_R_IMM_32, "shar_r_imm_32", op_shar_r_imm_32),
        (SHAR_R_IMM_64, "shar_r_imm_64", op_shar_r_imm_64),
        (NEG_ADD_IMM_32, "neg_add_imm_32", op_neg_add_imm_32),
        (NEG_ADD_IMM_64, "neg_add_imm_64", op_neg_add_imm_64),
        (SET_GT_U_IMM, "set_gt_u_imm", op_set_gt_u_imm),
        (SET_GT_S_IMM, "set_gt_s_imm", op_set_gt_s_imm),
        (CMOV_IZ_IMM, "cmov_iz_imm", op_cmov_iz_imm),
        (CMOV_NZ_IMM, "cmov_nz_imm", op_cmov_nz_imm),
        (ROT_R_IMM_32, "rot_r_imm_32", op_rot_r_imm_32),
        (ROT_R_IMM_64, "rot_r_imm_64", op_rot_r_imm_64),
        (BRANCH_EQ, "branch_eq", op_branch_eq),
        (BRANCH_NE, "branch_ne", op_branch_ne),
        (BRANCH_LT_U, "branch_lt_u", op_branch_lt_u),
        (BRANCH_LT_S, "branch_lt_s", op_branch_lt_s),
        (BRANCH_GE_U, "branch_ge_u", op_branch_ge_u),
        (BRANCH_GE_S, "branch_ge_s", op_branch_ge_s),
        (LOAD_IMM_JUMP_IND, "load_imm_jump_ind", op_load_imm_jump_ind),
        (ADD_32, "add_32", op_add_32),
        (ADD_64, "add_64", op_add_64),
        (SUB_32, "sub_32", op_sub_32),
        (SUB_64, "sub_64", op_sub_64),
        (MUL_32, "mul_32", op_mul_32),
        (MUL_64, "mul_64", op_mul_64),
        (DIV_U_32, "div_u_32", op_div_u_32),
        (DIV_U_64, "div_u_64", op_div_u_64),
        (DIV_S_32, "div_s_32", op_div_s_32),
        (DIV_S_64, "div_s_64", op_div_s_64),
        (REM_U_32, "rem_u_32", op_rem_u_32),
        (REM_U_64, "rem_u_64", op_rem_u_64),
        (REM_S_32, "rem_s_32", op_rem_s_32),
        (REM_S_64, "rem_s_64", op_rem_s_64),
        (SHLO_L_32, "shlo_l_32", op_shlo_l_32),
        (SHLO_L_64, "shlo_l_64", op_shlo_l_64),
        (SHLO_R_32, "shlo_r_32", op_shlo_r_32),
        (SHLO_R_64, "shlo_r_64", op_shlo_r_64),
        (SHAR_R_32, "shar_r_32", op_shar_r_32),
        (SHAR_R_64, "shar_r_64", op_shar_r_64),
        (AND, "and", op_and),
        (XOR, "xor", op_xor),
        (OR, "or", op_or),
        (MUL_UPPER_S_S, "mul_upper_s_s", op_mul_upper_s_s),
        (MUL_UPPER_U_U, "mul_upper_u_u", op_mul_upper_u_u),
        (MUL_UPPER_S_U, "mul_upper_s_u", op_mul_upper_s_u),
        (SET_LT_U, "set_lt_u", op_set_lt_u),
        (SET_LT_S, "set_lt_s", op_set_lt_s),
        (CMOV_IZ, "cmov_iz", op_cmov_iz),
        (CMOV_NZ, "cmov_nz", op_cmov_nz),
        (ROT_L_32, "rot_l_32", op_rot_l_32),
        (ROT_L_64, "rot_l_64", op_rot_l_64),
        (ROT_R_32, "rot_r_32", op_rot_r_32),
        (ROT_R_64, "rot_r_64", op_rot_r_64),
        (AND_INV, "and_inv", op_and_inv),
        (OR_INV, "or_inv", op_or_inv),
        (XNOR, "xnor", op_xnor),
        (MAX, "max", op_max),
        (MAX_U, "max_u", op_max_u),
        (MIN, "min", op_min),
        (MIN_U, "min_u", op_min_u),
    ];
    for &(op, name, exec) in defs {
        table[op as usize] = OpHandler { name, exec };
    }
    table
}
