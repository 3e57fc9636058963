//! Obsidian PVM - deterministic gas-metered register machine.
//!
//! This crate provides:
//! - Program blob decoding (code, jump table, instruction-boundary bitmask)
//! - A 13-register, 64-bit execution context with paged memory
//! - The fetch/charge/decode/execute interpreter loop
//! - Flat per-instruction gas metering
//! - The host-call suspend/resume boundary
//!
//! Every exit from the interpreter is an [`ExitReason`] value; the loop
//! never panics and never throws. Identical `(Program, ExecutionContext)`
//! pairs always produce identical results on every platform.

pub mod context;
pub mod decode;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod isa;
pub mod memory;
pub mod ops;
pub mod program;
pub mod registers;

#[cfg(test)]
mod test_support;

pub use context::ExecutionContext;
pub use error::ProgramError;
pub use host::{HostCallHandler, HostCallOutcome, HostCallTable, run_with_host};
pub use interpreter::{run, ExitReason};
pub use memory::{Memory, PageAccess};
pub use program::Program;
pub use registers::Registers;

/// Gas is signed so that decrement-then-check is well-defined.
pub type Gas = i64;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 13;

/// Memory page size in bytes.
pub const PAGE_SIZE: u32 = 4096;

/// Number of addressable pages (4 GiB address space).
pub const PAGE_COUNT: u32 = 1 << 20;

/// Maximum number of trailing argument bytes a single instruction may carry.
pub const MAX_ARG_LEN: u32 = 24;

/// Dynamic-jump address that signals a clean return.
pub const HALT_ADDRESS: u32 = u32::MAX - u16::MAX as u32; // 2^32 - 2^16

/// Alignment factor for dynamic-jump addresses.
pub const JUMP_ALIGNMENT: u32 = 2;
