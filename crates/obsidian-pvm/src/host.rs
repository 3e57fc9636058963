//! The host-call boundary.
//!
//! The loop itself performs no effects beyond registers and memory; an
//! `ecalli` suspends it with [`ExitReason::HostCall`] and ownership of
//! the [`ExecutionContext`] returns to the embedder. The embedder
//! performs the call (which may mutate registers, memory and gas, or
//! recursively drive a nested machine), advances the pc past the
//! suspended instruction, and re-enters the loop. No callback is ever
//! captured inside the machine.

use crate::context::ExecutionContext;
use crate::interpreter::{run, ExitReason};
use crate::program::Program;

/// What the embedder decided after servicing a host call.
#[derive(Debug)]
pub enum HostCallOutcome {
    /// Advance past the `ecalli` and keep executing.
    Resume,
    /// Stop the invocation with the given reason (e.g. the host function
    /// itself ran the service out of gas).
    Terminate(ExitReason),
}

/// Embedder-supplied host-call dispatch.
pub trait HostCallHandler {
    /// Service call `code` with full access to the invocation state.
    fn host_call(&mut self, code: u8, ctx: &mut ExecutionContext) -> HostCallOutcome;
}

/// A function table keyed by call code.
///
/// Unregistered codes terminate the invocation with a panic exit;
/// embedders wanting a different policy implement [`HostCallHandler`]
/// directly.
#[derive(Default)]
pub struct HostCallTable {
    entries: Vec<(u8, Box<dyn FnMut(&mut ExecutionContext) -> HostCallOutcome>)>,
}

impl HostCallTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for `code`.
    pub fn register<F>(&mut self, code: u8, f: F)
    where
        F: FnMut(&mut ExecutionContext) -> HostCallOutcome + 'static,
    {
        self.entries.retain(|(c, _)| *c != code);
        self.entries.push((code, Box::new(f)));
    }
}

impl HostCallHandler for HostCallTable {
    fn host_call(&mut self, code: u8, ctx: &mut ExecutionContext) -> HostCallOutcome {
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some((_, f)) => f(ctx),
            None => {
                tracing::debug!(code, "unregistered host call");
                HostCallOutcome::Terminate(ExitReason::Panic)
            }
        }
    }
}

/// Drive the loop to a non-suspending exit, servicing host calls
/// through `handler`.
pub fn run_with_host(
    program: &Program,
    ctx: &mut ExecutionContext,
    handler: &mut dyn HostCallHandler,
) -> ExitReason {
    loop {
        match run(program, ctx) {
            ExitReason::HostCall { code } => {
                tracing::debug!(code, pc = ctx.pc, "host call");
                match handler.host_call(code, ctx) {
                    HostCallOutcome::Resume => {
                        // The loop left the pc on the ecalli itself.
                        ctx.pc += program.skip(ctx.pc);
                    }
                    HostCallOutcome::Terminate(reason) => return reason,
                }
            }
            reason => return reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::opcode;
    use crate::test_support::assemble;
    use crate::HALT_ADDRESS;

    #[test]
    fn test_resume_after_host_call() {
        // ecalli 7 twice, then return through the halt sentinel.
        let program = assemble(&[
            &[opcode::ECALLI, 7],
            &[opcode::ECALLI, 7],
            &[opcode::JUMP_IND, 0x00],
        ]);
        let mut ctx = ExecutionContext::new(0, 100);
        ctx.registers.set(0, HALT_ADDRESS as u64);

        let mut calls = 0u64;
        let mut table = HostCallTable::new();
        table.register(7, move |ctx: &mut ExecutionContext| {
            calls += 1;
            ctx.registers.set(1, calls);
            HostCallOutcome::Resume
        });

        assert_eq!(run_with_host(&program, &mut ctx, &mut table), ExitReason::Halt);
        assert_eq!(ctx.registers.get(1), 2);
        // Three executed instructions, each one gas.
        assert_eq!(ctx.gas, 97);
    }

    #[test]
    fn test_unregistered_code_terminates() {
        let program = assemble(&[&[opcode::ECALLI, 9]]);
        let mut ctx = ExecutionContext::new(0, 100);
        let mut table = HostCallTable::new();
        assert_eq!(
            run_with_host(&program, &mut ctx, &mut table),
            ExitReason::Panic
        );
        assert_eq!(ctx.pc, 0);
    }

    #[test]
    fn test_host_can_terminate_with_out_of_gas() {
        let program = assemble(&[&[opcode::ECALLI, 1]]);
        let mut ctx = ExecutionContext::new(0, 100);
        let mut table = HostCallTable::new();
        table.register(1, |ctx: &mut ExecutionContext| {
            ctx.gas = 0;
            HostCallOutcome::Terminate(ExitReason::OutOfGas)
        });
        assert_eq!(
            run_with_host(&program, &mut ctx, &mut table),
            ExitReason::OutOfGas
        );
        assert_eq!(ctx.gas, 0);
    }

    #[test]
    fn test_host_mutations_visible_to_program() {
        // Host writes a byte; the program then loads it.
        let program = assemble(&[
            &[opcode::ECALLI, 2],
            &[opcode::LOAD_U8, 0x03, 0x00, 0x50], // r3 = mem[0x5000]
            &[opcode::JUMP_IND, 0x00],
        ]);
        let mut ctx = ExecutionContext::new(0, 100);
        ctx.registers.set(0, HALT_ADDRESS as u64);

        let mut table = HostCallTable::new();
        table.register(2, |ctx: &mut ExecutionContext| {
            ctx.memory.upsert_acl(5, crate::PageAccess::Read);
            ctx.memory.poke(0x5000, &[0x5A]);
            HostCallOutcome::Resume
        });

        assert_eq!(run_with_host(&program, &mut ctx, &mut table), ExitReason::Halt);
        assert_eq!(ctx.registers.get(3), 0x5A);
    }
}
