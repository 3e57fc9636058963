//! The fetch/charge/decode/execute loop.
//!
//! Per step, in order: out-of-gas check, pc bounds check, flat 1-gas
//! charge, argument slicing from the precomputed skip table, dispatch
//! through the opcode table. Executors return an explicit [`Control`]
//! value instead of toggling a shared "pc handled" flag; the loop
//! auto-advances only on [`Control::Next`].
//!
//! Every exit is a returned [`ExitReason`] value. The loop never panics
//! and performs no I/O, clock, or randomness access; identical inputs
//! yield identical results on every platform.

use crate::context::ExecutionContext;
use crate::ops;
use crate::program::Program;
use crate::{HALT_ADDRESS, JUMP_ALIGNMENT};

/// Terminal (or suspending) result of one run of the execution loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Clean return via the dynamic-jump sentinel address.
    Halt,
    /// Invalid opcode, pc out of bounds, or an illegal jump/branch target.
    Panic,
    /// Gas exhausted before an instruction could execute.
    OutOfGas,
    /// Access to an address lacking the required page ACL. The faulting
    /// instruction committed nothing; the embedder may extend the ACL
    /// and re-run the same context.
    PageFault { address: u32 },
    /// Suspension at an `ecalli`. Not terminal in spirit: the embedder
    /// performs the call, advances pc past the instruction, and re-runs.
    HostCall { code: u8 },
}

/// How the executed instruction left the program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    /// Advance to the next instruction boundary.
    Next,
    /// Transfer to an already-validated absolute target.
    Jump(u32),
}

/// Resolve a taken branch: `offset` is relative to the branching
/// instruction's own address, and the target must begin a basic block.
pub(crate) fn take_branch(
    program: &Program,
    pc: u32,
    offset: i64,
) -> Result<Control, ExitReason> {
    let target = pc.wrapping_add(offset as u32);
    if program.is_block_beginning(target) {
        Ok(Control::Jump(target))
    } else {
        Err(ExitReason::Panic)
    }
}

/// Resolve a dynamic (indirect) jump to address `addr`.
pub(crate) fn dynamic_jump(program: &Program, addr: u32) -> Result<Control, ExitReason> {
    if addr == HALT_ADDRESS {
        return Err(ExitReason::Halt);
    }
    if addr == 0 || addr % JUMP_ALIGNMENT != 0 {
        return Err(ExitReason::Panic);
    }
    let index = addr / JUMP_ALIGNMENT;
    if index as usize > program.jump_table().len() {
        return Err(ExitReason::Panic);
    }
    let target = program.jump_table()[index as usize - 1];
    if program.is_block_beginning(target) {
        Ok(Control::Jump(target))
    } else {
        Err(ExitReason::Panic)
    }
}

/// Drive the loop until it produces an [`ExitReason`].
///
/// On [`ExitReason::HostCall`] the pc still points at the `ecalli`; the
/// embedder must advance it by the instruction's own skip before
/// re-entering (see [`crate::host`]).
pub fn run(program: &Program, ctx: &mut ExecutionContext) -> ExitReason {
    let code = program.code();
    let reason = loop {
        if ctx.gas <= 0 {
            break ExitReason::OutOfGas;
        }
        let pc = ctx.pc;
        if pc as usize >= code.len() {
            break ExitReason::Panic;
        }
        ctx.gas -= 1;

        let skip = program.skip(pc);
        let args = &code[pc as usize + 1..pc as usize + skip as usize];
        let handler = ops::lookup(code[pc as usize]);
        match (handler.exec)(program, ctx, args, pc) {
            Ok(Control::Next) => ctx.pc = pc + skip,
            Ok(Control::Jump(target)) => ctx.pc = target,
            Err(reason) => break reason,
        }
    };
    tracing::trace!(?reason, pc = ctx.pc, gas = ctx.gas, "loop exit");
    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::opcode;
    use crate::test_support::{assemble, assemble_with_jump_table};

    #[test]
    fn test_empty_program_panics() {
        let program = assemble(&[]);
        let mut ctx = ExecutionContext::new(0, 100);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
        assert_eq!(ctx.gas, 100);
    }

    #[test]
    fn test_trap_panics_without_advancing() {
        let program = assemble(&[&[opcode::FALLTHROUGH], &[opcode::TRAP]]);
        let mut ctx = ExecutionContext::new(0, 10);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
        assert_eq!(ctx.pc, 1);
        assert_eq!(ctx.gas, 8);
    }

    #[test]
    fn test_invalid_opcode_panics() {
        let program = assemble(&[&[0xFE]]);
        let mut ctx = ExecutionContext::new(0, 10);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
    }

    #[test]
    fn test_gas_boundary_exact() {
        // Exactly three instructions, the last one returning cleanly.
        let program = assemble(&[
            &[opcode::FALLTHROUGH],
            &[opcode::FALLTHROUGH],
            &[opcode::JUMP_IND, 0x00],
        ]);

        // gas = 3: every instruction executes, no OutOfGas.
        let mut ctx = ExecutionContext::new(0, 3);
        ctx.registers.set(0, HALT_ADDRESS as u64);
        assert_eq!(run(&program, &mut ctx), ExitReason::Halt);
        assert_eq!(ctx.gas, 0);

        // gas = 2: the final instruction is never executed.
        let mut ctx = ExecutionContext::new(0, 2);
        ctx.registers.set(0, HALT_ADDRESS as u64);
        assert_eq!(run(&program, &mut ctx), ExitReason::OutOfGas);
        assert_eq!(ctx.gas, 0);
        assert_eq!(ctx.pc, 2);
    }

    #[test]
    fn test_gas_effects_not_applied_when_exhausted() {
        // load_imm r1, 7 twice; with gas 1 only the first lands.
        let program = assemble(&[
            &[opcode::LOAD_IMM, 0x01, 7],
            &[opcode::LOAD_IMM, 0x02, 9],
        ]);
        let mut ctx = ExecutionContext::new(0, 1);
        assert_eq!(run(&program, &mut ctx), ExitReason::OutOfGas);
        assert_eq!(ctx.registers.get(1), 7);
        assert_eq!(ctx.registers.get(2), 0);
    }

    #[test]
    fn test_jump_to_block_beginning() {
        // jump +3 over a trap onto a fresh block.
        let program = assemble(&[
            &[opcode::JUMP, 3],
            &[opcode::TRAP],
            &[opcode::LOAD_IMM, 0x03, 5],
            &[opcode::TRAP],
        ]);
        let mut ctx = ExecutionContext::new(0, 10);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
        assert_eq!(ctx.registers.get(3), 5);
        // Stopped at the final trap.
        assert_eq!(ctx.pc, 6);
    }

    #[test]
    fn test_taken_branch_to_non_block_beginning_panics() {
        // Target is a boundary but its predecessor is load_imm, not a
        // terminator.
        let program = assemble(&[
            &[opcode::JUMP, 5],
            &[opcode::LOAD_IMM, 0x01, 1],
            &[opcode::TRAP],
        ]);
        let mut ctx = ExecutionContext::new(0, 10);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
        assert_eq!(ctx.pc, 0);
    }

    #[test]
    fn test_untaken_branch_target_is_irrelevant() {
        // branch_eq_imm r0 == 1 would land mid-block, but r0 is 0.
        let program = assemble(&[
            &[opcode::BRANCH_EQ_IMM, 0x10, 1, 3],
            &[opcode::FALLTHROUGH],
            &[opcode::TRAP],
        ]);
        let mut ctx = ExecutionContext::new(0, 10);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
        assert_eq!(ctx.pc, 5);
        assert_eq!(ctx.gas, 7);
    }

    #[test]
    fn test_dynamic_jump_zero_panics_pc_unchanged() {
        let program = assemble(&[&[opcode::JUMP_IND, 0x00]]);
        let mut ctx = ExecutionContext::new(0, 10);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
        assert_eq!(ctx.pc, 0);
        assert_eq!(ctx.gas, 9);
    }

    #[test]
    fn test_dynamic_jump_halt_sentinel() {
        let program = assemble(&[&[opcode::JUMP_IND, 0x00]]);
        let mut ctx = ExecutionContext::new(0, 10);
        ctx.registers.set(0, HALT_ADDRESS as u64);
        assert_eq!(run(&program, &mut ctx), ExitReason::Halt);
        assert_eq!(ctx.pc, 0);
    }

    #[test]
    fn test_dynamic_jump_odd_address_panics() {
        let program = assemble(&[&[opcode::JUMP_IND, 0x00]]);
        let mut ctx = ExecutionContext::new(0, 10);
        ctx.registers.set(0, 3);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
    }

    #[test]
    fn test_dynamic_jump_through_table() {
        // Entry 1 (address 2) resolves to pc 2, a fresh block after the
        // jump_ind terminator.
        let program = assemble_with_jump_table(
            &[&[opcode::JUMP_IND, 0x00], &[opcode::TRAP]],
            vec![2],
        );
        let mut ctx = ExecutionContext::new(0, 10);
        ctx.registers.set(0, 2);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
        assert_eq!(ctx.pc, 2);
        assert_eq!(ctx.gas, 8);
    }

    #[test]
    fn test_dynamic_jump_index_out_of_range_panics() {
        let program = assemble_with_jump_table(&[&[opcode::JUMP_IND, 0x00]], vec![0]);
        let mut ctx = ExecutionContext::new(0, 10);
        ctx.registers.set(0, 4); // index 2 > table length 1
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
    }

    #[test]
    fn test_host_call_suspends_without_advancing() {
        let program = assemble(&[&[opcode::ECALLI, 42], &[opcode::TRAP]]);
        let mut ctx = ExecutionContext::new(0, 10);
        assert_eq!(run(&program, &mut ctx), ExitReason::HostCall { code: 42 });
        assert_eq!(ctx.pc, 0);
        assert_eq!(ctx.gas, 9);

        // Resuming per the boundary contract: advance past the ecalli.
        ctx.pc += program.skip(ctx.pc);
        assert_eq!(run(&program, &mut ctx), ExitReason::Panic);
        assert_eq!(ctx.pc, 2);
    }

    #[test]
    fn test_determinism_replay() {
        let program = assemble(&[
            &[opcode::LOAD_IMM, 0x01, 0xFF, 0xFF, 0xFF, 0xFF],
            &[opcode::LOAD_IMM, 0x02, 1],
            &[opcode::ADD_32, 0x21, 3],
            &[opcode::TRAP],
        ]);
        let ctx0 = ExecutionContext::new(0, 100);

        let mut a = ctx0.clone();
        let mut b = ctx0;
        let ra = run(&program, &mut a);
        let rb = run(&program, &mut b);
        assert_eq!(ra, rb);
        assert_eq!(a.registers, b.registers);
        assert_eq!(a.pc, b.pc);
        assert_eq!(a.gas, b.gas);
        // 0xFFFFFFFF + 1 truncates to zero at 32 bits.
        assert_eq!(a.registers.get(3), 0);
    }
}
