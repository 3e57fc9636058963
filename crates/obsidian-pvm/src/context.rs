//! Per-invocation execution state.

use crate::memory::Memory;
use crate::registers::Registers;
use crate::Gas;

/// The unit of invocation state: program counter, remaining gas, the
/// register bank and the paged memory.
///
/// A context is created fresh per invocation, mutated in place by every
/// executed instruction, and either discarded at the exit reason or
/// carried into the next resumed segment (host calls, page-fault
/// retries). Cloning is deep; audit and replay callers clone before
/// running.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Program counter: byte offset into the code.
    pub pc: u32,
    /// Remaining gas. Signed so decrement-then-check is well-defined.
    pub gas: Gas,
    pub registers: Registers,
    pub memory: Memory,
}

impl ExecutionContext {
    /// Fresh context at `pc` with a gas budget, zeroed registers and
    /// empty memory.
    pub fn new(pc: u32, gas: Gas) -> Self {
        Self {
            pc,
            gas,
            registers: Registers::new(),
            memory: Memory::new(),
        }
    }

    /// Replace the register bank.
    pub fn with_registers(mut self, registers: Registers) -> Self {
        self.registers = registers;
        self
    }

    /// Replace the memory.
    pub fn with_memory(mut self, memory: Memory) -> Self {
        self.memory = memory;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_deep() {
        let mut ctx = ExecutionContext::new(0, 100);
        ctx.registers.set(1, 55);
        ctx.memory.poke(0x1000, &[1, 2, 3]);

        let snapshot = ctx.clone();
        ctx.registers.set(1, 0);
        ctx.memory.poke(0x1000, &[9, 9, 9]);

        assert_eq!(snapshot.registers.get(1), 55);
        assert_eq!(snapshot.memory.peek(0x1000, 3), vec![1, 2, 3]);
    }
}
