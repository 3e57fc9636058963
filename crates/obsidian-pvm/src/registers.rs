//! The general-purpose register bank.

use crate::REGISTER_COUNT;

/// Fixed bank of 13 raw 64-bit registers.
///
/// Values carry no signedness tag; each instruction interprets its
/// operands as signed or unsigned on its own. A bank is exclusively
/// owned by one [`crate::ExecutionContext`] and deep-cloned, never
/// aliased, across parallel invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers([u64; REGISTER_COUNT]);

impl Registers {
    /// All-zero register bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read register `r`.
    ///
    /// Selectors decoded from instruction bytes are already clamped to
    /// `0..=12`; anything larger here is a bug in the caller.
    #[inline]
    pub fn get(&self, r: u8) -> u64 {
        self.0[r as usize]
    }

    /// Write register `r`.
    #[inline]
    pub fn set(&mut self, r: u8, value: u64) {
        self.0[r as usize] = value;
    }

    /// Borrow the raw bank.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

impl From<[u64; REGISTER_COUNT]> for Registers {
    fn from(raw: [u64; REGISTER_COUNT]) -> Self {
        Self(raw)
    }
}

impl std::ops::Index<usize> for Registers {
    type Output = u64;

    fn index(&self, index: usize) -> &u64 {
        &self.0[index]
    }
}

impl std::ops::IndexMut<usize> for Registers {
    fn index_mut(&mut self, index: usize) -> &mut u64 {
        &mut self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip() {
        let mut regs = Registers::new();
        regs.set(0, u64::MAX);
        regs.set(12, 7);
        assert_eq!(regs.get(0), u64::MAX);
        assert_eq!(regs.get(12), 7);
        assert_eq!(regs.get(5), 0);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut a = Registers::new();
        a.set(3, 42);
        let b = a.clone();
        a.set(3, 0);
        assert_eq!(b.get(3), 42);
    }
}
