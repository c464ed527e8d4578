//! Nullable block clock: deterministic block heights for testing.

use std::cell::Cell;

/// A deterministic block-height source.
///
/// Height only advances when you tell it to.
pub struct NullBlockClock {
    current: Cell<u64>,
}

impl NullBlockClock {
    pub fn new(initial_height: u64) -> Self {
        Self {
            current: Cell::new(initial_height),
        }
    }

    pub fn height(&self) -> u64 {
        self.current.get()
    }

    /// Advance by a number of blocks and return the new height.
    pub fn advance(&self, blocks: u64) -> u64 {
        self.current.set(self.current.get() + blocks);
        self.current.get()
    }

    /// Jump to the first block of `period`.
    pub fn start_of_period(&self, period: u64, vote_period: u64) -> u64 {
        self.current.set(period * vote_period);
        self.current.get()
    }

    /// Jump to the last block of `period`.
    pub fn end_of_period(&self, period: u64, vote_period: u64) -> u64 {
        self.current.set((period + 1) * vote_period - 1);
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_jumps() {
        let clock = NullBlockClock::new(0);
        assert_eq!(clock.start_of_period(3, 10), 30);
        assert_eq!(clock.end_of_period(3, 10), 39);
        assert_eq!(clock.advance(1), 40);
    }
}
