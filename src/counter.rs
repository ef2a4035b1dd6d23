// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use itertools::Itertools;

/// Hierarchical section counter: stepping a level resets every deeper level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionCounter {
    numbers: [usize; 3],
}

impl SectionCounter {
    pub fn init() -> Self {
        Self::default()
    }

    /// Advance the counter at `level` (1-based, clamped to `1..=3`).
    pub fn step_mut(&mut self, level: usize) {
        let index = level.clamp(1, 3) - 1;
        self.numbers[index] += 1;
        self.numbers[index + 1..].iter_mut().for_each(|n| *n = 0);
    }

    pub fn get(&self, level: usize) -> usize {
        self.numbers[level.clamp(1, 3) - 1]
    }

    /// Dotted number of `level`, e.g. `2.1`. Unvisited parents display as `0`.
    pub fn display(&self, level: usize) -> String {
        self.numbers[..level.clamp(1, 3)].iter().join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let mut counter = SectionCounter::init();
        counter.step_mut(1);
        assert_eq!(counter.display(1), "1");
        counter.step_mut(1);
        counter.step_mut(2);
        assert_eq!(counter.display(2), "2.1");
        counter.step_mut(2);
        counter.step_mut(3);
        assert_eq!(counter.display(3), "2.2.1");
        counter.step_mut(1);
        assert_eq!(counter.display(1), "3");
        counter.step_mut(2);
        assert_eq!(counter.display(2), "3.1");
        assert_eq!(counter.get(3), 0);
    }

    #[test]
    fn test_orphan_subsection() {
        let mut counter = SectionCounter::init();
        counter.step_mut(2);
        assert_eq!(counter.display(2), "0.1");
    }
}
