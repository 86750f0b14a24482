//! Growth and shrink policy.

use crate::region::capacity_overflow;

/// Default floor for the first allocation of an unallocated buffer, in bytes.
pub const DEFAULT_MIN_ALLOC: usize = 1 << 12;

/// What a [`RingBuffer`](crate::RingBuffer) does with its storage when a read
/// drains it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ShrinkPolicy {
    /// Halve the capacity on every drain, never going below
    /// [`Policy::shrink_floor`].
    #[default]
    Halve,
    /// Keep the storage and only reset the cursors.
    Retain,
    /// Free the storage entirely. The next write allocates again and applies
    /// [`Policy::min_alloc`].
    Release,
}

/// Sizing policy for a [`RingBuffer`](crate::RingBuffer).
///
/// All sizes are rounded up to a power of two, since the buffer masks its
/// cursors with `capacity - 1`.
///
/// # Examples
///
/// ```rust
/// use elastic_ring::{Policy, RingBuffer, ShrinkPolicy};
///
/// let policy = Policy::new()
///     .with_min_alloc(1000)
///     .with_shrink(ShrinkPolicy::Retain);
/// assert_eq!(policy.min_alloc(), 1024);
///
/// let mut buf = RingBuffer::with_policy(0, policy);
/// buf.write(b"hi");
/// assert_eq!(buf.capacity(), 1024);
/// ```
///
/// # Default
///
/// A 4096-byte first allocation, unconditional halving on drain, and a
/// shrink floor of 1 byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Policy {
    min_alloc: usize,
    shrink_floor: usize,
    shrink: ShrinkPolicy,
}

impl Policy {
    /// The default policy.
    pub const DEFAULT: Self = Self {
        min_alloc: DEFAULT_MIN_ALLOC,
        shrink_floor: 1,
        shrink: ShrinkPolicy::Halve,
    };

    /// Returns the default policy.
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the floor applied to the first allocation from capacity 0.
    ///
    /// A write smaller than this still allocates `bytes` (rounded up to a
    /// power of two). Only the very first allocation is affected.
    pub const fn with_min_alloc(mut self, bytes: usize) -> Self {
        self.min_alloc = pow2_at_least_one(bytes);
        self
    }

    /// Sets the capacity below which [`ShrinkPolicy::Halve`] stops halving.
    pub const fn with_shrink_floor(mut self, bytes: usize) -> Self {
        self.shrink_floor = pow2_at_least_one(bytes);
        self
    }

    /// Sets what happens to the storage when the buffer drains.
    pub const fn with_shrink(mut self, shrink: ShrinkPolicy) -> Self {
        self.shrink = shrink;
        self
    }

    /// Floor applied to the first allocation.
    pub const fn min_alloc(&self) -> usize {
        self.min_alloc
    }

    /// Lower bound for halving on drain.
    pub const fn shrink_floor(&self) -> usize {
        self.shrink_floor
    }

    /// Drain behavior.
    pub const fn shrink(&self) -> ShrinkPolicy {
        self.shrink
    }

    /// Capacity to grow to when `shortfall` more bytes are needed than are free.
    pub(crate) fn grown_capacity(&self, capacity: usize, shortfall: usize) -> usize {
        if capacity == 0 && shortfall < self.min_alloc {
            return self.min_alloc;
        }
        match capacity.checked_add(shortfall) {
            Some(needed) => crate::region::ceil_pow2(needed),
            None => capacity_overflow(),
        }
    }

    /// Capacity to keep after a drain, given the capacity before it.
    pub(crate) const fn drained_capacity(&self, capacity: usize) -> usize {
        match self.shrink {
            ShrinkPolicy::Halve if capacity > self.shrink_floor => capacity >> 1,
            ShrinkPolicy::Halve | ShrinkPolicy::Retain => capacity,
            ShrinkPolicy::Release => 0,
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn pow2_at_least_one(n: usize) -> usize {
    match n.checked_next_power_of_two() {
        Some(p) => p,
        None => panic!("capacity overflow"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let policy = Policy::default();
        assert_eq!(policy.min_alloc(), 4096);
        assert_eq!(policy.shrink_floor(), 1);
        assert_eq!(policy.shrink(), ShrinkPolicy::Halve);
        assert_eq!(policy, Policy::new());
    }

    #[test]
    fn test_sizes_round_up() {
        let policy = Policy::new().with_min_alloc(100).with_shrink_floor(0);
        assert_eq!(policy.min_alloc(), 128);
        assert_eq!(policy.shrink_floor(), 1);
    }

    #[rstest]
    #[case(0, 1, 4096)]
    #[case(0, 4095, 4096)]
    #[case(0, 4096, 4096)]
    #[case(0, 5000, 8192)]
    #[case(8, 2, 16)]
    #[case(8, 8, 16)]
    #[case(8, 9, 32)]
    #[case(1, 1, 2)]
    fn test_grown_capacity(#[case] capacity: usize, #[case] shortfall: usize, #[case] want: usize) {
        assert_eq!(Policy::DEFAULT.grown_capacity(capacity, shortfall), want);
    }

    #[rstest]
    #[case(ShrinkPolicy::Halve, 1, 16, 8)]
    #[case(ShrinkPolicy::Halve, 1, 1, 1)]
    #[case(ShrinkPolicy::Halve, 1, 0, 0)]
    #[case(ShrinkPolicy::Halve, 8, 16, 8)]
    #[case(ShrinkPolicy::Halve, 8, 8, 8)]
    #[case(ShrinkPolicy::Halve, 8, 4, 4)]
    #[case(ShrinkPolicy::Retain, 1, 16, 16)]
    #[case(ShrinkPolicy::Release, 1, 16, 0)]
    fn test_drained_capacity(
        #[case] shrink: ShrinkPolicy,
        #[case] floor: usize,
        #[case] capacity: usize,
        #[case] want: usize,
    ) {
        let policy = Policy::new().with_shrink(shrink).with_shrink_floor(floor);
        assert_eq!(policy.drained_capacity(capacity), want);
    }
}
