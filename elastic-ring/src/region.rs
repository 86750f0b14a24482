use alloc::boxed::Box;
use alloc::vec;

/// Allocates a zero-filled storage region of `capacity` bytes.
///
/// A capacity of 0 does not allocate.
pub(crate) fn allocate(capacity: usize) -> Box<[u8]> {
    debug_assert!(capacity == 0 || capacity.is_power_of_two());
    vec![0u8; capacity].into_boxed_slice()
}

/// Discards a region the buffer no longer points into.
///
/// With the `zeroize` feature the old bytes are wiped before being freed.
#[cfg(feature = "zeroize")]
pub(crate) fn release(mut region: Box<[u8]>) {
    use zeroize::Zeroize;
    region[..].zeroize();
    #[cfg(test)]
    tests::record_release(&region);
}

/// Discards a region the buffer no longer points into.
#[cfg(not(feature = "zeroize"))]
pub(crate) fn release(region: Box<[u8]>) {
    drop(region);
}

/// Rounds `n` up to the next power of two.
///
/// # Panics
///
/// Panics with "capacity overflow" if the result does not fit in `usize`.
#[inline]
pub(crate) fn ceil_pow2(n: usize) -> usize {
    n.checked_next_power_of_two()
        .unwrap_or_else(|| capacity_overflow())
}

#[cold]
#[track_caller]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}
