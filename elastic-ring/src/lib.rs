#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(feature = "std", test)), no_std)]
//! # elastic-ring
//!
//! A growable ring buffer for bytes.
//!
//! [`RingBuffer`] stages bytes between a producer (e.g. a socket read path) and a
//! consumer (e.g. a protocol decoder). Writes never fail: when there is not enough
//! free space the buffer grows to the next power of two and moves the unread bytes,
//! in order, to the front of the new storage. When a read drains the buffer its
//! capacity is halved (see [`ShrinkPolicy`] for alternatives).
//!
//! Bytes can be consumed destructively with [`read`](RingBuffer::read), or peeked at
//! with [`lazy_read`](RingBuffer::lazy_read) and committed later with
//! [`shift`](RingBuffer::shift).
//!
//! ## Quick Start
//!
//! ```rust
//! use elastic_ring::RingBuffer;
//!
//! let mut buf = RingBuffer::new(8);
//! buf.write(b"abcdef");
//! assert_eq!(buf.len(), 6);
//!
//! // Peek without moving the read cursor.
//! let (head, tail) = buf.lazy_read(3);
//! assert_eq!([head, tail].concat(), b"abc");
//! buf.shift(3);
//!
//! let mut out = [0u8; 8];
//! let n = buf.read(&mut out).unwrap();
//! assert_eq!(&out[..n], b"def");
//! assert!(buf.is_empty());
//! ```
//!
//! ## Peek views
//!
//! The slices returned by [`lazy_read`](RingBuffer::lazy_read) and
//! [`lazy_read_all`](RingBuffer::lazy_read_all) borrow the buffer. Any write, read,
//! shift or reset may reallocate or overwrite the storage, so the borrow checker
//! rejects those calls while a view is alive.
//!
//! ## Feature Flags
//!
//! - **`std`** *(default)*: Implements [`std::io::Read`], [`std::io::Write`] and
//!   [`std::io::BufRead`]. Without it the crate is `no_std` and needs `alloc`.
//! - **`buf-trait`**: Implements [`bytes::Buf`] and [`bytes::BufMut`] traits.
//! - **`zeroize`**: Clears memory on drop, and whenever storage is replaced by growth
//!   or shrink, via the [`zeroize`] crate.
//! - **`tracing`**: Emits growth and shrink events through [`tracing`].

extern crate alloc;

#[cfg(feature = "buf-trait")]
mod buf;
mod error;
#[cfg(feature = "std")]
mod io;
mod policy;
mod region;
mod tracing_compat;


pub use error::Error;
pub use policy::{DEFAULT_MIN_ALLOC, Policy, ShrinkPolicy};

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::{fmt, mem};

use tracing_compat::{debug, trace};

#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A growable circular byte buffer.
///
/// The capacity is always 0 or a power of two, so cursor wraparound is a mask
/// with `capacity - 1`. Because the read and write cursors coincide both when the
/// buffer is empty and when it is full, an explicit flag tells the two apart.
#[derive(Clone)]
pub struct RingBuffer {
    bytes: Box<[u8]>,
    /// Offset of the oldest unread byte.
    r: usize,
    /// Offset of the next free slot.
    w: usize,
    mask: usize,
    empty: bool,
    policy: Policy,
}

impl RingBuffer {
    /// Creates a buffer with room for `capacity` bytes, using the default [`Policy`].
    ///
    /// `capacity` is rounded up to a power of two. A capacity of 0 defers
    /// allocation until the first write.
    ///
    /// # Examples
    ///
    /// ```
    /// use elastic_ring::RingBuffer;
    ///
    /// assert_eq!(RingBuffer::new(1000).capacity(), 1024);
    /// assert_eq!(RingBuffer::new(0).capacity(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, Policy::DEFAULT)
    }

    /// Creates a buffer with room for `capacity` bytes and the given sizing policy.
    pub fn with_policy(capacity: usize, policy: Policy) -> Self {
        let capacity = if capacity == 0 {
            0
        } else {
            region::ceil_pow2(capacity)
        };
        Self::_new_with_storage(region::allocate(capacity), policy)
    }

    fn _new_with_storage(bytes: Box<[u8]>, policy: Policy) -> Self {
        debug_assert!(bytes.is_empty() || bytes.len().is_power_of_two());
        Self {
            mask: bytes.len().wrapping_sub(1),
            bytes,
            r: 0,
            w: 0,
            empty: true,
            policy,
        }
    }

    /// Returns the sizing policy.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Returns the size of the backing storage.
    ///
    /// This is 0 before the first allocation and a power of two afterwards.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the number of bytes available to read.
    pub fn len(&self) -> usize {
        if self.empty {
            0
        } else if self.w > self.r {
            self.w - self.r
        } else {
            self.capacity() - self.r + self.w
        }
    }

    /// Returns the number of bytes that can be written without growing.
    pub fn free(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Returns `true` if the buffer contains no readable bytes.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Returns `true` if every byte of the storage is unread.
    pub fn is_full(&self) -> bool {
        !self.empty && self.r == self.w
    }

    /// Appends `src` to the buffer, growing the storage first if it does not fit.
    ///
    /// All of `src` is always accepted; the return value is `src.len()`.
    pub fn write(&mut self, src: &[u8]) -> usize {
        let n = src.len();
        if n == 0 {
            return 0;
        }
        self.reserve(n);

        let to_end = self.capacity() - self.w;
        if n <= to_end {
            self.bytes[self.w..self.w + n].copy_from_slice(src);
        } else {
            let (first, second) = src.split_at(to_end);
            self.bytes[self.w..].copy_from_slice(first);
            self.bytes[..second.len()].copy_from_slice(second);
        }
        self.advance_write(n);
        n
    }

    /// Appends a single byte, growing the storage if the buffer is full.
    pub fn write_byte(&mut self, byte: u8) {
        self.reserve(1);
        self.bytes[self.w] = byte;
        self.advance_write(1);
    }

    /// Appends the UTF-8 bytes of `s`. Returns `s.len()`.
    pub fn write_str(&mut self, s: &str) -> usize {
        self.write(s.as_bytes())
    }

    /// Copies up to `dst.len()` unread bytes into `dst` and consumes them.
    ///
    /// Returns the number of bytes copied. A zero-length `dst` always returns
    /// `Ok(0)`. If this read drains the buffer, its storage shrinks according to
    /// the [`Policy`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if there is nothing to read.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize, Error> {
        if dst.is_empty() {
            return Ok(0);
        }
        if self.empty {
            return Err(Error::Empty);
        }

        let (head, tail) = self.lazy_read(dst.len());
        let n = head.len() + tail.len();
        dst[..head.len()].copy_from_slice(head);
        dst[head.len()..n].copy_from_slice(tail);
        self.advance_read(n);
        Ok(n)
    }

    /// Reads and consumes the next byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if there is nothing to read.
    pub fn read_byte(&mut self) -> Result<u8, Error> {
        if self.empty {
            return Err(Error::Empty);
        }
        let byte = self.bytes[self.r];
        self.advance_read(1);
        Ok(byte)
    }

    /// Returns up to `n` unread bytes without consuming them.
    ///
    /// The data may wrap around the end of the storage:
    ///
    /// - If it is contiguous, the second slice is empty.
    /// - If it wraps, the first slice runs to the end of the storage and the
    ///   second slice continues from its start.
    ///
    /// Both slices are empty if the buffer is empty or `n` is 0. Call
    /// [`shift`](Self::shift) to commit what was peeked.
    ///
    /// # Example
    ///
    /// ```
    /// use elastic_ring::RingBuffer;
    /// let mut buf = RingBuffer::new(4);
    /// buf.write(b"xxab");
    /// buf.shift(2);
    /// buf.write(b"cd");
    ///
    /// let (head, tail) = buf.lazy_read(3);
    /// assert_eq!(head, b"ab");
    /// assert_eq!(tail, b"c");
    /// ```
    pub fn lazy_read(&self, n: usize) -> (&[u8], &[u8]) {
        if self.empty || n == 0 {
            return (&[], &[]);
        }

        let n = n.min(self.len());
        let capacity = self.capacity();
        let end = self.r + n;

        if end <= capacity {
            (&self.bytes[self.r..end], &[][..])
        } else {
            let (front, back) = self.bytes.split_at(self.r);
            (back, &front[..end - capacity])
        }
    }

    /// Returns every unread byte without consuming them.
    ///
    /// See [`lazy_read`](Self::lazy_read) for how the two slices are split.
    pub fn lazy_read_all(&self) -> (&[u8], &[u8]) {
        self.lazy_read(self.len())
    }

    /// Consumes up to `n` bytes without copying them.
    ///
    /// This commits a prior [`lazy_read`](Self::lazy_read). Shifting past the end
    /// drains the buffer just like a read would. Shifting an empty buffer does
    /// nothing.
    pub fn shift(&mut self, n: usize) {
        if n == 0 || self.empty {
            return;
        }
        self.advance_read(n.min(self.len()));
    }

    /// Drops every unread byte and shrinks the storage according to the
    /// [`Policy`].
    ///
    /// This is the same transition a read performs when it drains the buffer.
    pub fn reset(&mut self) {
        self.drain();
    }

    /// Grows the storage, if needed, so that at least `additional` bytes can be
    /// written without another allocation.
    pub fn reserve(&mut self, additional: usize) {
        let free = self.free();
        if free < additional {
            self.grow(additional - free);
        }
    }

    /// Returns pairs of mutable slices covering the free space, starting at the
    /// write cursor.
    ///
    /// Write into these slices, then call [`commit`](Self::commit) to make the
    /// bytes readable. Use [`reserve`](Self::reserve) first to make room.
    ///
    /// ```
    /// use elastic_ring::RingBuffer;
    /// let mut buf = RingBuffer::new(0);
    /// buf.reserve(3);
    /// let (first, _) = buf.as_mut_slices();
    /// first[..3].copy_from_slice(b"foo");
    /// buf.commit(3);
    /// assert_eq!(buf.lazy_read_all().0, b"foo");
    /// ```
    pub fn as_mut_slices(&mut self) -> (&mut [u8], &mut [u8]) {
        if self.capacity() == 0 || self.is_full() {
            return (&mut [][..], &mut [][..]);
        }

        let (r, w) = (self.r, self.w);
        if w < r {
            (&mut self.bytes[w..r], &mut [][..])
        } else {
            let (front, back) = self.bytes.split_at_mut(w);
            (back, &mut front[..r])
        }
    }

    /// Advances the write cursor by `cnt` bytes written through
    /// [`as_mut_slices`](Self::as_mut_slices).
    ///
    /// # Panics
    ///
    /// Panics if `cnt` is greater than [`free()`](Self::free).
    pub fn commit(&mut self, cnt: usize) {
        assert!(
            cnt <= self.free(),
            "attempt to advance beyond available space"
        );
        if cnt == 0 {
            return;
        }
        self.advance_write(cnt);
    }

    /// Moves the write cursor. `cnt` must be non-zero and fit in the free space.
    #[inline]
    fn advance_write(&mut self, cnt: usize) {
        debug_assert!(cnt > 0 && cnt <= self.free());
        self.w = (self.w + cnt) & self.mask;
        self.empty = false;
    }

    /// Moves the read cursor, draining the buffer if it catches up with the
    /// write cursor. `cnt` must be non-zero and at most [`len()`](Self::len).
    #[inline]
    fn advance_read(&mut self, cnt: usize) {
        debug_assert!(cnt > 0 && cnt <= self.len());
        self.r = (self.r + cnt) & self.mask;
        if self.r == self.w {
            self.drain();
        }
    }

    /// Moves the unread bytes to the front of a larger region.
    fn grow(&mut self, shortfall: usize) {
        let old_capacity = self.capacity();
        let new_capacity = self.policy.grown_capacity(old_capacity, shortfall);
        let len = self.len();

        let mut bytes = region::allocate(new_capacity);
        let (head, tail) = self.lazy_read_all();
        bytes[..head.len()].copy_from_slice(head);
        bytes[head.len()..len].copy_from_slice(tail);
        region::release(mem::replace(&mut self.bytes, bytes));

        self.mask = new_capacity - 1;
        self.r = 0;
        self.w = len;

        if old_capacity == 0 {
            debug!(capacity = new_capacity, "ring buffer allocated");
        } else {
            trace!(old_capacity, new_capacity, len, "ring buffer grown");
        }
    }

    /// Enters the empty state and applies the shrink policy.
    fn drain(&mut self) {
        self.empty = true;
        self.r = 0;
        self.w = 0;

        let old_capacity = self.capacity();
        let new_capacity = self.policy.drained_capacity(old_capacity);
        if new_capacity != old_capacity {
            region::release(mem::replace(
                &mut self.bytes,
                region::allocate(new_capacity),
            ));
            self.mask = new_capacity.wrapping_sub(1);
            trace!(old_capacity, new_capacity, "ring buffer shrunk");
        }
    }
}

impl Default for RingBuffer {
    /// Creates an unallocated buffer with the default [`Policy`].
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<Vec<u8>> for RingBuffer {
    /// Creates a buffer whose unread bytes are the contents of `data`, reusing
    /// the `Vec` as storage (padded to a power of two).
    fn from(mut data: Vec<u8>) -> Self {
        let len = data.len();
        if len == 0 {
            return Self::default();
        }
        data.resize(region::ceil_pow2(len), 0);

        let mut buf = Self::_new_with_storage(data.into_boxed_slice(), Policy::DEFAULT);
        buf.w = len & buf.mask;
        buf.empty = false;
        buf
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("read", &self.r)
            .field("write", &self.w)
            .finish()
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for RingBuffer {}

#[cfg(feature = "zeroize")]
impl Drop for RingBuffer {
    fn drop(&mut self) {
        self.bytes[..].zeroize()
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for RingBuffer {
    /// Zeroes out the storage and resets the cursors. The capacity is kept.
    fn zeroize(&mut self) {
        self.bytes[..].zeroize();
        self.r = 0;
        self.w = 0;
        self.empty = true;
    }
}
