//! [`bytes`] trait implementations.

use bytes::buf::UninitSlice;
use bytes::{Buf, BufMut};

use crate::RingBuffer;

/// Space reserved by [`BufMut::chunk_mut`] when the buffer is full.
const CHUNK_RESERVE: usize = 64;

impl Buf for RingBuffer {
    fn remaining(&self) -> usize {
        self.len()
    }

    fn chunk(&self) -> &[u8] {
        self.lazy_read_all().0
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.len(),
            "attempt to consume beyond available data"
        );
        self.shift(cnt);
    }
}

unsafe impl BufMut for RingBuffer {
    fn remaining_mut(&self) -> usize {
        isize::MAX as usize - self.len()
    }

    unsafe fn advance_mut(&mut self, cnt: usize) {
        self.commit(cnt)
    }

    fn chunk_mut(&mut self) -> &mut UninitSlice {
        if self.free() == 0 {
            self.reserve(CHUNK_RESERVE);
        }
        let (first, _) = self.as_mut_slices();
        UninitSlice::new(first)
    }

    fn put_slice(&mut self, src: &[u8]) {
        self.write(src);
    }
}

#[cfg(test)]
mod tests {
    use bytes::{Buf, BufMut};
    use std::cmp::min;
    use std::ptr;

    use crate::RingBuffer;

    #[test]
    fn test_data_integrity_through_buf_traits() {
        let input_data: &[u8] = b"your_test_data_here_with_some_longer_content_to_test_wrapping";
        let mut buf = RingBuffer::new(16);
        let mut output = Vec::new();
        let mut input_pos = 0;

        while input_pos < input_data.len() {
            // Fill what is free without growing, then drain.
            while buf.free() > 0 && input_pos < input_data.len() {
                let chunk = buf.chunk_mut();
                let to_copy = min(chunk.len(), input_data.len() - input_pos);

                unsafe {
                    ptr::copy_nonoverlapping(
                        input_data[input_pos..].as_ptr(),
                        chunk.as_mut_ptr(),
                        to_copy,
                    );
                    buf.advance_mut(to_copy);
                }
                input_pos += to_copy;
            }

            while buf.remaining() > 0 {
                let chunk = buf.chunk();
                output.extend_from_slice(chunk);
                let chunk_len = chunk.len();
                buf.advance(chunk_len);
            }
        }

        assert_eq!(input_data, output.as_slice(), "Data corruption detected!");
    }

    #[test]
    fn test_chunk_mut_grows_full_buffer() {
        let mut buf = RingBuffer::new(4);
        buf.put_slice(b"abcd");
        assert!(buf.is_full());

        assert!(buf.chunk_mut().len() > 0);
        assert_eq!(buf.capacity(), 128);
        assert_eq!(buf.chunk(), b"abcd");
    }

    #[test]
    fn test_put_and_get() {
        let mut buf = RingBuffer::new(0);
        buf.put_u32(0xDEAD_BEEF);
        buf.put_u8(1);
        buf.put_slice(b"xyz");
        assert_eq!(buf.remaining(), 8);

        assert_eq!(buf.get_u32(), 0xDEAD_BEEF);
        assert_eq!(buf.get_u8(), 1);
        let mut rest = [0u8; 3];
        buf.copy_to_slice(&mut rest);
        assert_eq!(&rest, b"xyz");
        assert!(buf.is_empty());
    }

    #[test]
    #[should_panic(expected = "attempt to consume beyond available data")]
    fn test_advance_too_much() {
        let mut buf = RingBuffer::new(4);
        buf.put_slice(b"ab");
        Buf::advance(&mut buf, 3);
    }
}
