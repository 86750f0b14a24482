//! [`std::io`] adapters.
//!
//! Reading an empty buffer fails with [`io::ErrorKind::WouldBlock`]: the
//! producer has simply not written anything yet. [`BufRead::fill_buf`] instead
//! returns an empty slice, which callers of that trait treat as end of input.

use std::io::{self, BufRead, Read, Write};

use crate::RingBuffer;

impl Write for RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(RingBuffer::write(self, buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        RingBuffer::write(self, buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reading an empty buffer fails with [`io::ErrorKind::WouldBlock`], so
/// helpers that loop until `Ok(0)`, such as [`Read::read_to_end`] and
/// [`io::copy`], return that error once the data runs out. The bytes read so
/// far have already been handed to the caller. Use [`BufRead`] for
/// end-of-input semantics instead.
impl Read for RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(RingBuffer::read(self, buf)?)
    }
}

impl BufRead for RingBuffer {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.lazy_read_all().0)
    }

    fn consume(&mut self, amt: usize) {
        self.shift(amt);
    }
}
