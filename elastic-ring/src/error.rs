/// Errors returned when reading from a [`RingBuffer`](crate::RingBuffer).
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The buffer holds no readable bytes.
    #[error("ring buffer is empty")]
    Empty,
}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    /// An empty buffer means "no data yet", so it surfaces as
    /// [`WouldBlock`](std::io::ErrorKind::WouldBlock).
    fn from(err: Error) -> Self {
        match err {
            Error::Empty => std::io::Error::new(std::io::ErrorKind::WouldBlock, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_display() {
        assert_eq!(Error::Empty.to_string(), "ring buffer is empty");
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_into_io_error() {
        let err: std::io::Error = Error::Empty.into();
        assert_eq!(err.kind(), std::io::ErrorKind::WouldBlock);
        assert_eq!(err.to_string(), "ring buffer is empty");
    }
}
