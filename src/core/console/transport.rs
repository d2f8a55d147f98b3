use crate::domain::error::BoardComResult;

/// Byte-stream primitive the console protocol runs over.
///
/// The session is the sole consumer of the stream for the whole open
/// lifetime; the echo/response matching protocol breaks down if anything
/// else reads from the same transport.
pub trait ConsoleTransport {
    /// Open the underlying stream. Idempotent.
    fn open(&mut self) -> BoardComResult<()>;

    /// Close the underlying stream. Idempotent.
    fn close(&mut self) -> BoardComResult<()>;

    /// Write raw bytes.
    fn write(&mut self, data: &[u8]) -> BoardComResult<()>;

    /// Read one line, terminator included. Blocks for at most the per-read
    /// timeout and returns an empty buffer when no full line arrived.
    fn read_line(&mut self) -> BoardComResult<Vec<u8>>;

    /// Discard everything buffered on the input side.
    fn flush_input(&mut self) -> BoardComResult<()>;

    /// Drive the DTR control line.
    fn set_dtr(&mut self, level: bool) -> BoardComResult<()>;

    /// Drive the RTS control line.
    fn set_rts(&mut self, level: bool) -> BoardComResult<()>;
}
