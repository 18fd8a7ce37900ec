//! `Transport` implementations for hosted builds
//!
//! Lines are terminated with CRLF, as an Arduino `println` would.

use std::collections::VecDeque;
use std::io::{self, BufRead, ErrorKind, Read, Write};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use sensorhub_core::Transport;

const TERMINATOR: &[u8] = b"\r\n";

/// Transport over any reader/writer pair
///
/// The reader should be non-blocking or have a short timeout (a serial
/// port opened with a read timeout, a socket with `set_nonblocking`);
/// `WouldBlock`, `TimedOut`, `Interrupted` and end-of-stream all read as
/// "no byte available".
#[derive(Debug)]
pub struct IoTransport<R, W> {
    reader: R,
    writer: W,
    eof: bool,
}

impl<R: Read, W: Write> IoTransport<R, W> {
    /// Wrap a reader and a writer
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer, eof: false }
    }

    /// Whether the reader has reported end-of-stream
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Take the reader and writer back
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: Read, W: Write> Transport for IoTransport<R, W> {
    type Error = io::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        match self.reader.read(&mut byte) {
            Ok(0) => {
                self.eof = true;
                Err(nb::Error::WouldBlock)
            }
            Ok(_) => Ok(byte[0]),
            Err(e) if is_transient(&e) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        write_terminated(&mut self.writer, line)
    }
}

/// Transport whose input arrives as chunks on a channel
///
/// Lets a blocking reader (stdin, a serial port without timeouts) run on
/// its own thread while the hub loop polls without blocking.
#[derive(Debug)]
pub struct ChannelTransport<W> {
    input: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
    writer: W,
    closed: bool,
}

impl<W: Write> ChannelTransport<W> {
    /// Transport reading from `input`
    pub fn new(input: Receiver<Vec<u8>>, writer: W) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
            writer,
            closed: false,
        }
    }

    /// Transport plus the sender feeding it
    pub fn pair(writer: W) -> (Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx, writer))
    }

    /// Transport fed line by line from `reader` on a background thread
    pub fn spawn_reader<R>(reader: R, writer: W) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, transport) = Self::pair(writer);
        thread::spawn(move || pump(reader, tx));
        transport
    }

    /// Whether every sender is gone and all input has been consumed
    pub fn is_closed(&self) -> bool {
        self.closed && self.pending.is_empty()
    }

    /// The writer
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Take the writer back
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for ChannelTransport<W> {
    type Error = io::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if self.pending.is_empty() && !self.closed {
            match self.input.try_recv() {
                Ok(chunk) => self.pending.extend(chunk),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.closed = true,
            }
        }
        self.pending.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        write_terminated(&mut self.writer, line)
    }
}

fn pump<R: BufRead>(mut reader: R, tx: Sender<Vec<u8>>) {
    loop {
        let mut chunk = Vec::new();
        match reader.read_until(b'\n', &mut chunk) {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(chunk).is_err() {
                    break;
                }
            }
            Err(e) if is_transient(&e) => continue,
            Err(e) => {
                log::warn!("input reader stopped: {}", e);
                break;
            }
        }
    }
    log::debug!("input closed");
}

fn write_terminated<W: Write>(writer: &mut W, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(TERMINATOR)?;
    writer.flush()
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that always fails with the given kind
    struct Failing(ErrorKind);

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "test"))
        }
    }

    #[test]
    fn io_transport_reads_then_reports_eof() {
        let mut transport = IoTransport::new(Cursor::new(b"OK".to_vec()), Vec::new());
        assert_eq!(transport.read_byte().ok(), Some(b'O'));
        assert_eq!(transport.read_byte().ok(), Some(b'K'));
        assert!(matches!(transport.read_byte(), Err(nb::Error::WouldBlock)));
        assert!(transport.is_eof());
    }

    #[test]
    fn io_transport_writes_crlf_lines() {
        let mut transport = IoTransport::new(io::empty(), Vec::new());
        transport.write_line("a").unwrap();
        transport.write_line("b").unwrap();
        let (_, written) = transport.into_inner();
        assert_eq!(written, b"a\r\nb\r\n");
    }

    #[test]
    fn transient_errors_would_block() {
        let mut transport = IoTransport::new(Failing(ErrorKind::TimedOut), io::sink());
        assert!(matches!(transport.read_byte(), Err(nb::Error::WouldBlock)));

        let mut transport = IoTransport::new(Failing(ErrorKind::BrokenPipe), io::sink());
        assert!(matches!(transport.read_byte(), Err(nb::Error::Other(_))));
    }

    #[test]
    fn channel_transport_drains_chunks() {
        let (tx, mut transport) = ChannelTransport::pair(Vec::new());
        assert!(matches!(transport.read_byte(), Err(nb::Error::WouldBlock)));

        tx.send(b"AB".to_vec()).unwrap();
        tx.send(b"C".to_vec()).unwrap();
        drop(tx);

        let mut read = Vec::new();
        while let Ok(byte) = transport.read_byte() {
            read.push(byte);
        }
        assert_eq!(read, b"ABC");
        assert!(matches!(transport.read_byte(), Err(nb::Error::WouldBlock)));
        assert!(transport.is_closed());
    }

    #[test]
    fn spawned_reader_forwards_lines() {
        let mut transport = ChannelTransport::spawn_reader(Cursor::new(b"PING\nSTOP\n".to_vec()), Vec::new());
        let mut read = Vec::new();
        while !transport.is_closed() {
            if let Ok(byte) = transport.read_byte() {
                read.push(byte);
            }
        }
        assert_eq!(read, b"PING\nSTOP\n");
    }
}
