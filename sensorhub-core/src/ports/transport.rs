//! Transport port - the serial link carrying the line protocol
//!
//! Reads are non-blocking (`nb`), so the scheduler can drain whatever bytes
//! have arrived and move on. Writes are whole lines; the transport appends
//! the terminator.

/// Port for the byte stream to the upstream aggregator
///
/// # Example Implementation
///
/// ```ignore
/// struct UartTransport<U> {
///     uart: U,
/// }
///
/// impl<U: embedded_hal_nb::serial::Read + embedded_io::Write> Transport for UartTransport<U> {
///     type Error = U::Error;
///
///     fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
///         self.uart.read()
///     }
///
///     fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
///         self.uart.write_all(line.as_bytes())?;
///         self.uart.write_all(b"\r\n")
///     }
/// }
/// ```
pub trait Transport {
    /// Link-level failure
    type Error: core::fmt::Debug;

    /// Next received byte, or `WouldBlock` if none is pending
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Send one message line followed by the line terminator
    fn write_line(&mut self, line: &str) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        (**self).read_byte()
    }

    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        (**self).write_line(line)
    }
}
