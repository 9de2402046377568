use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr};

/// A type that can be written to and read from a bit stream.
pub trait Serde: Sized {
    /// Writes the value into the bit stream
    fn ser(&self, writer: &mut dyn BitWrite);

    /// Reads a value back, failing when the stream is short or malformed
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;
}
