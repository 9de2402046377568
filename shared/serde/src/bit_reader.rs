use crate::error::SerdeErr;

/// Reads bits back in the order a [`crate::BitWriter`] produced them.
pub struct BitReader<'b> {
    buffer: &'b [u8],
    buffer_index: usize,
    scratch: u8,
    scratch_index: u8,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            buffer_index: 0,
            scratch: 0,
            scratch_index: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.scratch_index == 0 {
            let Some(byte) = self.buffer.get(self.buffer_index) else {
                return Err(SerdeErr);
            };
            self.scratch = *byte;
            self.scratch_index = 8;
            self.buffer_index += 1;
        }

        let value = self.scratch & 1;
        self.scratch >>= 1;
        self.scratch_index -= 1;

        Ok(value != 0)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output = 0;
        for index in 0..8 {
            if self.read_bit()? {
                output |= 1 << index;
            }
        }
        Ok(output)
    }

    /// Bits that can still be read, including the unread tail of the current byte.
    pub fn bits_remaining(&self) -> usize {
        (self.buffer.len() - self.buffer_index) * 8 + self.scratch_index as usize
    }
}
