use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde};

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

/// Integer encoded with an explicit number of bits.
///
/// Signed integers spend one leading bit on the sign and encode the magnitude.
/// Variable integers write `BITS`-sized chunks, each preceded by a bit telling
/// whether another chunk follows, so small values stay small on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    inner: IntegerLayout,
}

// Non-generic core shared by every instantiation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct IntegerLayout {
    value: i128,
    signed: bool,
    variable: bool,
    bits: u8,
}

impl IntegerLayout {
    fn check(signed: bool, variable: bool, bits: u8, value: i128) -> Result<(), &'static str> {
        if bits == 0 || bits > 127 {
            return Err("integer bit width must be within 1..=127");
        }
        if !signed && value < 0 {
            return Err("can't encode a negative number with an unsigned integer");
        }
        if !variable && value.unsigned_abs() >= 1u128 << bits {
            return Err("value does not fit in the fixed bit width");
        }
        Ok(())
    }

    fn ser(&self, writer: &mut dyn BitWrite) {
        if self.signed {
            writer.write_bit(self.value < 0);
        }

        let mut magnitude = self.value.unsigned_abs();

        if !self.variable {
            for _ in 0..self.bits {
                writer.write_bit(magnitude & 1 != 0);
                magnitude >>= 1;
            }
            return;
        }

        loop {
            let proceed = magnitude >= 1u128 << self.bits;
            writer.write_bit(proceed);
            for _ in 0..self.bits {
                writer.write_bit(magnitude & 1 != 0);
                magnitude >>= 1;
            }
            if !proceed {
                return;
            }
        }
    }

    fn de(reader: &mut BitReader, signed: bool, variable: bool, bits: u8) -> Result<Self, SerdeErr> {
        let negative = signed && reader.read_bit()?;

        let mut magnitude: u128 = 0;
        let mut shift: u32 = 0;
        loop {
            let proceed = variable && reader.read_bit()?;
            for _ in 0..bits {
                if shift >= 127 {
                    return Err(SerdeErr);
                }
                if reader.read_bit()? {
                    magnitude |= 1 << shift;
                }
                shift += 1;
            }
            if !proceed {
                break;
            }
        }

        let value = magnitude as i128;
        Ok(Self {
            value: if negative { -value } else { value },
            signed,
            variable,
            bits,
        })
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> SerdeInteger<SIGNED, VARIABLE, BITS> {
    /// Panics when `value` can't be represented with this layout, see
    /// [`SerdeInteger::try_new`] for the fallible version.
    pub fn new<T: Into<i128>>(value: T) -> Self {
        match Self::try_new(value) {
            Ok(integer) => integer,
            Err(reason) => panic!("{}", reason),
        }
    }

    pub fn try_new<T: Into<i128>>(value: T) -> Result<Self, &'static str> {
        let value = value.into();
        IntegerLayout::check(SIGNED, VARIABLE, BITS, value)?;
        Ok(Self {
            inner: IntegerLayout {
                value,
                signed: SIGNED,
                variable: VARIABLE,
                bits: BITS,
            },
        })
    }

    pub fn get(&self) -> i128 {
        self.inner.value
    }

    /// Converts to a narrower integer type, failing if the decoded value is
    /// out of range for it.
    pub fn try_to<T: TryFrom<i128>>(&self) -> Result<T, SerdeErr> {
        T::try_from(self.inner.value).map_err(|_| SerdeErr)
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde
    for SerdeInteger<SIGNED, VARIABLE, BITS>
{
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let inner = IntegerLayout::de(reader, SIGNED, VARIABLE, BITS)?;
        Ok(Self { inner })
    }
}
