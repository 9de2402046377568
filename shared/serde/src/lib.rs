//! Bit-level serialization for the pilesync wire protocol.
//!
//! Values are written least-significant bit first into a growable buffer and
//! read back with a [`BitReader`]. Every wire type implements [`Serde`].

mod bit_reader;
mod bit_writer;
mod error;
mod impls;
mod integer;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
pub use integer::{
    SerdeInteger, SignedInteger, SignedVariableInteger, UnsignedInteger, UnsignedVariableInteger,
};
pub use serde::Serde;
