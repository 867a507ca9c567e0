//! Shared encoding helpers used by the signature model and the annotation codecs.
//!
//! - [`nat`] - writer side of the NAT variable-length integer encoding
//! - [`math`] - checked integer conversions for serialization

pub mod math;
pub mod nat;

pub use math::to_u32;
pub use nat::{encode_nat, nat_size, write_nat};
