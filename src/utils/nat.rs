//! Writer side of the NAT variable-length integer encoding.
//!
//! A NAT stores an unsigned integer as big-endian groups of 7 bits. Every byte except the
//! last has its high bit set as a continuation marker:
//!
//! | Value range        | Bytes | Layout                          |
//! |--------------------|-------|---------------------------------|
//! | `0..=127`          | 1     | `0xxxxxxx`                      |
//! | `128..=16383`      | 2     | `1xxxxxxx 0xxxxxxx`             |
//! | `16384..=2097151`  | 3     | `1xxxxxxx 1xxxxxxx 0xxxxxxx`    |
//!
//! The reader side lives on [`crate::Parser::read_nat`].

/// Returns the number of bytes [`write_nat`] produces for `value`, without allocating.
///
/// # Examples
///
/// ```rust
/// use sigshade::utils::nat_size;
///
/// assert_eq!(nat_size(0), 1);
/// assert_eq!(nat_size(127), 1);
/// assert_eq!(nat_size(128), 2);
/// assert_eq!(nat_size(16384), 3);
/// ```
#[must_use]
pub fn nat_size(value: u32) -> usize {
    let mut value = value;
    let mut count = 0;
    loop {
        value >>= 7;
        count += 1;
        if value == 0 {
            return count;
        }
    }
}

/// Appends the NAT encoding of `value` to `buffer`, most significant group first.
///
/// # Examples
///
/// ```rust
/// use sigshade::utils::write_nat;
///
/// let mut buffer = Vec::new();
/// write_nat(300, &mut buffer);
/// assert_eq!(buffer, [0x82, 0x2C]);
/// ```
pub fn write_nat(value: u32, buffer: &mut Vec<u8>) {
    let size = nat_size(value);
    for group in (0..size).rev() {
        // Shift stays below 32 because size <= 5
        #[allow(clippy::cast_possible_truncation)]
        let bits = ((value >> (group * 7)) & 0x7F) as u8;
        if group == 0 {
            buffer.push(bits);
        } else {
            buffer.push(bits | 0x80);
        }
    }
}

/// Returns the NAT encoding of `value` as a new buffer.
#[must_use]
pub fn encode_nat(value: u32) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(nat_size(value));
    write_nat(value, &mut buffer);
    buffer
}
