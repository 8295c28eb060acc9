/// An address split into the fields the cache uses
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecodedAddress {
    pub tag: u32,
    pub index: u32,
    /// Byte within the block. Hits and misses are resolved at block granularity so this is only
    /// informational
    pub offset: u32,
}

/// Splits an address into tag, set index and block offset
///
/// Addresses are taken modulo the 32-bit address space, so every input decodes to something
///
/// # Arguments
///
/// * `address`: The accessed address
/// * `offset_bits`: log2 of the block size
/// * `index_bits`: log2 of the set count
///
/// returns: DecodedAddress
///
/// # Examples
///
/// ```
/// use cachelib::address::decode;
/// let decoded = decode(0x1234_5678, 5, 7);
/// assert_eq!(decoded.offset, 0x18);
/// assert_eq!(decoded.index, 0x33);
/// assert_eq!(decoded.tag, 0x1234_5678 >> 12);
/// ```
#[inline(always)]
pub fn decode(address: u32, offset_bits: u32, index_bits: u32) -> DecodedAddress {
    let block = shift_right(address, offset_bits);
    let tag_bits = u32::BITS - index_bits - offset_bits;
    DecodedAddress {
        tag: shift_right(block, index_bits) & low_mask(tag_bits),
        index: block & low_mask(index_bits),
        offset: address & low_mask(offset_bits),
    }
}

// Shifting a u32 by 32 is an overflow in Rust, but is a legitimate geometry (one byte blocks, one set)
#[inline(always)]
fn shift_right(value: u32, bits: u32) -> u32 {
    value.checked_shr(bits).unwrap_or(0)
}

#[inline(always)]
fn low_mask(bits: u32) -> u32 {
    u32::MAX.checked_shr(u32::BITS - bits).unwrap_or(0)
}
