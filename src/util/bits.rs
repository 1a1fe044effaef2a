//! Bit shifting of byte strings for OP_LSHIFT / OP_RSHIFT.
//!
//! A byte string is treated as one big-endian bit sequence: byte 0 holds the
//! most significant bits. Shifts keep the length and drop bits shifted out.

const LSHIFT_MASK: [u8; 8] = [0xff, 0x7f, 0x3f, 0x1f, 0x0f, 0x07, 0x03, 0x01];
const RSHIFT_MASK: [u8; 8] = [0xff, 0xfe, 0xfc, 0xf8, 0xf0, 0xe0, 0xc0, 0x80];

/// Left shifts a byte array by n bits.
#[must_use]
pub fn lshift(v: &[u8], n: usize) -> Vec<u8> {
    let bit_shift = (n % 8) as u32;
    let byte_shift = n / 8;
    let mask = LSHIFT_MASK[bit_shift as usize];
    let mut result = vec![0u8; v.len()];
    for i in (byte_shift..v.len()).rev() {
        let k = i - byte_shift;
        result[k] |= (v[i] & mask) << bit_shift;
        if bit_shift > 0 && k > 0 {
            result[k - 1] |= (v[i] & !mask) >> (8 - bit_shift);
        }
    }
    result
}

/// Right shifts a byte array by n bits.
#[must_use]
pub fn rshift(v: &[u8], n: usize) -> Vec<u8> {
    let bit_shift = (n % 8) as u32;
    let byte_shift = n / 8;
    let mask = RSHIFT_MASK[bit_shift as usize];
    let mut result = vec![0u8; v.len()];
    for i in 0..v.len() {
        let k = match i.checked_add(byte_shift) {
            Some(k) if k < v.len() => k,
            _ => break,
        };
        result[k] |= (v[i] & mask) >> bit_shift;
        if bit_shift > 0 && k + 1 < v.len() {
            result[k + 1] |= (v[i] & !mask) << (8 - bit_shift);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lshift_test() {
        // Empty array
        let expected_empty: Vec<u8> = vec![];
        assert_eq!(lshift(&[], 0), expected_empty);
        assert_eq!(lshift(&[], 1), expected_empty);
        assert_eq!(lshift(&[], 999999), expected_empty);
        // No shifts
        assert_eq!(lshift(&[0x80, 0x10, 0x30, 0x55], 0), vec![0x80, 0x10, 0x30, 0x55]);
        assert_eq!(lshift(&[0xff], 0), vec![0xff]);
        // Shift one
        assert_eq!(lshift(&[0x80, 0x00, 0x00, 0x01], 1), vec![0x00, 0x00, 0x00, 0x02]);
        assert_eq!(lshift(&[0x00, 0x80, 0x00, 0x00], 1), vec![0x01, 0x00, 0x00, 0x00]);
        assert_eq!(lshift(&[0x80, 0x00, 0x00, 0x00], 999999), vec![0x00, 0x00, 0x00, 0x00]);
        // Shift four
        assert_eq!(lshift(&[0x01, 0x23, 0x45, 0x67], 4), vec![0x12, 0x34, 0x56, 0x70]);
        // Shift eight
        assert_eq!(lshift(&[0x01, 0x23, 0x45, 0x67], 8), vec![0x23, 0x45, 0x67, 0x00]);
        // Shift across bytes
        assert_eq!(lshift(&[0x01, 0x23, 0x45, 0x67], 12), vec![0x34, 0x56, 0x70, 0x00]);
    }

    #[test]
    fn rshift_test() {
        // Empty array
        let expected_empty: Vec<u8> = vec![];
        assert_eq!(rshift(&[], 0), expected_empty);
        assert_eq!(rshift(&[], 1), expected_empty);
        assert_eq!(rshift(&[], 999999), expected_empty);
        // No shifts
        assert_eq!(rshift(&[0x80, 0x10, 0x30, 0x55], 0), vec![0x80, 0x10, 0x30, 0x55]);
        assert_eq!(rshift(&[0xff], 0), vec![0xff]);
        // Shift one
        assert_eq!(rshift(&[0x80, 0x00, 0x00, 0x02], 1), vec![0x40, 0x00, 0x00, 0x01]);
        assert_eq!(rshift(&[0x01, 0x00, 0x00, 0x00], 1), vec![0x00, 0x80, 0x00, 0x00]);
        assert_eq!(rshift(&[0x00, 0x00, 0x00, 0x01], 999999), vec![0x00, 0x00, 0x00, 0x00]);
        // Shift four
        assert_eq!(rshift(&[0x01, 0x23, 0x45, 0x67], 4), vec![0x00, 0x12, 0x34, 0x56]);
        // Shift eight
        assert_eq!(rshift(&[0x01, 0x23, 0x45, 0x67], 8), vec![0x00, 0x01, 0x23, 0x45]);
        // Shift across bytes
        assert_eq!(rshift(&[0x01, 0x23, 0x45, 0x67], 12), vec![0x00, 0x00, 0x12, 0x34]);
    }
}
