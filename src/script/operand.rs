//! Byte-string stack values and the operations scripts apply to them.
//!
//! An [`Operand`] borrows from the script it was pushed by and only copies
//! when an operation produces new bytes.

use crate::script::ScriptError;
use crate::util::{lshift, rshift};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

/// Immutable byte string held on the script stack.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Operand<'a>(Cow<'a, [u8]>);

impl<'a> Operand<'a> {
    /// Operand borrowing `bytes`.
    #[must_use]
    #[inline]
    pub fn borrowed(bytes: &'a [u8]) -> Self {
        Operand(Cow::Borrowed(bytes))
    }

    /// Operand owning `bytes`.
    #[must_use]
    #[inline]
    pub fn owned(bytes: Vec<u8>) -> Self {
        Operand(Cow::Owned(bytes))
    }

    /// Empty operand (false, zero).
    #[must_use]
    #[inline]
    pub fn empty() -> Self {
        Operand(Cow::Borrowed(&[]))
    }

    /// Minimal encoding of a boolean: `[1]` or empty.
    #[must_use]
    #[inline]
    pub fn from_bool(b: bool) -> Self {
        if b {
            Operand(Cow::Borrowed(&[1]))
        } else {
            Self::empty()
        }
    }

    /// Raw bytes.
    #[must_use]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Detaches the operand from the script it borrows from.
    #[must_use]
    pub fn into_owned(self) -> Operand<'static> {
        Operand(Cow::Owned(self.0.into_owned()))
    }

    /// Consumes the operand, returning its bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0.into_owned()
    }

    /// Casts to bool. False iff every byte is zero, allowing a final `0x80` (negative zero).
    #[must_use]
    pub fn to_bool(&self) -> bool {
        let bytes = self.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b != 0 {
                return !(i == bytes.len() - 1 && b == 0x80);
            }
        }
        false
    }

    fn zip_with(&self, other: &Operand, f: impl Fn(u8, u8) -> u8) -> Result<Operand<'static>, ScriptError> {
        if self.len() != other.len() {
            return Err(ScriptError::InvalidOperandSize);
        }
        Ok(Operand::owned(self.iter().zip(other.iter()).map(|(a, b)| f(*a, *b)).collect()))
    }

    /// Bitwise AND of two equal-length operands.
    pub fn bit_and(&self, other: &Operand) -> Result<Operand<'static>, ScriptError> {
        self.zip_with(other, |a, b| a & b)
    }

    /// Bitwise OR of two equal-length operands.
    pub fn bit_or(&self, other: &Operand) -> Result<Operand<'static>, ScriptError> {
        self.zip_with(other, |a, b| a | b)
    }

    /// Bitwise XOR of two equal-length operands.
    pub fn bit_xor(&self, other: &Operand) -> Result<Operand<'static>, ScriptError> {
        self.zip_with(other, |a, b| a ^ b)
    }

    /// Flips every bit.
    #[must_use]
    pub fn bit_invert(&self) -> Operand<'static> {
        Operand::owned(self.iter().map(|b| !b).collect())
    }

    /// Shifts left by `n` bits, keeping the length.
    #[must_use]
    pub fn lshift(&self, n: usize) -> Operand<'static> {
        Operand::owned(lshift(self, n))
    }

    /// Shifts right by `n` bits, keeping the length.
    #[must_use]
    pub fn rshift(&self, n: usize) -> Operand<'static> {
        Operand::owned(rshift(self, n))
    }

    /// Concatenation. Size limits are the caller's concern.
    #[must_use]
    pub fn cat(&self, other: &Operand) -> Operand<'static> {
        let mut v = Vec::with_capacity(self.len() + other.len());
        v.extend_from_slice(self);
        v.extend_from_slice(other);
        Operand::owned(v)
    }

    /// Splits into `[0, pos)` and `[pos, len)`.
    pub fn split(&self, pos: usize) -> Result<(Operand<'static>, Operand<'static>), ScriptError> {
        if pos > self.len() {
            return Err(ScriptError::InvalidSplitRange);
        }
        let (a, b) = self.as_bytes().split_at(pos);
        Ok((Operand::owned(a.to_vec()), Operand::owned(b.to_vec())))
    }

    /// Resizes a number to exactly `size` bytes, moving the sign bit to the new last byte.
    pub fn num2bin(&self, size: usize) -> Result<Operand<'static>, ScriptError> {
        let mut raw = minimally_encode(self);
        if raw.len() > size {
            return Err(ScriptError::ImpossibleEncoding);
        }
        if raw.len() == size {
            return Ok(Operand::owned(raw));
        }
        let mut sign = 0x00;
        if let Some(last) = raw.last_mut() {
            sign = *last & 0x80;
            *last &= 0x7f;
        }
        raw.resize(size - 1, 0x00);
        raw.push(sign);
        Ok(Operand::owned(raw))
    }

    /// Minimal numeric encoding of the value.
    #[must_use]
    pub fn bin2num(&self) -> Operand<'static> {
        Operand::owned(minimally_encode(self))
    }
}

/// Strips redundant zero padding from a numeric byte string, keeping its sign.
#[must_use]
pub fn minimally_encode(data: &[u8]) -> Vec<u8> {
    let mut v = data.to_vec();
    let last = match v.last() {
        Some(&b) => b,
        None => return v,
    };
    if last & 0x7f != 0 {
        return v;
    }
    if v.len() == 1 {
        return Vec::new();
    }
    if v[v.len() - 2] & 0x80 != 0 {
        return v;
    }
    let mut i = v.len() - 1;
    while i > 0 {
        if v[i - 1] != 0 {
            if v[i - 1] & 0x80 != 0 {
                v[i] = last;
                i += 1;
            } else {
                v[i - 1] |= last;
            }
            v.truncate(i);
            return v;
        }
        i -= 1;
    }
    Vec::new()
}

impl<'a> Deref for Operand<'a> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl<'a> AsRef<[u8]> for Operand<'a> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<'a> From<&'a [u8]> for Operand<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Operand::borrowed(bytes)
    }
}

impl From<Vec<u8>> for Operand<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Operand::owned(bytes)
    }
}

impl<'a> fmt::Debug for Operand<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Operand({})", hex::encode(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn op(b: &[u8]) -> Operand {
        Operand::borrowed(b)
    }

    #[test]
    fn to_bool() {
        assert!(!op(&[]).to_bool());
        assert!(!op(&[0x00]).to_bool());
        assert!(!op(&[0x00, 0x00]).to_bool());
        assert!(!op(&[0x80]).to_bool());
        assert!(!op(&[0x00, 0x00, 0x80]).to_bool());
        // 0x80 as the last byte is the sign bit of zero
        assert!(!op(&[0x00, 0x80]).to_bool());
        assert!(op(&[0x01]).to_bool());
        assert!(op(&[0x00, 0x80, 0x00]).to_bool());
        assert!(op(&[0x80, 0x00]).to_bool());
        assert!(op(&[0x00, 0x81]).to_bool());
    }

    #[test]
    fn bitwise() {
        let a = op(&[0xf0, 0x0f]);
        let b = op(&[0xff, 0x00]);
        assert_eq!(a.bit_and(&b).unwrap().as_bytes(), &[0xf0, 0x00]);
        assert_eq!(a.bit_or(&b).unwrap().as_bytes(), &[0xff, 0x0f]);
        assert_eq!(a.bit_xor(&b).unwrap().as_bytes(), &[0x0f, 0x0f]);
        assert_eq!(a.bit_invert().as_bytes(), &[0x0f, 0xf0]);
        assert_eq!(a.bit_and(&op(&[0xff])), Err(ScriptError::InvalidOperandSize));
    }

    #[test]
    fn shifts() {
        assert_eq!(op(&[0x01, 0x80]).lshift(1).as_bytes(), &[0x03, 0x00]);
        assert_eq!(op(&[0x01, 0x80]).rshift(1).as_bytes(), &[0x00, 0xc0]);
    }

    #[test]
    fn cat_split() {
        let c = op(&[1, 2]).cat(&op(&[3]));
        assert_eq!(c.as_bytes(), &[1, 2, 3]);
        let (l, r) = c.split(1).unwrap();
        assert_eq!(l.as_bytes(), &[1]);
        assert_eq!(r.as_bytes(), &[2, 3]);
        let (l, r) = c.split(3).unwrap();
        assert_eq!((l.len(), r.len()), (3, 0));
        assert_eq!(c.split(4), Err(ScriptError::InvalidSplitRange));
    }

    #[test]
    fn minimal_encoding() {
        assert_eq!(minimally_encode(&[]), Vec::<u8>::new());
        assert_eq!(minimally_encode(&[0x00]), Vec::<u8>::new());
        assert_eq!(minimally_encode(&[0x80]), Vec::<u8>::new());
        assert_eq!(minimally_encode(&[0x01, 0x00, 0x00]), vec![0x01]);
        assert_eq!(minimally_encode(&[0x01, 0x00, 0x80]), vec![0x81]);
        assert_eq!(minimally_encode(&[0x80, 0x00, 0x00]), vec![0x80, 0x00]);
        assert_eq!(minimally_encode(&[0xff, 0x00, 0x80]), vec![0xff, 0x80]);
        assert_eq!(minimally_encode(&[0x7f]), vec![0x7f]);
    }

    #[test]
    fn num2bin_bin2num() {
        assert_eq!(op(&[0x02]).num2bin(4).unwrap().as_bytes(), &[0x02, 0x00, 0x00, 0x00]);
        assert_eq!(op(&[0x85]).num2bin(4).unwrap().as_bytes(), &[0x05, 0x00, 0x00, 0x80]);
        assert_eq!(op(&[]).num2bin(2).unwrap().as_bytes(), &[0x00, 0x00]);
        assert_eq!(op(&[0x01, 0x02]).num2bin(1), Err(ScriptError::ImpossibleEncoding));
        assert_eq!(op(&[0x05, 0x00, 0x00, 0x80]).bin2num().as_bytes(), &[0x85]);
        assert_eq!(op(&[0x00, 0x00, 0x00]).bin2num().as_bytes(), &[] as &[u8]);
    }
}
