//! Numbers as scripts see them: little-endian sign-magnitude byte strings.

use crate::script::ScriptError;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// Signed script number backed by an `i64`.
///
/// Operands decode under a size ceiling (4 bytes by default), but arithmetic
/// results may exceed it; the ceiling applies again when a result is popped
/// back off the stack.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptNum(i64);

impl ScriptNum {
    /// Default maximum operand length for numeric opcodes.
    pub const DEFAULT_MAX_SIZE: usize = 4;

    /// Wraps a value.
    #[must_use]
    #[inline]
    pub const fn new(value: i64) -> Self {
        ScriptNum(value)
    }

    /// Decodes a stack operand.
    ///
    /// # Errors
    /// `ScriptNumOverflow` if longer than `max_size` bytes, `ScriptNumMinEncode`
    /// if `require_minimal` is set and the encoding has redundant padding.
    pub fn from_operand(data: &[u8], require_minimal: bool, max_size: usize) -> Result<Self, ScriptError> {
        if data.len() > max_size || data.len() > 8 {
            return Err(ScriptError::ScriptNumOverflow);
        }
        if require_minimal && !is_minimally_encoded(data, max_size) {
            return Err(ScriptError::ScriptNumMinEncode);
        }
        Ok(ScriptNum(decode(data)))
    }

    /// The wrapped value.
    #[must_use]
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Value clamped to the `i32` range.
    #[must_use]
    pub fn to_i32(self) -> i32 {
        self.0.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    /// Minimal encoding of the value.
    #[must_use]
    pub fn serialize(self) -> Vec<u8> {
        if self.0 == 0 {
            return Vec::new();
        }
        let negative = self.0 < 0;
        let mut abs = self.0.unsigned_abs();
        let mut result = Vec::with_capacity(9);
        while abs > 0 {
            result.push((abs & 0xff) as u8);
            abs >>= 8;
        }
        // A set high bit would read as the sign, so add a sign byte.
        let last = result.len() - 1;
        if result[last] & 0x80 != 0 {
            result.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            result[last] |= 0x80;
        }
        result
    }
}

fn decode(data: &[u8]) -> i64 {
    let last = match data.last() {
        Some(&b) => b,
        None => return 0,
    };
    let mut magnitude: u64 = 0;
    for (i, b) in data.iter().enumerate() {
        magnitude |= (*b as u64) << (8 * i);
    }
    if last & 0x80 != 0 {
        let sign_bit = 0x80u64 << (8 * (data.len() - 1));
        -((magnitude & !sign_bit) as i64)
    } else {
        magnitude as i64
    }
}

/// Whether `data` is no longer than `max_size` and carries no redundant padding byte.
#[must_use]
pub fn is_minimally_encoded(data: &[u8], max_size: usize) -> bool {
    if data.len() > max_size {
        return false;
    }
    match data.last() {
        None => true,
        Some(&last) => {
            // The last byte may only be 0x00 or 0x80 when the previous byte needs its high bit for magnitude.
            last & 0x7f != 0 || (data.len() > 1 && data[data.len() - 2] & 0x80 != 0)
        }
    }
}

impl From<i64> for ScriptNum {
    fn from(v: i64) -> Self {
        ScriptNum(v)
    }
}

impl From<ScriptNum> for i64 {
    fn from(n: ScriptNum) -> Self {
        n.0
    }
}

// Operands are bounded by the numeric length limit, so results only wrap
// when that limit is raised to 8 bytes.
macro_rules! impl_binop {
    ($tr:ident, $f:ident, $wrapping:ident) => {
        impl $tr for ScriptNum {
            type Output = ScriptNum;

            fn $f(self, rhs: ScriptNum) -> ScriptNum {
                ScriptNum(self.0.$wrapping(rhs.0))
            }
        }
    };
}

impl_binop!(Add, add, wrapping_add);
impl_binop!(Sub, sub, wrapping_sub);
impl_binop!(Mul, mul, wrapping_mul);
impl_binop!(Div, div, wrapping_div);
impl_binop!(Rem, rem, wrapping_rem);

impl Neg for ScriptNum {
    type Output = ScriptNum;

    fn neg(self) -> ScriptNum {
        ScriptNum(self.0.wrapping_neg())
    }
}

impl fmt::Display for ScriptNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
