//! A single decoded script instruction.

use crate::script::op_codes::Opcode;
use crate::script::{Operand, ScriptNum};
use std::fmt;

/// Opcode plus the data it pushes. `data` is empty unless `code` is
/// `OP_0` through `OP_PUSHDATA4`.
#[derive(Clone, PartialEq, Eq)]
pub struct Op<'a> {
    /// Instruction byte
    pub code: Opcode,
    /// Push data
    pub data: Operand<'a>,
}

impl<'a> Op<'a> {
    /// Op without push data.
    #[must_use]
    pub fn code(code: Opcode) -> Op<'static> {
        Op { code, data: Operand::empty() }
    }

    /// Decodes the op starting at `pos`, returning it with the position of the next op.
    ///
    /// Returns `None` when `pos` is at the end or the push data is truncated.
    #[must_use]
    pub fn decode(script: &'a [u8], pos: usize) -> Option<(Op<'a>, usize)> {
        let code = Opcode::from_u8(*script.get(pos)?);
        let mut i = pos + 1;
        let len = match code {
            Opcode::OP_PUSHDATA1 => {
                let n = *script.get(i)? as usize;
                i += 1;
                n
            }
            Opcode::OP_PUSHDATA2 => {
                let b = script.get(i..i + 2)?;
                i += 2;
                u16::from_le_bytes([b[0], b[1]]) as usize
            }
            Opcode::OP_PUSHDATA4 => {
                let b = script.get(i..i + 4)?;
                i += 4;
                u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize
            }
            op if op < Opcode::OP_PUSHDATA1 => op as usize,
            _ => 0,
        };
        let end = i.checked_add(len)?;
        let data = script.get(i..end)?;
        Some((Op { code, data: Operand::borrowed(data) }, end))
    }

    /// Op pushing `data` with the smallest possible encoding.
    #[must_use]
    pub fn push_data(data: &[u8]) -> Op<'static> {
        let code = minimal_push_opcode(data);
        if code.is_push_data() {
            Op { code, data: Operand::owned(data.to_vec()) }
        } else {
            Op::code(code)
        }
    }

    /// Op pushing the number `n`: `OP_1NEGATE`, `OP_0..OP_16`, or its minimal encoding.
    #[must_use]
    pub fn push_int(n: i64) -> Op<'static> {
        match Opcode::from_small_int(n) {
            Some(code) => Op::code(code),
            None => Op::push_data(&ScriptNum::new(n).serialize()),
        }
    }

    /// Value this op pushes onto the stack, if it is a push.
    #[must_use]
    pub fn push_value(&self) -> Option<Operand<'a>> {
        if self.code.is_push_data() {
            return Some(self.data.clone());
        }
        self.code.small_int().map(|n| Operand::owned(ScriptNum::new(n).serialize()))
    }

    /// Whether the push uses the opcode [`Op::push_data`] would choose.
    #[must_use]
    pub fn is_minimal_push(&self) -> bool {
        self.code == minimal_push_opcode(&self.data)
    }

    /// Encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        let prefix = match self.code {
            Opcode::OP_PUSHDATA1 => 1,
            Opcode::OP_PUSHDATA2 => 2,
            Opcode::OP_PUSHDATA4 => 4,
            _ => 0,
        };
        1 + prefix + self.data.len()
    }

    /// Always false; an op is at least one byte.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Appends the encoded op to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.code as u8);
        let len = self.data.len();
        match self.code {
            Opcode::OP_PUSHDATA1 => out.push(len as u8),
            Opcode::OP_PUSHDATA2 => out.extend_from_slice(&(len as u16).to_le_bytes()),
            Opcode::OP_PUSHDATA4 => out.extend_from_slice(&(len as u32).to_le_bytes()),
            _ => {}
        }
        out.extend_from_slice(&self.data);
    }

    /// Encoded bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(self.len());
        self.write_to(&mut v);
        v
    }
}

fn minimal_push_opcode(data: &[u8]) -> Opcode {
    match data.len() {
        0 => Opcode::OP_0,
        1 if (1..=16).contains(&data[0]) => Opcode::from_u8(Opcode::OP_1 as u8 + data[0] - 1),
        1 if data[0] == 0x81 => Opcode::OP_1NEGATE,
        n if n < Opcode::OP_PUSHDATA1 as usize => Opcode::from_u8(n as u8),
        n if n <= 0xff => Opcode::OP_PUSHDATA1,
        n if n <= 0xffff => Opcode::OP_PUSHDATA2,
        _ => Opcode::OP_PUSHDATA4,
    }
}

impl<'a> fmt::Display for Op<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.code.is_push_data() && !self.data.is_empty() {
            f.write_str(&hex::encode(self.data.as_bytes()))
        } else {
            f.write_str(self.code.name())
        }
    }
}

impl<'a> fmt::Debug for Op<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.code.is_push_data() {
            write!(f, "{} {}", self.code.name(), hex::encode(self.data.as_bytes()))
        } else {
            f.write_str(self.code.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn decode_pushes() {
        let script = [0x02, 0xaa, 0xbb, 0x4c, 0x01, 0xcc, 0x4d, 0x01, 0x00, 0xdd, 0x76];
        let (op, next) = Op::decode(&script, 0).unwrap();
        assert_eq!((op.code, op.data.as_bytes(), next), (Opcode::OP_PUSHBYTES_2, &[0xaa, 0xbb][..], 3));
        let (op, next) = Op::decode(&script, next).unwrap();
        assert_eq!((op.code, op.data.as_bytes(), next), (Opcode::OP_PUSHDATA1, &[0xcc][..], 6));
        let (op, next) = Op::decode(&script, next).unwrap();
        assert_eq!((op.code, op.data.as_bytes(), next), (Opcode::OP_PUSHDATA2, &[0xdd][..], 10));
        let (op, next) = Op::decode(&script, next).unwrap();
        assert_eq!((op.code, op.len(), next), (Opcode::OP_DUP, 1, 11));
        assert!(Op::decode(&script, next).is_none());
    }

    #[test]
    fn decode_truncated() {
        assert!(Op::decode(&[0x03, 0x01, 0x02], 0).is_none());
        assert!(Op::decode(&[0x4c], 0).is_none());
        assert!(Op::decode(&[0x4d, 0x01], 0).is_none());
        assert!(Op::decode(&[0x4e, 0xff, 0xff, 0xff, 0xff], 0).is_none());
    }

    #[test]
    fn push_data_minimal() {
        assert_eq!(Op::push_data(&[]).code, Opcode::OP_0);
        assert_eq!(Op::push_data(&[5]).code, Opcode::OP_5);
        assert_eq!(Op::push_data(&[16]).code, Opcode::OP_16);
        assert_eq!(Op::push_data(&[0x81]).code, Opcode::OP_1NEGATE);
        assert_eq!(Op::push_data(&[0]).code, Opcode::OP_PUSHBYTES_1);
        assert_eq!(Op::push_data(&[17]).code, Opcode::OP_PUSHBYTES_1);
        assert_eq!(Op::push_data(&[0; 75]).code, Opcode::OP_PUSHBYTES_75);
        assert_eq!(Op::push_data(&[0; 76]).code, Opcode::OP_PUSHDATA1);
        assert_eq!(Op::push_data(&[0; 256]).code, Opcode::OP_PUSHDATA2);
        assert_eq!(Op::push_data(&[0; 65536]).code, Opcode::OP_PUSHDATA4);
        assert_eq!(Op::push_data(&[0; 76]).len(), 78);
    }

    #[test]
    fn push_int() {
        assert_eq!(Op::push_int(-1).code, Opcode::OP_1NEGATE);
        assert_eq!(Op::push_int(0).code, Opcode::OP_0);
        assert_eq!(Op::push_int(16).code, Opcode::OP_16);
        let op = Op::push_int(17);
        assert_eq!((op.code, op.data.as_bytes()), (Opcode::OP_PUSHBYTES_1, &[17][..]));
        let op = Op::push_int(-1000);
        assert_eq!(op.data.as_bytes(), &[0xe8, 0x83]);
        assert_eq!(Op::push_int(0x7fff_ffff).data.len(), 4);
    }

    #[test]
    fn minimal_push_check() {
        let bytes = [0x01, 0x05];
        let (op, _) = Op::decode(&bytes, 0).unwrap();
        assert!(!op.is_minimal_push());
        let bytes = [0x4c, 0x01, 0x20];
        let (op, _) = Op::decode(&bytes, 0).unwrap();
        assert!(!op.is_minimal_push());
        let bytes = [0x01, 0x20];
        let (op, _) = Op::decode(&bytes, 0).unwrap();
        assert!(op.is_minimal_push());
    }

    proptest! {
        #[test]
        fn push_then_decode(data in proptest::collection::vec(any::<u8>(), 0..600)) {
            let bytes = Op::push_data(&data).to_bytes();
            let (op, next) = Op::decode(&bytes, 0).unwrap();
            prop_assert_eq!(next, bytes.len());
            prop_assert!(op.is_minimal_push() || !op.code.is_push_data());
            let pushed = op.push_value().unwrap();
            prop_assert_eq!(pushed.as_bytes(), &data[..]);
        }
    }
}
