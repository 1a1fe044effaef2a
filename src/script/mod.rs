//! Script bytecode and interpreter
//!
//! # Examples
//!
//! Evaluate a script that divides two numbers:
//!
//! ```rust
//! use svscript::script::{eval_script, Opcode, Script, ScriptConfig, ScriptFlags, Stack, TransactionlessChecker};
//!
//! let mut script = Script::new();
//! script.append(Opcode::OP_10);
//! script.append(Opcode::OP_5);
//! script.append(Opcode::OP_DIV);
//!
//! let mut stack = Stack::new();
//! eval_script(&mut stack, &script, ScriptFlags::empty(), &TransactionlessChecker, &ScriptConfig::default()).unwrap();
//! assert_eq!(stack.peek(0).as_bytes(), &[2]);
//! ```

use crate::util::{Error, Result};
use std::fmt;

mod checker;
mod config;
mod error;
mod flags;
mod interpreter;
mod op;
pub mod op_codes;
mod operand;
mod script_num;
pub mod sig_encoding;
mod stack;

pub use self::checker::{SignatureChecker, TransactionChecker, TransactionlessChecker};
pub use self::config::{
    ScriptConfig, MAX_OPS_PER_SCRIPT, MAX_PUBKEYS_PER_MULTISIG, MAX_SCRIPT_ELEMENT_SIZE, MAX_SCRIPT_SIZE,
    MAX_STACK_SIZE,
};
pub use self::error::ScriptError;
pub use self::flags::ScriptFlags;
pub use self::interpreter::{eval_script, verify_script, verify_script_with_config};
pub use self::op::Op;
pub use self::op_codes::Opcode;
pub use self::operand::{minimally_encode, Operand};
pub use self::script_num::{is_minimally_encoded, ScriptNum};
pub use self::stack::Stack;

/// Transaction script
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct Script(pub Vec<u8>);

impl Script {
    /// Creates a new empty script
    #[must_use]
    pub fn new() -> Script {
        Script(vec![])
    }

    /// Raw bytes
    #[must_use]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script has no bytes
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a single opcode
    pub fn append(&mut self, op: Opcode) {
        self.0.push(op as u8);
    }

    /// Appends raw bytes
    pub fn append_slice(&mut self, slice: &[u8]) {
        self.0.extend_from_slice(slice);
    }

    /// Appends the smallest push of `data`
    pub fn append_data(&mut self, data: &[u8]) {
        Op::push_data(data).write_to(&mut self.0);
    }

    /// Appends the smallest push of the number `n`
    pub fn append_num(&mut self, n: i64) {
        Op::push_int(n).write_to(&mut self.0);
    }

    /// Appends an encoded op
    pub fn append_op(&mut self, op: &Op) {
        op.write_to(&mut self.0);
    }

    /// Iterates the decoded ops.
    #[must_use]
    pub fn ops(&self) -> Ops<'_> {
        Ops::new(&self.0)
    }

    /// Whether every op is a push (`OP_16` or below). Malformed scripts are not push only.
    #[must_use]
    pub fn is_push_only(&self) -> bool {
        self.ops().all(|op| matches!(op, Ok(op) if op.code.is_push()))
    }

    /// Removes every op-aligned occurrence of `pattern`, returning the new script and the count removed.
    ///
    /// Matching restarts only at op boundaries, so a pattern inside another push is kept.
    #[must_use]
    pub fn find_and_delete(&self, pattern: &[u8]) -> (Script, usize) {
        let s = &self.0;
        if pattern.is_empty() {
            return (self.clone(), 0);
        }
        let mut result = Vec::with_capacity(s.len());
        let mut found = 0;
        let mut pc = 0;
        let mut copied = 0;
        loop {
            result.extend_from_slice(&s[copied..pc]);
            while s.len() - pc >= pattern.len() && s[pc..].starts_with(pattern) {
                pc += pattern.len();
                found += 1;
            }
            copied = pc;
            match Op::decode(s, pc) {
                Some((_, next)) => pc = next,
                None => break,
            }
        }
        if found == 0 {
            return (self.clone(), 0);
        }
        result.extend_from_slice(&s[copied..]);
        (Script(result), found)
    }

    /// Copy of the script with every `OP_CODESEPARATOR` removed.
    #[must_use]
    pub fn without_code_separators(&self) -> Script {
        let mut result = Vec::with_capacity(self.0.len());
        let mut pos = 0;
        while let Some((op, next)) = Op::decode(&self.0, pos) {
            if op.code != Opcode::OP_CODESEPARATOR {
                result.extend_from_slice(&self.0[pos..next]);
            }
            pos = next;
        }
        result.extend_from_slice(&self.0[pos..]);
        Script(result)
    }

    /// `<33 or 65 byte pubkey> OP_CHECKSIG`
    #[must_use]
    pub fn is_p2pk(&self) -> bool {
        let s = &self.0;
        match s.len() {
            35 => s[0] == 33 && s[34] == Opcode::OP_CHECKSIG as u8,
            67 => s[0] == 65 && s[66] == Opcode::OP_CHECKSIG as u8,
            _ => false,
        }
    }

    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    #[must_use]
    pub fn is_p2pkh(&self) -> bool {
        let s = &self.0;
        s.len() == 25
            && s[0] == Opcode::OP_DUP as u8
            && s[1] == Opcode::OP_HASH160 as u8
            && s[2] == Opcode::OP_PUSHBYTES_20 as u8
            && s[23] == Opcode::OP_EQUALVERIFY as u8
            && s[24] == Opcode::OP_CHECKSIG as u8
    }

    /// Starts with `OP_RETURN`.
    #[must_use]
    pub fn is_op_return(&self) -> bool {
        self.0.first() == Some(&(Opcode::OP_RETURN as u8))
    }

    /// Starts with `OP_FALSE OP_RETURN`, which is unspendable whatever follows.
    #[must_use]
    pub fn is_safe_op_return(&self) -> bool {
        self.0.starts_with(&[Opcode::OP_FALSE as u8, Opcode::OP_RETURN as u8])
    }

    /// Parses space separated asm: opcode names, or hex strings which become minimal pushes.
    pub fn from_asm(asm: &str) -> Result<Script> {
        let mut script = Script::new();
        for token in asm.split_whitespace() {
            if let Some(op) = Opcode::from_name(token) {
                script.append(op);
                continue;
            }
            let data = hex::decode(token).map_err(|_| Error::BadData(format!("Bad asm token: {}", token)))?;
            script.append_data(&data);
        }
        Ok(script)
    }
}

impl From<Vec<u8>> for Script {
    fn from(v: Vec<u8>) -> Self {
        Script(v)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Renders asm. A truncated trailing push is shown as `[error]`.
impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for op in self.ops() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match op {
                Ok(op) => write!(f, "{}", op)?,
                Err(_) => f.write_str("[error]")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Script({})", self)
    }
}

/// Lazily decoded ops of a script. Yields `BadOpcode` once on a truncated push, then stops.
#[derive(Debug, Clone)]
pub struct Ops<'a> {
    script: &'a [u8],
    pos: usize,
}

impl<'a> Ops<'a> {
    /// Iterates ops of raw script bytes.
    #[must_use]
    pub fn new(script: &'a [u8]) -> Self {
        Ops { script, pos: 0 }
    }

    /// Offset of the next op.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Ops<'a> {
    type Item = std::result::Result<Op<'a>, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.script.len() {
            return None;
        }
        match Op::decode(self.script, self.pos) {
            Some((op, next)) => {
                self.pos = next;
                Some(Ok(op))
            }
            None => {
                self.pos = self.script.len();
                Some(Err(ScriptError::BadOpcode))
            }
        }
    }
}
