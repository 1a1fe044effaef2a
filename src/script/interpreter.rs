//! Script evaluation.
//!
//! [`eval_script`] runs one script against a stack. [`verify_script`] runs a
//! scriptSig and then a scriptPubKey on one shared stack and checks the result.
//! Evaluation never panics out: any fault inside is reported as
//! [`ScriptError::UnknownError`].

use crate::script::config::MAX_PUBKEYS_PER_MULTISIG;
use crate::script::sig_encoding::{check_pubkey_encoding, check_signature_encoding, sighash_type};
use crate::script::{
    is_minimally_encoded, Op, Opcode, Operand, Ops, Script, ScriptConfig, ScriptError, ScriptFlags, ScriptNum,
    SignatureChecker, Stack,
};
use crate::transaction::sighash::SIGHASH_FORKID;
use crate::util::{hash160, sha256d};
use bitcoin_hashes::{ripemd160 as bh_ripemd160, sha1 as bh_sha1, sha256 as bh_sha256, Hash as BHHash};
use log::{debug, trace};
use std::panic::{self, AssertUnwindSafe};

/// Evaluates `script`, leaving its results on `stack`.
///
/// # Errors
/// The first [`ScriptError`] raised. The stack contents are unspecified after an error.
pub fn eval_script<'a, C: SignatureChecker + ?Sized>(
    stack: &mut Stack<Operand<'a>>,
    script: &'a Script,
    flags: ScriptFlags,
    checker: &C,
    config: &ScriptConfig,
) -> Result<(), ScriptError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        Interpreter::new(stack, script.as_bytes(), flags, checker, config).run()
    }));
    match result {
        Ok(result) => result,
        Err(_) => {
            debug!("Script evaluation panicked");
            Err(ScriptError::UnknownError)
        }
    }
}

/// Verifies that `script_sig` satisfies `script_pub` with the default consensus limits.
///
/// # Errors
/// The [`ScriptError`] that made verification fail.
pub fn verify_script<C: SignatureChecker + ?Sized>(
    script_sig: &Script,
    script_pub: &Script,
    flags: ScriptFlags,
    checker: &C,
) -> Result<(), ScriptError> {
    verify_script_with_config(script_sig, script_pub, flags, checker, &ScriptConfig::default())
}

/// Verifies that `script_sig` satisfies `script_pub` under `config`.
///
/// # Errors
/// The [`ScriptError`] that made verification fail.
pub fn verify_script_with_config<C: SignatureChecker + ?Sized>(
    script_sig: &Script,
    script_pub: &Script,
    flags: ScriptFlags,
    checker: &C,
    config: &ScriptConfig,
) -> Result<(), ScriptError> {
    if flags.contains(ScriptFlags::SIGPUSHONLY) && !script_sig.is_push_only() {
        return Err(ScriptError::SigPushOnly);
    }
    let mut stack = Stack::new();
    eval_script(&mut stack, script_sig, flags, checker, config)?;
    eval_script(&mut stack, script_pub, flags, checker, config)?;
    match stack.top() {
        Some(top) if top.to_bool() => {}
        _ => return Err(ScriptError::EvalFalse),
    }
    if flags.contains(ScriptFlags::CLEANSTACK) && stack.len() != 1 {
        return Err(ScriptError::CleanStack);
    }
    Ok(())
}

/// State of one evaluation.
struct Interpreter<'a, 's, C: ?Sized> {
    script: &'a [u8],
    stack: &'s mut Stack<Operand<'a>>,
    alt_stack: Stack<Operand<'a>>,
    /// One entry per open IF: whether its current branch executes.
    exec: Vec<bool>,
    /// Start of the script code signatures commit to.
    begin_code_hash: usize,
    op_count: usize,
    flags: ScriptFlags,
    checker: &'s C,
    config: &'s ScriptConfig,
}

impl<'a, 's, C: SignatureChecker + ?Sized> Interpreter<'a, 's, C> {
    fn new(
        stack: &'s mut Stack<Operand<'a>>,
        script: &'a [u8],
        flags: ScriptFlags,
        checker: &'s C,
        config: &'s ScriptConfig,
    ) -> Self {
        Interpreter {
            script,
            stack,
            alt_stack: Stack::new(),
            exec: Vec::new(),
            begin_code_hash: 0,
            op_count: 0,
            flags,
            checker,
            config,
        }
    }

    fn run(mut self) -> Result<(), ScriptError> {
        if self.script.len() > self.config.max_script_size {
            debug!("Script too long: {}", self.script.len());
            return Err(ScriptError::ScriptSize);
        }
        let mut ops = Ops::new(self.script);
        loop {
            let pos = ops.position();
            let op = match ops.next() {
                Some(Ok(op)) => op,
                Some(Err(e)) => {
                    debug!("Truncated push at {}", pos);
                    return Err(e);
                }
                None => break,
            };
            let name = op.code.name();
            if let Err(e) = self.step(op, ops.position()) {
                debug!("{} failed at {}: {}", name, pos, e.code_name());
                return Err(e);
            }
            if self.stack.len() + self.alt_stack.len() > self.config.max_stack_size {
                debug!("Stack overflow after {} at {}", name, pos);
                return Err(ScriptError::StackSize);
            }
        }
        if !self.exec.is_empty() {
            return Err(ScriptError::UnbalancedConditional);
        }
        Ok(())
    }

    fn step(&mut self, op: Op<'a>, next_pos: usize) -> Result<(), ScriptError> {
        let executing = self.exec.iter().all(|&e| e);
        if op.data.len() > self.config.max_script_element_size {
            return Err(ScriptError::PushSize);
        }
        if !op.code.is_push() {
            self.add_ops(1)?;
        }
        // Disabled opcodes fail even in an unexecuted branch
        if op.code.is_disabled() {
            return Err(ScriptError::DisabledOpcode);
        }
        if executing && op.code.is_push_data() {
            if self.require_minimal() && !op.is_minimal_push() {
                return Err(ScriptError::MinimalData);
            }
            self.stack.push(op.data);
            return Ok(());
        }
        if !executing && !op.code.is_conditional() {
            return Ok(());
        }
        trace!("{} {}", next_pos, op.code.name());
        self.execute(op.code, executing, next_pos)
    }

    fn execute(&mut self, code: Opcode, executing: bool, next_pos: usize) -> Result<(), ScriptError> {
        if let Some(n) = code.small_int() {
            self.push_num(ScriptNum::new(n));
            return Ok(());
        }
        match code {
            Opcode::OP_NOP => {}
            Opcode::OP_CHECKLOCKTIMEVERIFY => {
                if !self.flags.contains(ScriptFlags::CHECKLOCKTIMEVERIFY) {
                    self.upgradable_nop()?;
                }
            }
            Opcode::OP_CHECKSEQUENCEVERIFY => {
                if !self.flags.contains(ScriptFlags::CHECKSEQUENCEVERIFY) {
                    self.upgradable_nop()?;
                }
            }
            Opcode::OP_NOP1
            | Opcode::OP_NOP4
            | Opcode::OP_NOP5
            | Opcode::OP_NOP6
            | Opcode::OP_NOP7
            | Opcode::OP_NOP8
            | Opcode::OP_NOP9
            | Opcode::OP_NOP10 => self.upgradable_nop()?,

            // Control
            Opcode::OP_IF | Opcode::OP_NOTIF => {
                let mut value = false;
                if executing {
                    let top = self.stack.pop().ok_or(ScriptError::UnbalancedConditional)?;
                    if self.flags.contains(ScriptFlags::MINIMALIF)
                        && (top.len() > 1 || (top.len() == 1 && top[0] != 1))
                    {
                        return Err(ScriptError::MinimalIf);
                    }
                    value = top.to_bool();
                    if code == Opcode::OP_NOTIF {
                        value = !value;
                    }
                }
                self.exec.push(value);
            }
            Opcode::OP_ELSE => match self.exec.last_mut() {
                Some(top) => *top = !*top,
                None => return Err(ScriptError::UnbalancedConditional),
            },
            Opcode::OP_ENDIF => {
                self.exec.pop().ok_or(ScriptError::UnbalancedConditional)?;
            }
            Opcode::OP_VERIFY => {
                self.check_depth(1)?;
                if !self.stack.peek(0).to_bool() {
                    return Err(ScriptError::Verify);
                }
                self.pop()?;
            }
            Opcode::OP_RETURN => return Err(ScriptError::OpReturn),

            // Stack
            Opcode::OP_TOALTSTACK => {
                let top = self.pop()?;
                self.alt_stack.push(top);
            }
            Opcode::OP_FROMALTSTACK => {
                let top = self.alt_stack.pop().ok_or(ScriptError::InvalidAltstackOperation)?;
                self.stack.push(top);
            }
            Opcode::OP_2DROP => {
                self.check_depth(2)?;
                self.stack.drop2();
            }
            Opcode::OP_2DUP => {
                self.check_depth(2)?;
                self.stack.dup2();
            }
            Opcode::OP_3DUP => {
                self.check_depth(3)?;
                self.stack.dup3();
            }
            Opcode::OP_2OVER => {
                self.check_depth(4)?;
                self.stack.over2();
            }
            Opcode::OP_2ROT => {
                self.check_depth(6)?;
                self.stack.rot2();
            }
            Opcode::OP_2SWAP => {
                self.check_depth(4)?;
                self.stack.swap2();
            }
            Opcode::OP_IFDUP => {
                self.check_depth(1)?;
                if self.stack.peek(0).to_bool() {
                    self.stack.dup();
                }
            }
            Opcode::OP_DEPTH => {
                let depth = self.stack.len() as i64;
                self.push_num(ScriptNum::new(depth));
            }
            Opcode::OP_DROP => {
                self.pop()?;
            }
            Opcode::OP_DUP => {
                self.check_depth(1)?;
                self.stack.dup();
            }
            Opcode::OP_NIP => {
                self.check_depth(2)?;
                self.stack.nip();
            }
            Opcode::OP_OVER => {
                self.check_depth(2)?;
                self.stack.over();
            }
            Opcode::OP_PICK | Opcode::OP_ROLL => {
                self.check_depth(2)?;
                let n = self.num(0)?.value();
                self.pop()?;
                if n < 0 || n as usize >= self.stack.len() {
                    return Err(ScriptError::InvalidStackOperation);
                }
                if code == Opcode::OP_ROLL {
                    self.stack.roll(n as usize);
                } else {
                    self.stack.pick(n as usize);
                }
            }
            Opcode::OP_ROT => {
                self.check_depth(3)?;
                self.stack.rot();
            }
            Opcode::OP_SWAP => {
                self.check_depth(2)?;
                self.stack.swap();
            }
            Opcode::OP_TUCK => {
                self.check_depth(2)?;
                self.stack.tuck();
            }

            // Splice
            Opcode::OP_CAT => {
                self.check_depth(2)?;
                if self.stack.peek(1).len() + self.stack.peek(0).len() > self.config.max_script_element_size {
                    return Err(ScriptError::PushSize);
                }
                let b = self.pop()?;
                let a = self.pop()?;
                self.stack.push(a.cat(&b));
            }
            Opcode::OP_SPLIT => {
                self.check_depth(2)?;
                let pos = self.num(0)?.value();
                self.pop()?;
                let data = self.pop()?;
                if pos < 0 {
                    return Err(ScriptError::InvalidSplitRange);
                }
                let (left, right) = data.split(pos as usize)?;
                self.stack.push(left);
                self.stack.push(right);
            }
            Opcode::OP_NUM2BIN => {
                self.check_depth(2)?;
                let size = self.num(0)?.value();
                if size < 0 || size as usize > self.config.max_script_element_size {
                    return Err(ScriptError::PushSize);
                }
                self.pop()?;
                let value = self.pop()?;
                self.stack.push(value.num2bin(size as usize)?);
            }
            Opcode::OP_BIN2NUM => {
                let value = self.pop()?.bin2num();
                if !is_minimally_encoded(&value, self.config.max_script_num_length) {
                    return Err(ScriptError::InvalidNumberRange);
                }
                self.stack.push(value);
            }
            Opcode::OP_SIZE => {
                self.check_depth(1)?;
                let size = self.stack.peek(0).len() as i64;
                self.push_num(ScriptNum::new(size));
            }

            // Bitwise
            Opcode::OP_INVERT => {
                let value = self.pop()?;
                self.stack.push(value.bit_invert());
            }
            Opcode::OP_AND | Opcode::OP_OR | Opcode::OP_XOR => {
                self.check_depth(2)?;
                let b = self.pop()?;
                let a = self.pop()?;
                let result = match code {
                    Opcode::OP_AND => a.bit_and(&b)?,
                    Opcode::OP_OR => a.bit_or(&b)?,
                    _ => a.bit_xor(&b)?,
                };
                self.stack.push(result);
            }
            Opcode::OP_LSHIFT | Opcode::OP_RSHIFT => {
                self.check_depth(2)?;
                let n = self.num(0)?.value();
                if n < 0 {
                    return Err(ScriptError::InvalidNumberRange);
                }
                self.pop()?;
                let value = self.pop()?;
                let shifted = if code == Opcode::OP_LSHIFT {
                    value.lshift(n as usize)
                } else {
                    value.rshift(n as usize)
                };
                self.stack.push(shifted);
            }
            Opcode::OP_EQUAL | Opcode::OP_EQUALVERIFY => {
                self.check_depth(2)?;
                let b = self.pop()?;
                let a = self.pop()?;
                let equal = a.as_bytes() == b.as_bytes();
                if code == Opcode::OP_EQUALVERIFY {
                    if !equal {
                        return Err(ScriptError::EqualVerify);
                    }
                } else {
                    self.stack.push(Operand::from_bool(equal));
                }
            }

            // Numeric
            Opcode::OP_1ADD => self.unary_num(|n| n + ScriptNum::new(1))?,
            Opcode::OP_1SUB => self.unary_num(|n| n - ScriptNum::new(1))?,
            Opcode::OP_NEGATE => self.unary_num(|n| -n)?,
            Opcode::OP_ABS => self.unary_num(|n| if n.value() < 0 { -n } else { n })?,
            Opcode::OP_NOT => self.unary_num(|n| bool_num(n.value() == 0))?,
            Opcode::OP_0NOTEQUAL => self.unary_num(|n| bool_num(n.value() != 0))?,
            Opcode::OP_ADD => self.binary_num(|a, b| Ok(a + b))?,
            Opcode::OP_SUB => self.binary_num(|a, b| Ok(a - b))?,
            Opcode::OP_MUL => self.binary_num(|a, b| Ok(a * b))?,
            Opcode::OP_DIV => self.binary_num(|a, b| {
                if b.value() == 0 {
                    return Err(ScriptError::DivByZero);
                }
                Ok(a / b)
            })?,
            Opcode::OP_MOD => self.binary_num(|a, b| {
                if b.value() == 0 {
                    return Err(ScriptError::ModByZero);
                }
                Ok(a % b)
            })?,
            Opcode::OP_BOOLAND => self.binary_num(|a, b| Ok(bool_num(a.value() != 0 && b.value() != 0)))?,
            Opcode::OP_BOOLOR => self.binary_num(|a, b| Ok(bool_num(a.value() != 0 || b.value() != 0)))?,
            Opcode::OP_NUMEQUAL => self.binary_num(|a, b| Ok(bool_num(a == b)))?,
            Opcode::OP_NUMEQUALVERIFY => {
                self.binary_num(|a, b| Ok(bool_num(a == b)))?;
                if !self.stack.peek(0).to_bool() {
                    return Err(ScriptError::NumEqualVerify);
                }
                self.pop()?;
            }
            Opcode::OP_NUMNOTEQUAL => self.binary_num(|a, b| Ok(bool_num(a != b)))?,
            Opcode::OP_LESSTHAN => self.binary_num(|a, b| Ok(bool_num(a < b)))?,
            Opcode::OP_GREATERTHAN => self.binary_num(|a, b| Ok(bool_num(a > b)))?,
            Opcode::OP_LESSTHANOREQUAL => self.binary_num(|a, b| Ok(bool_num(a <= b)))?,
            Opcode::OP_GREATERTHANOREQUAL => self.binary_num(|a, b| Ok(bool_num(a >= b)))?,
            Opcode::OP_MIN => self.binary_num(|a, b| Ok(a.min(b)))?,
            Opcode::OP_MAX => self.binary_num(|a, b| Ok(a.max(b)))?,
            Opcode::OP_WITHIN => {
                self.check_depth(3)?;
                let x = self.num(2)?;
                let min = self.num(1)?;
                let max = self.num(0)?;
                for _ in 0..3 {
                    self.pop()?;
                }
                self.stack.push(Operand::from_bool(min <= x && x < max));
            }

            // Crypto
            Opcode::OP_RIPEMD160 => self.hash_top(|v| bh_ripemd160::Hash::hash(v).to_byte_array().to_vec())?,
            Opcode::OP_SHA1 => self.hash_top(|v| bh_sha1::Hash::hash(v).to_byte_array().to_vec())?,
            Opcode::OP_SHA256 => self.hash_top(|v| bh_sha256::Hash::hash(v).to_byte_array().to_vec())?,
            Opcode::OP_HASH160 => self.hash_top(|v| hash160(v).0.to_vec())?,
            Opcode::OP_HASH256 => self.hash_top(|v| sha256d(v).0.to_vec())?,
            Opcode::OP_CODESEPARATOR => self.begin_code_hash = next_pos,
            Opcode::OP_CHECKSIG | Opcode::OP_CHECKSIGVERIFY => {
                self.check_sig(code == Opcode::OP_CHECKSIGVERIFY)?;
            }
            Opcode::OP_CHECKMULTISIG | Opcode::OP_CHECKMULTISIGVERIFY => {
                self.check_multisig(code == Opcode::OP_CHECKMULTISIGVERIFY)?;
            }

            _ => return Err(ScriptError::BadOpcode),
        }
        Ok(())
    }

    fn check_sig(&mut self, verify: bool) -> Result<(), ScriptError> {
        self.check_depth(2)?;
        let sig = self.stack.peek(1);
        let pubkey = self.stack.peek(0);
        let script_code = cleanup_script_code(self.script_code(), sig, self.flags);
        check_signature_encoding(sig, self.flags)?;
        check_pubkey_encoding(pubkey, self.flags)?;
        let success = self.checker.check_sig(sig, pubkey, &script_code, self.flags);
        if !success && self.flags.contains(ScriptFlags::NULLFAIL) && !sig.is_empty() {
            return Err(ScriptError::SigNullFail);
        }
        self.stack.drop2();
        if verify {
            if !success {
                return Err(ScriptError::CheckSigVerify);
            }
        } else {
            self.stack.push(Operand::from_bool(success));
        }
        Ok(())
    }

    /// Stack: `dummy sig_1 .. sig_m m key_1 .. key_n n`, top rightmost.
    fn check_multisig(&mut self, verify: bool) -> Result<(), ScriptError> {
        // Depths below are 1-based from the top
        let mut i = 1;
        self.check_depth(i)?;
        let keys = self.num(i - 1)?.value();
        if keys < 0 || keys as usize > MAX_PUBKEYS_PER_MULTISIG {
            return Err(ScriptError::PubkeyCount);
        }
        let mut keys_left = keys as usize;
        self.add_ops(keys_left)?;
        i += 1;
        let mut ikey = i;
        // Count of key-side elements still on the stack when unwinding, for NULLFAIL
        let mut ikey2 = keys_left + 2;
        i += keys_left;
        self.check_depth(i)?;

        let sigs = self.num(i - 1)?.value();
        if sigs < 0 || sigs as usize > keys_left {
            return Err(ScriptError::SigCount);
        }
        let mut sigs_left = sigs as usize;
        i += 1;
        let mut isig = i;
        i += sigs_left;
        self.check_depth(i)?;

        let mut script_code = self.script_code();
        for k in 0..sigs_left {
            script_code = cleanup_script_code(script_code, self.stack.peek(isig + k - 1), self.flags);
        }

        let mut success = true;
        while success && sigs_left > 0 {
            let sig = self.stack.peek(isig - 1);
            let pubkey = self.stack.peek(ikey - 1);
            check_signature_encoding(sig, self.flags)?;
            check_pubkey_encoding(pubkey, self.flags)?;
            if self.checker.check_sig(sig, pubkey, &script_code, self.flags) {
                isig += 1;
                sigs_left -= 1;
            }
            ikey += 1;
            keys_left -= 1;
            // More signatures left than keys means failure
            if sigs_left > keys_left {
                success = false;
            }
        }

        // Everything but the dummy
        while i > 1 {
            i -= 1;
            if !success
                && self.flags.contains(ScriptFlags::NULLFAIL)
                && ikey2 == 0
                && !self.stack.peek(0).is_empty()
            {
                return Err(ScriptError::SigNullFail);
            }
            ikey2 = ikey2.saturating_sub(1);
            self.pop()?;
        }

        self.check_depth(1)?;
        if self.flags.contains(ScriptFlags::NULLDUMMY) && !self.stack.peek(0).is_empty() {
            return Err(ScriptError::SigNullDummy);
        }
        self.pop()?;

        if verify {
            if !success {
                return Err(ScriptError::CheckMultiSigVerify);
            }
        } else {
            self.stack.push(Operand::from_bool(success));
        }
        Ok(())
    }

    fn script_code(&self) -> Script {
        Script(self.script[self.begin_code_hash..].to_vec())
    }

    fn upgradable_nop(&self) -> Result<(), ScriptError> {
        if self.flags.contains(ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS) {
            return Err(ScriptError::DiscourageUpgradableNops);
        }
        Ok(())
    }

    fn add_ops(&mut self, n: usize) -> Result<(), ScriptError> {
        self.op_count += n;
        if self.op_count > self.config.max_ops_per_script {
            return Err(ScriptError::OpCount);
        }
        Ok(())
    }

    #[inline]
    fn require_minimal(&self) -> bool {
        self.flags.contains(ScriptFlags::MINIMALDATA)
    }

    #[inline]
    fn check_depth(&self, depth: usize) -> Result<(), ScriptError> {
        if self.stack.len() < depth {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(())
    }

    #[inline]
    fn pop(&mut self) -> Result<Operand<'a>, ScriptError> {
        self.stack.pop().ok_or(ScriptError::InvalidStackOperation)
    }

    /// Decodes the `n`-th item from the top as a number. Depth must already be checked.
    fn num(&self, n: usize) -> Result<ScriptNum, ScriptError> {
        ScriptNum::from_operand(self.stack.peek(n), self.require_minimal(), self.config.max_script_num_length)
    }

    fn push_num(&mut self, n: ScriptNum) {
        self.stack.push(Operand::owned(n.serialize()));
    }

    fn unary_num(&mut self, f: impl FnOnce(ScriptNum) -> ScriptNum) -> Result<(), ScriptError> {
        self.check_depth(1)?;
        let n = self.num(0)?;
        self.pop()?;
        self.push_num(f(n));
        Ok(())
    }

    fn binary_num(
        &mut self,
        f: impl FnOnce(ScriptNum, ScriptNum) -> Result<ScriptNum, ScriptError>,
    ) -> Result<(), ScriptError> {
        self.check_depth(2)?;
        let a = self.num(1)?;
        let b = self.num(0)?;
        self.stack.drop2();
        self.push_num(f(a, b)?);
        Ok(())
    }

    fn hash_top(&mut self, f: impl FnOnce(&[u8]) -> Vec<u8>) -> Result<(), ScriptError> {
        let value = self.pop()?;
        self.stack.push(Operand::owned(f(&value)));
        Ok(())
    }
}

#[inline]
fn bool_num(b: bool) -> ScriptNum {
    ScriptNum::new(b as i64)
}

/// Removes pushes of `sig` from the script code unless the signature commits through FORKID.
fn cleanup_script_code(script_code: Script, sig: &[u8], flags: ScriptFlags) -> Script {
    let uses_fork_id = sighash_type(sig) & SIGHASH_FORKID != 0;
    if flags.contains(ScriptFlags::ENABLE_SIGHASH_FORKID) && uses_fork_id {
        return script_code;
    }
    script_code.find_and_delete(&push_encoding(sig)).0
}

/// Push of `data` by length alone, as signatures appear in legacy script code.
fn push_encoding(data: &[u8]) -> Vec<u8> {
    let code = match data.len() {
        n if n < Opcode::OP_PUSHDATA1 as usize => Opcode::from_u8(n as u8),
        n if n <= 0xff => Opcode::OP_PUSHDATA1,
        n if n <= 0xffff => Opcode::OP_PUSHDATA2,
        _ => Opcode::OP_PUSHDATA4,
    };
    Op { code, data: Operand::borrowed(data) }.to_bytes()
}
