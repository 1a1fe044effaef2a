//! Closed set of script evaluation failures.

use std::fmt;

/// Reason a script failed to evaluate or verify.
///
/// Every failure is terminal for the evaluation that raised it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScriptError {
    /// Unexpected fault caught at the evaluation boundary
    UnknownError,
    /// Final stack empty or top element false
    EvalFalse,
    /// OP_RETURN was executed
    OpReturn,

    // Size limits
    /// Script longer than the maximum script size
    ScriptSize,
    /// Push larger than the maximum element size
    PushSize,
    /// Too many non-push operations
    OpCount,
    /// Main plus alt stack exceeds the maximum depth
    StackSize,
    /// Signature count out of range in CHECKMULTISIG
    SigCount,
    /// Public key count out of range in CHECKMULTISIG
    PubkeyCount,

    // Operands
    /// Operands of a bitwise op differ in size
    InvalidOperandSize,
    /// Numeric argument outside its allowed range
    InvalidNumberRange,
    /// NUM2BIN target too small for the value
    ImpossibleEncoding,
    /// OP_SPLIT position outside the operand
    InvalidSplitRange,
    /// Number operand longer than allowed
    ScriptNumOverflow,
    /// Number operand not minimally encoded
    ScriptNumMinEncode,

    // Verify family
    /// OP_VERIFY failed
    Verify,
    /// OP_EQUALVERIFY failed
    EqualVerify,
    /// OP_CHECKMULTISIGVERIFY failed
    CheckMultiSigVerify,
    /// OP_CHECKSIGVERIFY failed
    CheckSigVerify,
    /// OP_NUMEQUALVERIFY failed
    NumEqualVerify,

    // Logical and structural
    /// Opcode that is invalid wherever it appears
    BadOpcode,
    /// Opcode that is disabled
    DisabledOpcode,
    /// Main stack too shallow for the operation
    InvalidStackOperation,
    /// Alt stack too shallow for the operation
    InvalidAltstackOperation,
    /// IF/ELSE/ENDIF nesting does not balance
    UnbalancedConditional,

    // Arithmetic
    /// Division by zero
    DivByZero,
    /// Modulo by zero
    ModByZero,

    // Malleability and policy
    /// Undefined sighash type
    SigHashType,
    /// Signature is not strict DER
    SigDer,
    /// Push not encoded with the smallest possible opcode
    MinimalData,
    /// scriptSig contains non-push operations
    SigPushOnly,
    /// Signature S value is above half the curve order
    SigHighS,
    /// CHECKMULTISIG dummy element is not empty
    SigNullDummy,
    /// Public key encoding is invalid
    PubkeyType,
    /// Stack holds more than one element after verification
    CleanStack,
    /// OP_IF/OP_NOTIF argument is not minimal
    MinimalIf,
    /// Failed signature check with a non-empty signature
    SigNullFail,
    /// Reserved NOP executed
    DiscourageUpgradableNops,
    /// Public key is not compressed
    NonCompressedPubkey,

    // Replay protection
    /// Signature uses FORKID when it is not enabled
    IllegalForkId,
    /// Signature must use FORKID
    MustUseForkId,
}

impl ScriptError {
    /// Upper-case name of the error code, e.g. `EVAL_FALSE`.
    #[must_use]
    pub fn code_name(&self) -> &'static str {
        use ScriptError::*;
        match self {
            UnknownError => "UNKNOWN_ERROR",
            EvalFalse => "EVAL_FALSE",
            OpReturn => "OP_RETURN",
            ScriptSize => "SCRIPT_SIZE",
            PushSize => "PUSH_SIZE",
            OpCount => "OP_COUNT",
            StackSize => "STACK_SIZE",
            SigCount => "SIG_COUNT",
            PubkeyCount => "PUBKEY_COUNT",
            InvalidOperandSize => "INVALID_OPERAND_SIZE",
            InvalidNumberRange => "INVALID_NUMBER_RANGE",
            ImpossibleEncoding => "IMPOSSIBLE_ENCODING",
            InvalidSplitRange => "INVALID_SPLIT_RANGE",
            ScriptNumOverflow => "SCRIPTNUM_OVERFLOW",
            ScriptNumMinEncode => "SCRIPTNUM_MINENCODE",
            Verify => "VERIFY",
            EqualVerify => "EQUALVERIFY",
            CheckMultiSigVerify => "CHECKMULTISIGVERIFY",
            CheckSigVerify => "CHECKSIGVERIFY",
            NumEqualVerify => "NUMEQUALVERIFY",
            BadOpcode => "BAD_OPCODE",
            DisabledOpcode => "DISABLED_OPCODE",
            InvalidStackOperation => "INVALID_STACK_OPERATION",
            InvalidAltstackOperation => "INVALID_ALTSTACK_OPERATION",
            UnbalancedConditional => "UNBALANCED_CONDITIONAL",
            DivByZero => "DIV_BY_ZERO",
            ModByZero => "MOD_BY_ZERO",
            SigHashType => "SIG_HASHTYPE",
            SigDer => "SIG_DER",
            MinimalData => "MINIMALDATA",
            SigPushOnly => "SIG_PUSHONLY",
            SigHighS => "SIG_HIGH_S",
            SigNullDummy => "SIG_NULLDUMMY",
            PubkeyType => "PUBKEYTYPE",
            CleanStack => "CLEANSTACK",
            MinimalIf => "MINIMALIF",
            SigNullFail => "SIG_NULLFAIL",
            DiscourageUpgradableNops => "DISCOURAGE_UPGRADABLE_NOPS",
            NonCompressedPubkey => "NONCOMPRESSED_PUBKEY",
            IllegalForkId => "ILLEGAL_FORKID",
            MustUseForkId => "MUST_USE_FORKID",
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ScriptError::*;
        let msg = match self {
            UnknownError => "unknown error",
            EvalFalse => "Script evaluated without error but finished with a false/empty top stack element",
            OpReturn => "OP_RETURN was encountered",
            ScriptSize => "Script is too big",
            PushSize => "Push value size limit exceeded",
            OpCount => "Operation limit exceeded",
            StackSize => "Stack size limit exceeded",
            SigCount => "Signature count negative or greater than pubkey count",
            PubkeyCount => "Pubkey count negative or limit exceeded",
            InvalidOperandSize => "Invalid operand size",
            InvalidNumberRange => "Given operand is not a number within the valid range",
            ImpossibleEncoding => "The requested encoding is impossible to satisfy",
            InvalidSplitRange => "Invalid OP_SPLIT range",
            ScriptNumOverflow => "Script number overflow",
            ScriptNumMinEncode => "Non-minimally encoded script number",
            Verify => "Script failed an OP_VERIFY operation",
            EqualVerify => "Script failed an OP_EQUALVERIFY operation",
            CheckMultiSigVerify => "Script failed an OP_CHECKMULTISIGVERIFY operation",
            CheckSigVerify => "Script failed an OP_CHECKSIGVERIFY operation",
            NumEqualVerify => "Script failed an OP_NUMEQUALVERIFY operation",
            BadOpcode => "Opcode missing or not understood",
            DisabledOpcode => "Attempted to use a disabled opcode",
            InvalidStackOperation => "Operation not valid with the current stack size",
            InvalidAltstackOperation => "Operation not valid with the current altstack size",
            UnbalancedConditional => "Invalid OP_IF construction",
            DivByZero => "Division by zero error",
            ModByZero => "Modulo by zero error",
            SigHashType => "Signature hash type missing or not understood",
            SigDer => "Non-canonical DER signature",
            MinimalData => "Data push larger than necessary",
            SigPushOnly => "Only non-push operators allowed in signatures",
            SigHighS => "Non-canonical signature: S value is unnecessarily high",
            SigNullDummy => "Dummy CHECKMULTISIG argument must be zero",
            PubkeyType => "Public key is neither compressed or uncompressed",
            CleanStack => "Script did not clean its stack",
            MinimalIf => "OP_IF/NOTIF argument must be minimal",
            SigNullFail => "Signature must be zero for failed CHECK(MULTI)SIG operation",
            DiscourageUpgradableNops => "NOPx reserved for soft-fork upgrades",
            NonCompressedPubkey => "Using non-compressed public key",
            IllegalForkId => "Illegal use of SIGHASH_FORKID",
            MustUseForkId => "Signature must use SIGHASH_FORKID",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ScriptError {}
