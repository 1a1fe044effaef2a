//! Validation modes consumed by the interpreter.

use crate::util::Error;
use std::fmt;
use std::str::FromStr;

bitflags::bitflags! {
    /// Script verification flags. One value per verification call.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ScriptFlags: u32 {
        /// Recognized but not evaluated: P2SH redemption is not implemented.
        const P2SH = 1 << 0;
        /// Signatures must be strict DER with a defined sighash type and public keys
        /// must be compressed or uncompressed SEC encodings.
        const STRICTENC = 1 << 1;
        /// Signatures must be strict DER.
        const DERSIG = 1 << 2;
        /// Signatures must have S at most half the curve order.
        const LOW_S = 1 << 3;
        /// The extra CHECKMULTISIG element must be empty.
        const NULLDUMMY = 1 << 4;
        /// scriptSig may contain only push operations.
        const SIGPUSHONLY = 1 << 5;
        /// Pushes and numeric operands must be minimally encoded.
        const MINIMALDATA = 1 << 6;
        /// Executing a reserved NOP fails the script.
        const DISCOURAGE_UPGRADABLE_NOPS = 1 << 7;
        /// Exactly one element must remain after verification.
        const CLEANSTACK = 1 << 8;
        /// Treat OP_CHECKLOCKTIMEVERIFY as enabled.
        const CHECKLOCKTIMEVERIFY = 1 << 9;
        /// Treat OP_CHECKSEQUENCEVERIFY as enabled.
        const CHECKSEQUENCEVERIFY = 1 << 10;
        /// OP_IF/OP_NOTIF arguments must be empty or exactly `[1]`.
        const MINIMALIF = 1 << 13;
        /// A failed signature check requires an empty signature.
        const NULLFAIL = 1 << 14;
        /// Public keys must be compressed.
        const COMPRESSED_PUBKEYTYPE = 1 << 15;
        /// Enables the FORKID signature hash and replay protection.
        const ENABLE_SIGHASH_FORKID = 1 << 16;
    }
}

impl FromStr for ScriptFlags {
    type Err = Error;

    /// Parses comma separated flag names, e.g. `"P2SH,STRICTENC"`. `"NONE"` or an empty string is no flags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = ScriptFlags::empty();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name == "NONE" {
                continue;
            }
            match ScriptFlags::from_name(name) {
                Some(flag) => flags |= flag,
                None => return Err(Error::BadArgument(format!("Unknown script flag: {}", name))),
            }
        }
        Ok(flags)
    }
}

impl fmt::Display for ScriptFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        f.write_str(&names.join(","))
    }
}
