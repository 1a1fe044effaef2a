//! Script opcodes for Bitcoin SV.
//!
//! Every byte value is a variant of [`Opcode`], so decoding a byte never fails
//! and dispatch in the interpreter is an exhaustive `match`.
//!
//! # Examples
//! ```
//! use svscript::script::Opcode;
//! assert_eq!(Opcode::OP_IF as u8, 99);
//! assert_eq!(Opcode::from_u8(0xac), Opcode::OP_CHECKSIG);
//! ```

macro_rules! opcodes {
    ($( $(#[$doc:meta])* $name:ident = $val:literal, )*) => {
        /// One script instruction byte.
        #[allow(non_camel_case_types, missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Opcode {
            $( $(#[$doc])* $name = $val, )*
        }

        impl Opcode {
            /// Maps a byte onto its opcode.
            #[must_use]
            pub const fn from_u8(b: u8) -> Opcode {
                match b {
                    $( $val => Opcode::$name, )*
                }
            }

            /// Name of the opcode as written in script asm, e.g. `OP_DUP`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Opcode::$name => stringify!($name), )*
                }
            }
        }
    };
}

opcodes! {
    /// Pushes an empty byte string.
    OP_0 = 0x00,
    OP_PUSHBYTES_1 = 0x01,
    OP_PUSHBYTES_2 = 0x02,
    OP_PUSHBYTES_3 = 0x03,
    OP_PUSHBYTES_4 = 0x04,
    OP_PUSHBYTES_5 = 0x05,
    OP_PUSHBYTES_6 = 0x06,
    OP_PUSHBYTES_7 = 0x07,
    OP_PUSHBYTES_8 = 0x08,
    OP_PUSHBYTES_9 = 0x09,
    OP_PUSHBYTES_10 = 0x0a,
    OP_PUSHBYTES_11 = 0x0b,
    OP_PUSHBYTES_12 = 0x0c,
    OP_PUSHBYTES_13 = 0x0d,
    OP_PUSHBYTES_14 = 0x0e,
    OP_PUSHBYTES_15 = 0x0f,
    OP_PUSHBYTES_16 = 0x10,
    OP_PUSHBYTES_17 = 0x11,
    OP_PUSHBYTES_18 = 0x12,
    OP_PUSHBYTES_19 = 0x13,
    OP_PUSHBYTES_20 = 0x14,
    OP_PUSHBYTES_21 = 0x15,
    OP_PUSHBYTES_22 = 0x16,
    OP_PUSHBYTES_23 = 0x17,
    OP_PUSHBYTES_24 = 0x18,
    OP_PUSHBYTES_25 = 0x19,
    OP_PUSHBYTES_26 = 0x1a,
    OP_PUSHBYTES_27 = 0x1b,
    OP_PUSHBYTES_28 = 0x1c,
    OP_PUSHBYTES_29 = 0x1d,
    OP_PUSHBYTES_30 = 0x1e,
    OP_PUSHBYTES_31 = 0x1f,
    OP_PUSHBYTES_32 = 0x20,
    OP_PUSHBYTES_33 = 0x21,
    OP_PUSHBYTES_34 = 0x22,
    OP_PUSHBYTES_35 = 0x23,
    OP_PUSHBYTES_36 = 0x24,
    OP_PUSHBYTES_37 = 0x25,
    OP_PUSHBYTES_38 = 0x26,
    OP_PUSHBYTES_39 = 0x27,
    OP_PUSHBYTES_40 = 0x28,
    OP_PUSHBYTES_41 = 0x29,
    OP_PUSHBYTES_42 = 0x2a,
    OP_PUSHBYTES_43 = 0x2b,
    OP_PUSHBYTES_44 = 0x2c,
    OP_PUSHBYTES_45 = 0x2d,
    OP_PUSHBYTES_46 = 0x2e,
    OP_PUSHBYTES_47 = 0x2f,
    OP_PUSHBYTES_48 = 0x30,
    OP_PUSHBYTES_49 = 0x31,
    OP_PUSHBYTES_50 = 0x32,
    OP_PUSHBYTES_51 = 0x33,
    OP_PUSHBYTES_52 = 0x34,
    OP_PUSHBYTES_53 = 0x35,
    OP_PUSHBYTES_54 = 0x36,
    OP_PUSHBYTES_55 = 0x37,
    OP_PUSHBYTES_56 = 0x38,
    OP_PUSHBYTES_57 = 0x39,
    OP_PUSHBYTES_58 = 0x3a,
    OP_PUSHBYTES_59 = 0x3b,
    OP_PUSHBYTES_60 = 0x3c,
    OP_PUSHBYTES_61 = 0x3d,
    OP_PUSHBYTES_62 = 0x3e,
    OP_PUSHBYTES_63 = 0x3f,
    OP_PUSHBYTES_64 = 0x40,
    OP_PUSHBYTES_65 = 0x41,
    OP_PUSHBYTES_66 = 0x42,
    OP_PUSHBYTES_67 = 0x43,
    OP_PUSHBYTES_68 = 0x44,
    OP_PUSHBYTES_69 = 0x45,
    OP_PUSHBYTES_70 = 0x46,
    OP_PUSHBYTES_71 = 0x47,
    OP_PUSHBYTES_72 = 0x48,
    OP_PUSHBYTES_73 = 0x49,
    OP_PUSHBYTES_74 = 0x4a,
    OP_PUSHBYTES_75 = 0x4b,
    /// Next byte is the push length.
    OP_PUSHDATA1 = 0x4c,
    /// Next two bytes (little endian) are the push length.
    OP_PUSHDATA2 = 0x4d,
    /// Next four bytes (little endian) are the push length.
    OP_PUSHDATA4 = 0x4e,
    /// Pushes -1.
    OP_1NEGATE = 0x4f,
    /// Fails the script when executed.
    OP_RESERVED = 0x50,
    /// Pushes 1.
    OP_1 = 0x51,
    /// Pushes 2.
    OP_2 = 0x52,
    /// Pushes 3.
    OP_3 = 0x53,
    /// Pushes 4.
    OP_4 = 0x54,
    /// Pushes 5.
    OP_5 = 0x55,
    /// Pushes 6.
    OP_6 = 0x56,
    /// Pushes 7.
    OP_7 = 0x57,
    /// Pushes 8.
    OP_8 = 0x58,
    /// Pushes 9.
    OP_9 = 0x59,
    /// Pushes 10.
    OP_10 = 0x5a,
    /// Pushes 11.
    OP_11 = 0x5b,
    /// Pushes 12.
    OP_12 = 0x5c,
    /// Pushes 13.
    OP_13 = 0x5d,
    /// Pushes 14.
    OP_14 = 0x5e,
    /// Pushes 15.
    OP_15 = 0x5f,
    /// Pushes 16.
    OP_16 = 0x60,
    /// Does nothing.
    OP_NOP = 0x61,
    /// Fails the script when executed.
    OP_VER = 0x62,
    /// Executes the following block if the top item is true.
    OP_IF = 0x63,
    /// Executes the following block if the top item is false.
    OP_NOTIF = 0x64,
    /// Fails the script even in an unexecuted branch.
    OP_VERIF = 0x65,
    /// Fails the script even in an unexecuted branch.
    OP_VERNOTIF = 0x66,
    /// Inverts execution of the enclosing IF block.
    OP_ELSE = 0x67,
    /// Ends an IF block.
    OP_ENDIF = 0x68,
    /// Fails unless the top item is true, popping it.
    OP_VERIFY = 0x69,
    /// Fails the script.
    OP_RETURN = 0x6a,
    /// Moves the top item to the alt stack.
    OP_TOALTSTACK = 0x6b,
    /// Moves the top alt stack item to the main stack.
    OP_FROMALTSTACK = 0x6c,
    /// Drops the top two items.
    OP_2DROP = 0x6d,
    /// Duplicates the top two items.
    OP_2DUP = 0x6e,
    /// Duplicates the top three items.
    OP_3DUP = 0x6f,
    /// Copies the third and fourth items to the top.
    OP_2OVER = 0x70,
    /// Moves the fifth and sixth items to the top.
    OP_2ROT = 0x71,
    /// Swaps the top two pairs.
    OP_2SWAP = 0x72,
    /// Duplicates the top item if it is true.
    OP_IFDUP = 0x73,
    /// Pushes the stack depth.
    OP_DEPTH = 0x74,
    /// Drops the top item.
    OP_DROP = 0x75,
    /// Duplicates the top item.
    OP_DUP = 0x76,
    /// Removes the second item.
    OP_NIP = 0x77,
    /// Copies the second item to the top.
    OP_OVER = 0x78,
    /// Copies the nth item to the top.
    OP_PICK = 0x79,
    /// Moves the nth item to the top.
    OP_ROLL = 0x7a,
    /// Rotates the top three items left.
    OP_ROT = 0x7b,
    /// Swaps the top two items.
    OP_SWAP = 0x7c,
    /// Copies the top item below the second.
    OP_TUCK = 0x7d,
    /// Concatenates the top two items.
    OP_CAT = 0x7e,
    /// Splits an item at a position.
    OP_SPLIT = 0x7f,
    /// Resizes a number to a given byte length.
    OP_NUM2BIN = 0x80,
    /// Converts a byte string to a minimal number.
    OP_BIN2NUM = 0x81,
    /// Pushes the length of the top item without popping it.
    OP_SIZE = 0x82,
    /// Flips every bit of the top item.
    OP_INVERT = 0x83,
    /// Bitwise AND of the top two items.
    OP_AND = 0x84,
    /// Bitwise OR of the top two items.
    OP_OR = 0x85,
    /// Bitwise XOR of the top two items.
    OP_XOR = 0x86,
    /// Pushes 1 if the top two items are byte-equal, else 0.
    OP_EQUAL = 0x87,
    /// OP_EQUAL then OP_VERIFY.
    OP_EQUALVERIFY = 0x88,
    /// Fails the script when executed.
    OP_RESERVED1 = 0x89,
    /// Fails the script when executed.
    OP_RESERVED2 = 0x8a,
    /// Adds 1.
    OP_1ADD = 0x8b,
    /// Subtracts 1.
    OP_1SUB = 0x8c,
    /// Disabled.
    OP_2MUL = 0x8d,
    /// Disabled.
    OP_2DIV = 0x8e,
    /// Negates the top number.
    OP_NEGATE = 0x8f,
    /// Absolute value of the top number.
    OP_ABS = 0x90,
    /// Pushes 1 if the top number is 0, else 0.
    OP_NOT = 0x91,
    /// Pushes 0 if the top number is 0, else 1.
    OP_0NOTEQUAL = 0x92,
    /// a + b.
    OP_ADD = 0x93,
    /// a - b.
    OP_SUB = 0x94,
    /// a * b.
    OP_MUL = 0x95,
    /// a / b, truncated.
    OP_DIV = 0x96,
    /// a % b, sign of a.
    OP_MOD = 0x97,
    /// Shifts a byte string left by n bits.
    OP_LSHIFT = 0x98,
    /// Shifts a byte string right by n bits.
    OP_RSHIFT = 0x99,
    /// Pushes 1 if a and b are both nonzero.
    OP_BOOLAND = 0x9a,
    /// Pushes 1 if a or b is nonzero.
    OP_BOOLOR = 0x9b,
    /// Pushes 1 if a == b.
    OP_NUMEQUAL = 0x9c,
    /// OP_NUMEQUAL then OP_VERIFY.
    OP_NUMEQUALVERIFY = 0x9d,
    /// Pushes 1 if a != b.
    OP_NUMNOTEQUAL = 0x9e,
    /// Pushes 1 if a < b.
    OP_LESSTHAN = 0x9f,
    /// Pushes 1 if a > b.
    OP_GREATERTHAN = 0xa0,
    /// Pushes 1 if a <= b.
    OP_LESSTHANOREQUAL = 0xa1,
    /// Pushes 1 if a >= b.
    OP_GREATERTHANOREQUAL = 0xa2,
    /// Smaller of a and b.
    OP_MIN = 0xa3,
    /// Larger of a and b.
    OP_MAX = 0xa4,
    /// Pushes 1 if min <= x < max.
    OP_WITHIN = 0xa5,
    /// RIPEMD160 of the top item.
    OP_RIPEMD160 = 0xa6,
    /// SHA1 of the top item.
    OP_SHA1 = 0xa7,
    /// SHA256 of the top item.
    OP_SHA256 = 0xa8,
    /// RIPEMD160(SHA256) of the top item.
    OP_HASH160 = 0xa9,
    /// SHA256(SHA256) of the top item.
    OP_HASH256 = 0xaa,
    /// Marks the start of the signed script code.
    OP_CODESEPARATOR = 0xab,
    /// Checks a signature against a public key.
    OP_CHECKSIG = 0xac,
    /// OP_CHECKSIG then OP_VERIFY.
    OP_CHECKSIGVERIFY = 0xad,
    /// Checks m signatures against n public keys.
    OP_CHECKMULTISIG = 0xae,
    /// OP_CHECKMULTISIG then OP_VERIFY.
    OP_CHECKMULTISIGVERIFY = 0xaf,
    /// Reserved no-op.
    OP_NOP1 = 0xb0,
    /// Lock time check (BIP-65). Evaluated as a no-op.
    OP_CHECKLOCKTIMEVERIFY = 0xb1,
    /// Relative lock time check (BIP-112). Evaluated as a no-op.
    OP_CHECKSEQUENCEVERIFY = 0xb2,
    /// Reserved no-op.
    OP_NOP4 = 0xb3,
    OP_NOP5 = 0xb4,
    OP_NOP6 = 0xb5,
    OP_NOP7 = 0xb6,
    OP_NOP8 = 0xb7,
    OP_NOP9 = 0xb8,
    OP_NOP10 = 0xb9,
    OP_UNKNOWN186 = 0xba,
    OP_UNKNOWN187 = 0xbb,
    OP_UNKNOWN188 = 0xbc,
    OP_UNKNOWN189 = 0xbd,
    OP_UNKNOWN190 = 0xbe,
    OP_UNKNOWN191 = 0xbf,
    OP_UNKNOWN192 = 0xc0,
    OP_UNKNOWN193 = 0xc1,
    OP_UNKNOWN194 = 0xc2,
    OP_UNKNOWN195 = 0xc3,
    OP_UNKNOWN196 = 0xc4,
    OP_UNKNOWN197 = 0xc5,
    OP_UNKNOWN198 = 0xc6,
    OP_UNKNOWN199 = 0xc7,
    OP_UNKNOWN200 = 0xc8,
    OP_UNKNOWN201 = 0xc9,
    OP_UNKNOWN202 = 0xca,
    OP_UNKNOWN203 = 0xcb,
    OP_UNKNOWN204 = 0xcc,
    OP_UNKNOWN205 = 0xcd,
    OP_UNKNOWN206 = 0xce,
    OP_UNKNOWN207 = 0xcf,
    OP_UNKNOWN208 = 0xd0,
    OP_UNKNOWN209 = 0xd1,
    OP_UNKNOWN210 = 0xd2,
    OP_UNKNOWN211 = 0xd3,
    OP_UNKNOWN212 = 0xd4,
    OP_UNKNOWN213 = 0xd5,
    OP_UNKNOWN214 = 0xd6,
    OP_UNKNOWN215 = 0xd7,
    OP_UNKNOWN216 = 0xd8,
    OP_UNKNOWN217 = 0xd9,
    OP_UNKNOWN218 = 0xda,
    OP_UNKNOWN219 = 0xdb,
    OP_UNKNOWN220 = 0xdc,
    OP_UNKNOWN221 = 0xdd,
    OP_UNKNOWN222 = 0xde,
    OP_UNKNOWN223 = 0xdf,
    OP_UNKNOWN224 = 0xe0,
    OP_UNKNOWN225 = 0xe1,
    OP_UNKNOWN226 = 0xe2,
    OP_UNKNOWN227 = 0xe3,
    OP_UNKNOWN228 = 0xe4,
    OP_UNKNOWN229 = 0xe5,
    OP_UNKNOWN230 = 0xe6,
    OP_UNKNOWN231 = 0xe7,
    OP_UNKNOWN232 = 0xe8,
    OP_UNKNOWN233 = 0xe9,
    OP_UNKNOWN234 = 0xea,
    OP_UNKNOWN235 = 0xeb,
    OP_UNKNOWN236 = 0xec,
    OP_UNKNOWN237 = 0xed,
    OP_UNKNOWN238 = 0xee,
    OP_UNKNOWN239 = 0xef,
    OP_UNKNOWN240 = 0xf0,
    OP_UNKNOWN241 = 0xf1,
    OP_UNKNOWN242 = 0xf2,
    OP_UNKNOWN243 = 0xf3,
    OP_UNKNOWN244 = 0xf4,
    OP_UNKNOWN245 = 0xf5,
    OP_UNKNOWN246 = 0xf6,
    OP_UNKNOWN247 = 0xf7,
    OP_UNKNOWN248 = 0xf8,
    OP_UNKNOWN249 = 0xf9,
    OP_UNKNOWN250 = 0xfa,
    OP_UNKNOWN251 = 0xfb,
    OP_UNKNOWN252 = 0xfc,
    /// Template matching placeholder. Invalid in scripts.
    OP_PUBKEYHASH = 0xfd,
    /// Template matching placeholder. Invalid in scripts.
    OP_PUBKEY = 0xfe,
    /// Invalid opcode.
    OP_INVALIDOPCODE = 0xff,
}

impl Opcode {
    /// Alias of [`Opcode::OP_0`].
    pub const OP_FALSE: Opcode = Opcode::OP_0;
    /// Alias of [`Opcode::OP_1`].
    pub const OP_TRUE: Opcode = Opcode::OP_1;
    /// Former name of [`Opcode::OP_CHECKLOCKTIMEVERIFY`].
    pub const OP_NOP2: Opcode = Opcode::OP_CHECKLOCKTIMEVERIFY;
    /// Former name of [`Opcode::OP_CHECKSEQUENCEVERIFY`].
    pub const OP_NOP3: Opcode = Opcode::OP_CHECKSEQUENCEVERIFY;

    /// Raw byte value.
    #[must_use]
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Whether the opcode is followed by push data (`OP_0` through `OP_PUSHDATA4`).
    #[must_use]
    #[inline]
    pub fn is_push_data(self) -> bool {
        self <= Opcode::OP_PUSHDATA4
    }

    /// Whether the opcode only pushes a value: push data, `OP_1NEGATE`, `OP_RESERVED` and `OP_1..OP_16`.
    ///
    /// Opcodes above `OP_16` count toward the per-script operation limit.
    #[must_use]
    #[inline]
    pub fn is_push(self) -> bool {
        self <= Opcode::OP_16
    }

    /// Small integer pushed by `OP_1NEGATE` and `OP_1..OP_16`.
    #[must_use]
    pub fn small_int(self) -> Option<i64> {
        match self {
            Opcode::OP_1NEGATE => Some(-1),
            op if op >= Opcode::OP_1 && op <= Opcode::OP_16 => Some(op as i64 - Opcode::OP_1 as i64 + 1),
            _ => None,
        }
    }

    /// Opcode pushing the small integer `n`, if one exists.
    #[must_use]
    pub fn from_small_int(n: i64) -> Option<Opcode> {
        match n {
            -1 => Some(Opcode::OP_1NEGATE),
            0 => Some(Opcode::OP_0),
            1..=16 => Some(Opcode::from_u8(Opcode::OP_1 as u8 + n as u8 - 1)),
            _ => None,
        }
    }

    /// Opcodes that fail whenever they are executed.
    #[must_use]
    #[inline]
    pub fn is_disabled(self) -> bool {
        matches!(self, Opcode::OP_2MUL | Opcode::OP_2DIV)
    }

    /// `OP_IF` through `OP_ENDIF`; these are dispatched even in unexecuted branches.
    #[must_use]
    #[inline]
    pub fn is_conditional(self) -> bool {
        self >= Opcode::OP_IF && self <= Opcode::OP_ENDIF
    }

    /// Looks up an opcode by its asm name, accepting the `OP_FALSE`/`OP_TRUE`/`OP_NOP2`/`OP_NOP3` aliases.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Opcode> {
        match name {
            "OP_FALSE" => return Some(Opcode::OP_FALSE),
            "OP_TRUE" => return Some(Opcode::OP_TRUE),
            "OP_NOP2" => return Some(Opcode::OP_NOP2),
            "OP_NOP3" => return Some(Opcode::OP_NOP3),
            _ => {}
        }
        (0..=u8::MAX).map(Opcode::from_u8).find(|op| op.name() == name)
    }
}

impl From<u8> for Opcode {
    fn from(b: u8) -> Self {
        Opcode::from_u8(b)
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        op as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn byte_roundtrip() {
        for b in 0..=u8::MAX {
            assert_eq!(Opcode::from_u8(b) as u8, b);
        }
    }

    #[test]
    fn known_values() {
        assert_eq!(Opcode::OP_PUSHDATA1 as u8, 0x4c);
        assert_eq!(Opcode::OP_1NEGATE as u8, 0x4f);
        assert_eq!(Opcode::OP_16 as u8, 0x60);
        assert_eq!(Opcode::OP_RETURN as u8, 0x6a);
        assert_eq!(Opcode::OP_DUP as u8, 0x76);
        assert_eq!(Opcode::OP_CHECKSIGVERIFY as u8, 0xad);
        assert_eq!(Opcode::OP_NOP10 as u8, 0xb9);
        assert_eq!(Opcode::OP_NOP2, Opcode::OP_CHECKLOCKTIMEVERIFY);
    }

    #[test]
    fn small_ints() {
        assert_eq!(Opcode::OP_5.small_int(), Some(5));
        assert_eq!(Opcode::OP_1NEGATE.small_int(), Some(-1));
        assert_eq!(Opcode::OP_0.small_int(), None);
        assert_eq!(Opcode::from_small_int(16), Some(Opcode::OP_16));
        assert_eq!(Opcode::from_small_int(17), None);
    }

    #[test]
    fn names() {
        assert_eq!(Opcode::OP_HASH160.name(), "OP_HASH160");
        assert_eq!(Opcode::from_name("OP_EQUALVERIFY"), Some(Opcode::OP_EQUALVERIFY));
        assert_eq!(Opcode::from_name("OP_TRUE"), Some(Opcode::OP_1));
        assert_eq!(Opcode::from_name("OP_BOGUS"), None);
    }

    #[test]
    fn classes() {
        assert!(Opcode::OP_PUSHDATA4.is_push_data());
        assert!(!Opcode::OP_1NEGATE.is_push_data());
        assert!(Opcode::OP_16.is_push());
        assert!(!Opcode::OP_NOP.is_push());
        assert!(Opcode::OP_2MUL.is_disabled());
        assert!(!Opcode::OP_MUL.is_disabled());
        assert!(Opcode::OP_VERIF.is_conditional());
    }
}
