#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*! # svscript

A Bitcoin SV script engine: the opcode set, script numbers and stack values,
the interpreter with its consensus limits and verification flags, and the
signature hash algorithms CHECKSIG commits to.

## Usage
```rust
use svscript::script::{verify_script, Script, ScriptFlags, TransactionlessChecker};

let script_sig = Script::from_asm("OP_2").unwrap();
let script_pub = Script::from_asm("OP_2 OP_EQUAL").unwrap();
assert!(verify_script(&script_sig, &script_pub, ScriptFlags::empty(), &TransactionlessChecker).is_ok());
```

Signature checks go through a [`script::SignatureChecker`]. Use
[`script::TransactionChecker`] to verify the inputs of a transaction, or
[`messages::Tx::validate`] to verify all of them.

## Logging
Evaluation failures are logged at `debug` and executed opcodes at `trace`
through the `log` facade. No logger is installed by the library.

## Security
Scripts are untrusted input. Evaluation is bounded by the limits in
[`script::ScriptConfig`] and never panics out of [`script::eval_script`].
P2SH redemption is not implemented, and OP_CHECKLOCKTIMEVERIFY and
OP_CHECKSEQUENCEVERIFY do not check lock times.
*/

pub mod messages;
pub mod script;
pub mod transaction;
pub mod util;
