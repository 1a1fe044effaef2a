//! Signature, lock time and sequence checks the interpreter delegates to.
use crate::messages::Tx;
use crate::script::{Script, ScriptFlags};
use crate::transaction::sighash::{signature_hash, SigHashCache};
use log::debug;
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, Verification};

const LOCKTIME_THRESHOLD: i64 = 500_000_000;
const SEQUENCE_FINAL: u32 = 0xffffffff;
const SEQUENCE_LOCKTIME_DISABLE_FLAG: i64 = 1 << 31;
const SEQUENCE_LOCKTIME_TYPE_FLAG: i64 = 1 << 22;
const SEQUENCE_LOCKTIME_MASK: i64 = 0x0000_ffff;

/// Callbacks used by script evaluation.
pub trait SignatureChecker {
    /// Verifies `sig` (DER plus sighash byte) by `pubkey` over `script_code`.
    fn check_sig(&self, sig: &[u8], pubkey: &[u8], script_code: &Script, flags: ScriptFlags) -> bool;

    /// BIP-65 lock time comparison.
    fn check_lock_time(&self, _lock_time: i64) -> bool {
        false
    }

    /// BIP-112 relative lock time comparison.
    fn check_sequence(&self, _sequence: i64) -> bool {
        false
    }
}

/// Checker with no transaction. Every check fails.
#[derive(Default, Clone, Copy, Debug)]
pub struct TransactionlessChecker;

impl SignatureChecker for TransactionlessChecker {
    fn check_sig(&self, _sig: &[u8], _pubkey: &[u8], _script_code: &Script, _flags: ScriptFlags) -> bool {
        false
    }
}

/// Checks signatures against one input of a transaction.
pub struct TransactionChecker<'a, C: Verification> {
    /// Spending transaction
    pub tx: &'a Tx,
    /// Index of the input being checked
    pub input: usize,
    /// Satoshis of the output being spent
    pub amount: i64,
    /// Hashes shared across the inputs of `tx`
    pub cache: &'a SigHashCache,
    /// Verification context, created once by the caller
    pub secp: &'a Secp256k1<C>,
}

impl<'a, C: Verification> TransactionChecker<'a, C> {
    /// Creates a checker for input `input` of `tx` spending `amount` satoshis.
    #[must_use]
    pub fn new(tx: &'a Tx, input: usize, amount: i64, cache: &'a SigHashCache, secp: &'a Secp256k1<C>) -> Self {
        TransactionChecker { tx, input, amount, cache, secp }
    }
}

impl<'a, C: Verification> SignatureChecker for TransactionChecker<'a, C> {
    fn check_sig(&self, sig: &[u8], pubkey: &[u8], script_code: &Script, flags: ScriptFlags) -> bool {
        let (sighash_type, der) = match sig.split_last() {
            Some((t, der)) => (*t, der),
            None => return false,
        };
        let pubkey = match PublicKey::from_slice(pubkey) {
            Ok(pubkey) => pubkey,
            Err(e) => {
                debug!("Input {}: bad public key: {}", self.input, e);
                return false;
            }
        };
        let mut signature = match Signature::from_der_lax(der) {
            Ok(signature) => signature,
            Err(e) => {
                debug!("Input {}: bad signature: {}", self.input, e);
                return false;
            }
        };
        // libsecp256k1 only accepts low S
        signature.normalize_s();
        let sighash = match signature_hash(
            self.tx,
            self.input,
            script_code.as_bytes(),
            self.amount,
            sighash_type,
            flags,
            self.cache,
        ) {
            Ok(sighash) => sighash,
            Err(e) => {
                debug!("Input {}: sighash failed: {}", self.input, e);
                return false;
            }
        };
        let message = Message::from_digest(sighash.0);
        match self.secp.verify_ecdsa(&message, &signature, &pubkey) {
            Ok(()) => true,
            Err(e) => {
                debug!("Input {}: signature rejected: {}", self.input, e);
                false
            }
        }
    }

    fn check_lock_time(&self, lock_time: i64) -> bool {
        let tx_lock_time = self.tx.lock_time as i64;
        // Both heights or both timestamps
        if (tx_lock_time < LOCKTIME_THRESHOLD) != (lock_time < LOCKTIME_THRESHOLD) {
            return false;
        }
        if lock_time > tx_lock_time {
            return false;
        }
        match self.tx.inputs.get(self.input) {
            Some(input) => input.sequence != SEQUENCE_FINAL,
            None => false,
        }
    }

    fn check_sequence(&self, sequence: i64) -> bool {
        let tx_sequence = match self.tx.inputs.get(self.input) {
            Some(input) => input.sequence as i64,
            None => return false,
        };
        if self.tx.version < 2 || tx_sequence & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
            return false;
        }
        let mask = SEQUENCE_LOCKTIME_TYPE_FLAG | SEQUENCE_LOCKTIME_MASK;
        let tx_masked = tx_sequence & mask;
        let masked = sequence & mask;
        if (tx_masked < SEQUENCE_LOCKTIME_TYPE_FLAG) != (masked < SEQUENCE_LOCKTIME_TYPE_FLAG) {
            return false;
        }
        masked <= tx_masked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{OutPoint, TxIn, TxOut};
    use crate::transaction::generate_signature;
    use crate::transaction::p2pkh;
    use crate::transaction::sighash::{SIGHASH_ALL, SIGHASH_FORKID, SIGHASH_NONE};
    use crate::util::{hash160, Hash256};
    use secp256k1::SecretKey;

    fn spend(lock_time: u32, sequence: u32, version: u32) -> Tx {
        Tx {
            version,
            inputs: vec![TxIn {
                prev_output: OutPoint { hash: Hash256([8; 32]), index: 0 },
                unlock_script: Script::new(),
                sequence,
            }],
            outputs: vec![TxOut { satoshis: 5, lock_script: Script(vec![0x51]) }],
            lock_time,
        }
    }

    fn check_sig_test(sighash_type: u8, flags: ScriptFlags) {
        let secp = Secp256k1::new();
        let private_key = [1; 32];
        let secret_key = SecretKey::from_slice(&private_key).unwrap();
        let pk = PublicKey::from_secret_key(&secp, &secret_key).serialize();
        let lock_script = p2pkh::create_lock_script(&hash160(&pk));
        let tx = spend(0, SEQUENCE_FINAL, 1);
        let cache = SigHashCache::new(&tx);
        let sighash = signature_hash(&tx, 0, &lock_script.0, 10, sighash_type, flags, &cache).unwrap();
        let sig = generate_signature(&secp, &private_key, &sighash, sighash_type).unwrap();

        let checker = TransactionChecker::new(&tx, 0, 10, &cache, &secp);
        assert!(checker.check_sig(&sig, &pk, &lock_script, flags));
        // Wrong script code
        assert!(!checker.check_sig(&sig, &pk, &Script(vec![0x51]), flags));
        // Wrong key
        let other = PublicKey::from_secret_key(&secp, &SecretKey::from_slice(&[2; 32]).unwrap()).serialize();
        assert!(!checker.check_sig(&sig, &other, &lock_script, flags));
        assert!(!checker.check_sig(&[], &pk, &lock_script, flags));
        assert!(!checker.check_sig(&sig, &[], &lock_script, flags));
        // Another input index
        let checker = TransactionChecker::new(&tx, 1, 10, &cache, &secp);
        assert!(!checker.check_sig(&sig, &pk, &lock_script, flags));
    }

    #[test]
    fn check_sig() {
        check_sig_test(SIGHASH_ALL, ScriptFlags::empty());
        check_sig_test(SIGHASH_NONE, ScriptFlags::empty());
        check_sig_test(SIGHASH_ALL | SIGHASH_FORKID, ScriptFlags::ENABLE_SIGHASH_FORKID);
    }

    #[test]
    fn amount_is_signed_under_forkid() {
        let secp = Secp256k1::new();
        let secret_key = SecretKey::from_slice(&[3; 32]).unwrap();
        let pk = PublicKey::from_secret_key(&secp, &secret_key).serialize();
        let script = Script(vec![0xac]);
        let flags = ScriptFlags::ENABLE_SIGHASH_FORKID;
        let sighash_type = SIGHASH_ALL | SIGHASH_FORKID;
        let tx = spend(0, SEQUENCE_FINAL, 2);
        let cache = SigHashCache::new(&tx);
        let sighash = signature_hash(&tx, 0, &script.0, 1000, sighash_type, flags, &cache).unwrap();
        let sig = generate_signature(&secp, &[3; 32], &sighash, sighash_type).unwrap();
        assert!(TransactionChecker::new(&tx, 0, 1000, &cache, &secp).check_sig(&sig, &pk, &script, flags));
        assert!(!TransactionChecker::new(&tx, 0, 999, &cache, &secp).check_sig(&sig, &pk, &script, flags));
    }

    #[test]
    fn transactionless() {
        let c = TransactionlessChecker;
        assert!(!c.check_sig(&[0x30], &[0x02; 33], &Script::new(), ScriptFlags::empty()));
        assert!(!c.check_lock_time(0));
        assert!(!c.check_sequence(0));
    }

    #[test]
    fn lock_time() {
        let secp = Secp256k1::verification_only();
        let tx = spend(1000, 0, 1);
        let cache = SigHashCache::new(&tx);
        let c = TransactionChecker::new(&tx, 0, 0, &cache, &secp);
        assert!(c.check_lock_time(1000));
        assert!(c.check_lock_time(999));
        assert!(!c.check_lock_time(1001));
        assert!(!c.check_lock_time(LOCKTIME_THRESHOLD));

        let tx = spend(LOCKTIME_THRESHOLD as u32 + 10, 0, 1);
        let c = TransactionChecker::new(&tx, 0, 0, &cache, &secp);
        assert!(c.check_lock_time(LOCKTIME_THRESHOLD + 10));
        assert!(!c.check_lock_time(100));

        // Final sequence disables lock time
        let tx = spend(1000, SEQUENCE_FINAL, 1);
        let c = TransactionChecker::new(&tx, 0, 0, &cache, &secp);
        assert!(!c.check_lock_time(1000));
    }

    #[test]
    fn sequence() {
        let secp = Secp256k1::verification_only();
        let tx = spend(0, 10, 2);
        let cache = SigHashCache::new(&tx);
        let c = TransactionChecker::new(&tx, 0, 0, &cache, &secp);
        assert!(c.check_sequence(10));
        assert!(c.check_sequence(5));
        assert!(!c.check_sequence(11));
        assert!(!c.check_sequence(5 | SEQUENCE_LOCKTIME_TYPE_FLAG));
        // Bits outside the mask are ignored
        assert!(c.check_sequence(5 | (1 << 20)));

        let tx = spend(0, 10 | SEQUENCE_LOCKTIME_TYPE_FLAG as u32, 2);
        let c = TransactionChecker::new(&tx, 0, 0, &cache, &secp);
        assert!(c.check_sequence(10 | SEQUENCE_LOCKTIME_TYPE_FLAG));
        assert!(!c.check_sequence(10));

        // Version 1 and disabled sequences never pass
        let tx = spend(0, 10, 1);
        let c = TransactionChecker::new(&tx, 0, 0, &cache, &secp);
        assert!(!c.check_sequence(5));
        let tx = spend(0, 10 | SEQUENCE_LOCKTIME_DISABLE_FLAG as u32, 2);
        let c = TransactionChecker::new(&tx, 0, 0, &cache, &secp);
        assert!(!c.check_sequence(5));
    }
}
