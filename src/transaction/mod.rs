//! Signature hashing and signing for transaction inputs
//!
//! # Examples
//!
//! Sign a P2PKH input and verify it with the interpreter:
//!
//! ```rust
//! use secp256k1::{PublicKey, Secp256k1, SecretKey};
//! use svscript::messages::{OutPoint, Tx, TxIn, TxOut};
//! use svscript::script::{verify_script, ScriptFlags, TransactionChecker};
//! use svscript::transaction::generate_signature;
//! use svscript::transaction::p2pkh::{create_lock_script, create_unlock_script};
//! use svscript::transaction::sighash::{signature_hash, SigHashCache, SIGHASH_ALL, SIGHASH_FORKID};
//! use svscript::util::hash160;
//!
//! let secp = Secp256k1::new();
//! let private_key = [1; 32];
//! let secret_key = SecretKey::from_slice(&private_key).unwrap();
//! let public_key = PublicKey::from_secret_key(&secp, &secret_key).serialize();
//! let lock_script = create_lock_script(&hash160(&public_key));
//!
//! let mut tx = Tx {
//!     version: 1,
//!     inputs: vec![TxIn { prev_output: OutPoint::default(), ..Default::default() }],
//!     outputs: vec![TxOut { satoshis: 900, lock_script: lock_script.clone() }],
//!     lock_time: 0,
//! };
//! let flags = ScriptFlags::ENABLE_SIGHASH_FORKID;
//! let sighash_type = SIGHASH_ALL | SIGHASH_FORKID;
//! let cache = SigHashCache::new(&tx);
//! let sighash = signature_hash(&tx, 0, &lock_script.0, 1000, sighash_type, flags, &cache).unwrap();
//! let signature = generate_signature(&secp, &private_key, &sighash, sighash_type).unwrap();
//! tx.inputs[0].unlock_script = create_unlock_script(&signature, &public_key);
//!
//! let cache = SigHashCache::new(&tx);
//! let checker = TransactionChecker::new(&tx, 0, 1000, &cache, &secp);
//! assert!(verify_script(&tx.inputs[0].unlock_script, &lock_script, flags, &checker).is_ok());
//! ```

pub mod p2pkh;
pub mod sighash;

use crate::util::{Error, Hash256, Result};
use secp256k1::{Message, Secp256k1, SecretKey, Signing};

/// Signs `sighash` with `private_key`, returning the low-S DER signature with `sighash_type` appended.
///
/// # Errors
/// `Error::BadData` if the private key is not a valid secp256k1 scalar.
pub fn generate_signature<C: Signing>(
    secp: &Secp256k1<C>,
    private_key: &[u8; 32],
    sighash: &Hash256,
    sighash_type: u8,
) -> Result<Vec<u8>> {
    let secret_key =
        SecretKey::from_slice(private_key).map_err(|_| Error::BadData("Invalid private key".to_string()))?;
    let message = Message::from_digest(sighash.0);
    let mut signature = secp.sign_ecdsa(&message, &secret_key);
    signature.normalize_s();
    let mut der = signature.serialize_der().to_vec();
    der.push(sighash_type);
    Ok(der)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::sig_encoding::{is_low_der_signature, is_valid_signature_encoding};

    #[test]
    fn signature_is_low_s_der() {
        let secp = Secp256k1::signing_only();
        let sig = generate_signature(&secp, &[7; 32], &Hash256([3; 32]), 0x41).unwrap();
        assert_eq!(sig.last(), Some(&0x41));
        assert!(is_valid_signature_encoding(&sig));
        assert!(is_low_der_signature(&sig));
    }

    #[test]
    fn invalid_private_key() {
        let secp = Secp256k1::signing_only();
        assert!(generate_signature(&secp, &[0; 32], &Hash256([3; 32]), 0x41).is_err());
    }
}
