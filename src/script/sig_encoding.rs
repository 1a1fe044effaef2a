//! Encoding rules for signatures and public keys consumed by CHECKSIG.
//!
//! Script signatures are a DER encoded ECDSA signature followed by one
//! sighash type byte.

use crate::script::{ScriptError, ScriptFlags};
use crate::transaction::sighash::{SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_FORKID, SIGHASH_SINGLE};
use secp256k1::ecdsa::Signature;

/// Strict DER check of a signature with its trailing sighash byte.
///
/// Format: `0x30 [total-length] 0x02 [R-length] [R] 0x02 [S-length] [S] [sighash]`,
/// with R and S positive and without unnecessary leading zeros.
#[must_use]
pub fn is_valid_signature_encoding(sig: &[u8]) -> bool {
    if sig.len() < 9 || sig.len() > 73 {
        return false;
    }
    if sig[0] != 0x30 || sig[1] as usize != sig.len() - 3 {
        return false;
    }
    let len_r = sig[3] as usize;
    if 5 + len_r >= sig.len() {
        return false;
    }
    let len_s = sig[5 + len_r] as usize;
    if len_r + len_s + 7 != sig.len() {
        return false;
    }

    if sig[2] != 0x02 || len_r == 0 || sig[4] & 0x80 != 0 {
        return false;
    }
    if len_r > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return false;
    }

    if sig[len_r + 4] != 0x02 || len_s == 0 || sig[len_r + 6] & 0x80 != 0 {
        return false;
    }
    if len_s > 1 && sig[len_r + 6] == 0x00 && sig[len_r + 7] & 0x80 == 0 {
        return false;
    }
    true
}

/// Whether S is at most half the curve order. Expects a valid encoding.
#[must_use]
pub fn is_low_der_signature(sig: &[u8]) -> bool {
    let der = match sig.split_last() {
        Some((_, der)) => der,
        None => return false,
    };
    let parsed = match Signature::from_der_lax(der) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let mut normalized = parsed;
    normalized.normalize_s();
    normalized == parsed
}

/// Sighash type byte of a non-empty signature.
#[must_use]
#[inline]
pub fn sighash_type(sig: &[u8]) -> u8 {
    sig.last().copied().unwrap_or(0)
}

/// Whether the base sighash type, ignoring ANYONECANPAY and FORKID, is ALL, NONE or SINGLE.
#[must_use]
pub fn is_defined_hashtype_signature(sig: &[u8]) -> bool {
    if sig.is_empty() {
        return false;
    }
    let base = sighash_type(sig) & !(SIGHASH_ANYONECANPAY | SIGHASH_FORKID);
    (SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base)
}

/// Whether the key is a 33 byte compressed or 65 byte uncompressed SEC encoding.
#[must_use]
pub fn is_compressed_or_uncompressed_pubkey(pubkey: &[u8]) -> bool {
    match pubkey.first() {
        Some(0x04) => pubkey.len() == 65,
        Some(0x02) | Some(0x03) => pubkey.len() == 33,
        _ => false,
    }
}

/// Whether the key is a 33 byte compressed SEC encoding.
#[must_use]
pub fn is_compressed_pubkey(pubkey: &[u8]) -> bool {
    pubkey.len() == 33 && matches!(pubkey[0], 0x02 | 0x03)
}

/// Applies the flag-dependent signature rules. An empty signature always passes.
pub fn check_signature_encoding(sig: &[u8], flags: ScriptFlags) -> Result<(), ScriptError> {
    if sig.is_empty() {
        return Ok(());
    }
    if flags.intersects(ScriptFlags::DERSIG | ScriptFlags::LOW_S | ScriptFlags::STRICTENC)
        && !is_valid_signature_encoding(sig)
    {
        return Err(ScriptError::SigDer);
    }
    if flags.contains(ScriptFlags::LOW_S) && !is_low_der_signature(sig) {
        return Err(ScriptError::SigHighS);
    }
    if flags.contains(ScriptFlags::STRICTENC) {
        if !is_defined_hashtype_signature(sig) {
            return Err(ScriptError::SigHashType);
        }
        let uses_fork_id = sighash_type(sig) & SIGHASH_FORKID != 0;
        let fork_id_enabled = flags.contains(ScriptFlags::ENABLE_SIGHASH_FORKID);
        if uses_fork_id && !fork_id_enabled {
            return Err(ScriptError::IllegalForkId);
        }
        if !uses_fork_id && fork_id_enabled {
            return Err(ScriptError::MustUseForkId);
        }
    }
    Ok(())
}

/// Applies the flag-dependent public key rules.
pub fn check_pubkey_encoding(pubkey: &[u8], flags: ScriptFlags) -> Result<(), ScriptError> {
    if flags.contains(ScriptFlags::STRICTENC) && !is_compressed_or_uncompressed_pubkey(pubkey) {
        return Err(ScriptError::PubkeyType);
    }
    if flags.contains(ScriptFlags::COMPRESSED_PUBKEYTYPE) && !is_compressed_pubkey(pubkey) {
        return Err(ScriptError::NonCompressedPubkey);
    }
    Ok(())
}
