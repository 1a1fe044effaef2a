//! Pay-to-public-key-hash scripts
//!
//! Lock: `OP_DUP OP_HASH160 <hash160> OP_EQUALVERIFY OP_CHECKSIG`. Unlock: `<sig> <pubkey>`.
use crate::script::{Op, Opcode, Ops, Script};
use crate::util::{Error, Hash160, Result};

/// Creates the lock script paying to `address`.
#[must_use]
pub fn create_lock_script(address: &Hash160) -> Script {
    let mut script = Script::new();
    script.append(Opcode::OP_DUP);
    script.append(Opcode::OP_HASH160);
    script.append_data(&address.0);
    script.append(Opcode::OP_EQUALVERIFY);
    script.append(Opcode::OP_CHECKSIG);
    script
}

/// Creates the unlock script pushing `sig` then `public_key`.
#[must_use]
pub fn create_unlock_script(sig: &[u8], public_key: &[u8]) -> Script {
    let mut script = Script::new();
    script.append_data(sig);
    script.append_data(public_key);
    script
}

/// Whether `lock_script` is a P2PKH lock script.
#[must_use]
#[inline]
pub fn check_lock_script(lock_script: &[u8]) -> bool {
    Script(lock_script.to_vec()).is_p2pkh()
}

/// Splits an unlock script into its signature and public key pushes.
fn unlock_parts(unlock_script: &[u8]) -> Option<(Op<'_>, Op<'_>)> {
    let mut ops = Ops::new(unlock_script);
    let sig = ops.next()?.ok()?;
    let pubkey = ops.next()?.ok()?;
    if ops.next().is_some() {
        return None;
    }
    Some((sig, pubkey))
}

/// Whether `unlock_script` is a 71-73 byte signature push followed by a 33 or 65 byte public key push.
#[must_use]
pub fn check_unlock_script(unlock_script: &[u8]) -> bool {
    match unlock_parts(unlock_script) {
        Some((sig, pubkey)) => {
            sig.code.is_push_data()
                && (71..=73).contains(&sig.data.len())
                && pubkey.code.is_push_data()
                && (pubkey.data.len() == 33 || pubkey.data.len() == 65)
        }
        None => false,
    }
}

/// Whether `lock_script` is a P2PKH lock script paying to `hash160`.
#[must_use]
#[inline]
pub fn check_lock_script_addr(hash160: &Hash160, lock_script: &[u8]) -> bool {
    check_lock_script(lock_script) && lock_script[3..23] == hash160.0
}

/// Whether `unlock_script` is a P2PKH unlock script for `pubkey`.
#[must_use]
pub fn check_unlock_script_addr(pubkey: &[u8], unlock_script: &[u8]) -> bool {
    match extract_pubkey(unlock_script) {
        Ok(found) => found == pubkey,
        Err(_) => false,
    }
}

/// Gets the public key from a P2PKH unlock script.
///
/// # Errors
/// `Error::BadData` if the script is not a P2PKH unlock script.
pub fn extract_pubkey(unlock_script: &[u8]) -> Result<Vec<u8>> {
    if !check_unlock_script(unlock_script) {
        return Err(Error::BadData("Not P2PKH unlock".to_string()));
    }
    match unlock_parts(unlock_script) {
        Some((_, pubkey)) => Ok(pubkey.data.into_vec()),
        None => Err(Error::BadData("Not P2PKH unlock".to_string())),
    }
}

/// Gets the public key hash from a P2PKH lock script.
///
/// # Errors
/// `Error::BadData` if the script is not a P2PKH lock script.
pub fn extract_pubkeyhash(lock_script: &[u8]) -> Result<Hash160> {
    if !check_lock_script(lock_script) {
        return Err(Error::BadData("Not P2PKH lock".to_string()));
    }
    let mut hash160 = Hash160([0; 20]);
    hash160.0.copy_from_slice(&lock_script[3..23]);
    Ok(hash160)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unlock(sig_len: usize, pubkey_len: usize) -> Script {
        create_unlock_script(&vec![5; sig_len], &vec![6; pubkey_len])
    }

    #[test]
    fn check_lock_script_test() {
        let mut s = Script::new();
        assert!(!check_lock_script(&s.0));
        s.append(Opcode::OP_DUP);
        s.append(Opcode::OP_HASH160);
        s.append_data(&[0; 20]);
        s.append(Opcode::OP_EQUALVERIFY);
        s.append(Opcode::OP_CHECKSIG);
        assert!(check_lock_script(&s.0));
        s.append(Opcode::OP_1);
        assert!(!check_lock_script(&s.0));
    }

    #[test]
    fn check_unlock_script_test() {
        assert!(!check_unlock_script(&Script::new().0));
        let mut sig_only = Script::new();
        sig_only.append_data(&[0; 71]);
        assert!(!check_unlock_script(&sig_only.0));
        assert!(check_unlock_script(&unlock(71, 33).0));
        assert!(check_unlock_script(&unlock(73, 65).0));
        assert!(!check_unlock_script(&unlock(72, 30).0));
        assert!(!check_unlock_script(&unlock(70, 33).0));
        let mut extra = unlock(71, 33);
        extra.append(Opcode::OP_1);
        assert!(!check_unlock_script(&extra.0));
    }

    #[test]
    fn addr_checks() {
        let s = create_lock_script(&Hash160([5; 20]));
        assert!(check_lock_script_addr(&Hash160([5; 20]), &s.0));
        assert!(!check_lock_script_addr(&Hash160([4; 20]), &s.0));
        let s = unlock(71, 65);
        assert!(check_unlock_script_addr(&[6; 65], &s.0));
        assert!(!check_unlock_script_addr(&[7; 65], &s.0));
    }

    #[test]
    fn extract() {
        let s = create_lock_script(&Hash160([9; 20]));
        assert_eq!(extract_pubkeyhash(&s.0).unwrap(), Hash160([9; 20]));
        assert!(extract_pubkeyhash(&[0x51]).is_err());
        assert_eq!(extract_pubkey(&unlock(72, 33).0).unwrap(), vec![6; 33]);
        assert!(extract_pubkey(&s.0).is_err());
    }
}
