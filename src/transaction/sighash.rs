//! Transaction signature hashes.
//!
//! Two algorithms: the FORKID digest (BIP-143 layout, used when the signature
//! type carries `SIGHASH_FORKID` and the flag enabling it is set) and the
//! legacy digest over a modified copy of the transaction.
use crate::messages::{OutPoint, Tx, TxOut};
use crate::script::{Script, ScriptFlags};
use crate::util::{sha256d, var_int, Error, Hash256, Result, Serializable};
use byteorder::{LittleEndian, WriteBytesExt};

/// Signs all outputs.
pub const SIGHASH_ALL: u8 = 0x01;
/// Signs no outputs (anyone spend).
pub const SIGHASH_NONE: u8 = 0x02;
/// Signs only matching output.
pub const SIGHASH_SINGLE: u8 = 0x03;
/// Anyone can add inputs.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;
/// Selects the FORKID digest.
pub const SIGHASH_FORKID: u8 = 0x40;

/// Digest returned by the legacy algorithm when there is nothing valid to sign:
/// the integer 1 as a little-endian 256-bit value.
pub const SIGHASH_ONE: Hash256 = Hash256([
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
]);

/// Sighash type byte with accessors for its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigHashType(pub u8);

impl SigHashType {
    /// ALL, NONE or SINGLE, with ANYONECANPAY and FORKID masked off.
    #[must_use]
    #[inline]
    pub fn base_type(self) -> u8 {
        self.0 & 0x1f
    }

    /// Whether only the signed input is committed to.
    #[must_use]
    #[inline]
    pub fn anyone_can_pay(self) -> bool {
        self.0 & SIGHASH_ANYONECANPAY != 0
    }

    /// Whether the FORKID bit is set.
    #[must_use]
    #[inline]
    pub fn has_fork_id(self) -> bool {
        self.0 & SIGHASH_FORKID != 0
    }
}

/// Per-transaction hashes shared by every FORKID digest of that transaction.
#[derive(Default, Debug, Clone)]
pub struct SigHashCache {
    hash_prevouts: Hash256,
    hash_sequence: Hash256,
    hash_outputs: Hash256,
}

impl SigHashCache {
    /// Hashes the prevouts, sequences and outputs of `tx`.
    #[must_use]
    pub fn new(tx: &Tx) -> Self {
        let mut prevouts = Vec::with_capacity(OutPoint::SIZE * tx.inputs.len());
        let mut sequences = Vec::with_capacity(4 * tx.inputs.len());
        for input in &tx.inputs {
            let _ = input.prev_output.write(&mut prevouts);
            sequences.extend_from_slice(&input.sequence.to_le_bytes());
        }
        let mut outputs = Vec::with_capacity(tx.outputs.iter().map(TxOut::size).sum());
        for output in &tx.outputs {
            let _ = output.write(&mut outputs);
        }
        SigHashCache {
            hash_prevouts: sha256d(&prevouts),
            hash_sequence: sha256d(&sequences),
            hash_outputs: sha256d(&outputs),
        }
    }
}

/// Computes the digest a signature of type `sighash_type` over input `n_input` commits to.
///
/// The FORKID digest is used when `sighash_type` has `SIGHASH_FORKID` and `flags`
/// has `ENABLE_SIGHASH_FORKID`; otherwise the legacy digest.
///
/// # Errors
/// `Error::BadArgument` if `n_input` is out of range for the FORKID digest. The
/// legacy digest returns [`SIGHASH_ONE`] in that case instead.
pub fn signature_hash(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    satoshis: i64,
    sighash_type: u8,
    flags: ScriptFlags,
    cache: &SigHashCache,
) -> Result<Hash256> {
    let hash_type = SigHashType(sighash_type);
    if hash_type.has_fork_id() && flags.contains(ScriptFlags::ENABLE_SIGHASH_FORKID) {
        forkid_sighash(tx, n_input, script_code, satoshis, hash_type, cache)
    } else {
        legacy_sighash(tx, n_input, script_code, hash_type)
    }
}

fn forkid_sighash(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    satoshis: i64,
    hash_type: SigHashType,
    cache: &SigHashCache,
) -> Result<Hash256> {
    let input = tx
        .inputs
        .get(n_input)
        .ok_or_else(|| Error::BadArgument(format!("Input index out of range: {}", n_input)))?;
    let base_type = hash_type.base_type();
    let mut s = Vec::with_capacity(156 + script_code.len());
    s.write_u32::<LittleEndian>(tx.version)?;
    if hash_type.anyone_can_pay() {
        s.extend_from_slice(&[0u8; 32]);
    } else {
        s.extend_from_slice(&cache.hash_prevouts.0);
    }
    if hash_type.anyone_can_pay() || base_type == SIGHASH_SINGLE || base_type == SIGHASH_NONE {
        s.extend_from_slice(&[0u8; 32]);
    } else {
        s.extend_from_slice(&cache.hash_sequence.0);
    }
    input.prev_output.write(&mut s)?;
    var_int::write(script_code.len() as u64, &mut s)?;
    s.extend_from_slice(script_code);
    s.write_i64::<LittleEndian>(satoshis)?;
    s.write_u32::<LittleEndian>(input.sequence)?;
    if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        s.extend_from_slice(&cache.hash_outputs.0);
    } else if base_type == SIGHASH_SINGLE && n_input < tx.outputs.len() {
        let mut single = Vec::with_capacity(tx.outputs[n_input].size());
        tx.outputs[n_input].write(&mut single)?;
        s.extend_from_slice(&sha256d(&single).0);
    } else {
        s.extend_from_slice(&[0u8; 32]);
    }
    s.write_u32::<LittleEndian>(tx.lock_time)?;
    s.write_u32::<LittleEndian>(hash_type.0 as u32)?;
    Ok(sha256d(&s))
}

fn legacy_sighash(tx: &Tx, n_input: usize, script_code: &[u8], hash_type: SigHashType) -> Result<Hash256> {
    if n_input >= tx.inputs.len() {
        return Ok(SIGHASH_ONE);
    }
    let base_type = hash_type.base_type();
    if base_type == SIGHASH_SINGLE && n_input >= tx.outputs.len() {
        return Ok(SIGHASH_ONE);
    }
    let sub_script = Script(script_code.to_vec()).without_code_separators();
    let empty_script = Script::new();

    let mut s = Vec::with_capacity(tx.size() + sub_script.len());
    s.write_u32::<LittleEndian>(tx.version)?;

    let inputs: Vec<usize> = if hash_type.anyone_can_pay() { vec![n_input] } else { (0..tx.inputs.len()).collect() };
    var_int::write(inputs.len() as u64, &mut s)?;
    for i in inputs {
        let tx_in = &tx.inputs[i];
        tx_in.prev_output.write(&mut s)?;
        let script = if i == n_input { &sub_script } else { &empty_script };
        var_int::write(script.len() as u64, &mut s)?;
        s.extend_from_slice(script.as_bytes());
        let zero_sequence = i != n_input && (base_type == SIGHASH_NONE || base_type == SIGHASH_SINGLE);
        s.write_u32::<LittleEndian>(if zero_sequence { 0 } else { tx_in.sequence })?;
    }

    let num_outputs = match base_type {
        SIGHASH_NONE => 0,
        SIGHASH_SINGLE => n_input + 1,
        _ => tx.outputs.len(),
    };
    var_int::write(num_outputs as u64, &mut s)?;
    for (i, output) in tx.outputs.iter().take(num_outputs).enumerate() {
        if base_type == SIGHASH_SINGLE && i != n_input {
            TxOut::null().write(&mut s)?;
        } else {
            output.write(&mut s)?;
        }
    }

    s.write_u32::<LittleEndian>(tx.lock_time)?;
    s.write_u32::<LittleEndian>(hash_type.0 as u32)?;
    Ok(sha256d(&s))
}
