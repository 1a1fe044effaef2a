//! Bitcoin transaction.

use crate::messages::{OutPoint, TxIn, TxOut};
use crate::script::{verify_script, ScriptFlags, TransactionChecker};
use crate::transaction::sighash::SigHashCache;
use crate::util::{sha256d, var_int, Error, Hash256, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use linked_hash_map::LinkedHashMap;
use secp256k1::{Secp256k1, Verification};
use std::fmt;
use std::io;
use std::io::{Read, Write};

/// Maximum number of satoshis possible (21M BSV).
pub const MAX_SATOSHIS: i64 = 21_000_000 * 100_000_000;

/// Safety cap on input and output counts when reading.
const MAX_INPUTS: u64 = 100_000_000;
const MAX_OUTPUTS: u64 = 100_000_000;

/// Bitcoin transaction.
#[derive(Default, PartialEq, Eq, Hash, Clone)]
pub struct Tx {
    /// Transaction version.
    pub version: u32,
    /// Transaction inputs.
    pub inputs: Vec<TxIn>,
    /// Transaction outputs.
    pub outputs: Vec<TxOut>,
    /// The block number or timestamp at which this transaction is unlocked.
    pub lock_time: u32,
}

impl Tx {
    /// Calculates the hash of the transaction (txid).
    #[must_use]
    pub fn hash(&self) -> Hash256 {
        let mut b = Vec::with_capacity(self.size());
        let _ = self.write(&mut b);
        sha256d(&b)
    }

    /// Serialized size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        8 + var_int::size(self.inputs.len() as u64)
            + self.inputs.iter().map(TxIn::size).sum::<usize>()
            + var_int::size(self.outputs.len() as u64)
            + self.outputs.iter().map(TxOut::size).sum::<usize>()
    }

    /// Returns whether the transaction is the block reward (coinbase).
    #[must_use]
    #[inline]
    pub fn coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prev_output.is_coinbase()
    }

    /// Validates a non-coinbase transaction against the outputs it spends.
    ///
    /// Checks amounts, then runs every input's unlock script against the spent
    /// lock script under `flags`.
    ///
    /// # Errors
    /// `Error::BadData` for structural or amount problems, `Error::ScriptError`
    /// for the first input whose scripts fail.
    pub fn validate<C: Verification>(
        &self,
        utxos: &LinkedHashMap<OutPoint, TxOut>,
        flags: ScriptFlags,
        secp: &Secp256k1<C>,
    ) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::BadData("inputs empty".to_string()));
        }
        if self.outputs.is_empty() {
            return Err(Error::BadData("outputs empty".to_string()));
        }

        let mut total_out = 0i64;
        for tx_out in &self.outputs {
            if tx_out.satoshis < 0 {
                return Err(Error::BadData("tx_out satoshis negative".to_string()));
            }
            total_out = total_out
                .checked_add(tx_out.satoshis)
                .ok_or_else(|| Error::BadData("Total out overflow".to_string()))?;
        }
        if total_out > MAX_SATOSHIS {
            return Err(Error::BadData("Total out exceeds max satoshis".to_string()));
        }

        if self.inputs.iter().any(|tx_in| tx_in.prev_output.is_coinbase()) {
            return Err(Error::BadData("Unexpected coinbase".to_string()));
        }

        let mut spent = Vec::with_capacity(self.inputs.len());
        let mut total_in = 0i64;
        for tx_in in &self.inputs {
            let tx_out = utxos
                .get(&tx_in.prev_output)
                .ok_or_else(|| Error::BadData("utxo not found".to_string()))?;
            if tx_out.satoshis < 0 {
                return Err(Error::BadData("tx_out satoshis negative".to_string()));
            }
            total_in = total_in
                .checked_add(tx_out.satoshis)
                .ok_or_else(|| Error::BadData("Total in overflow".to_string()))?;
            spent.push(tx_out);
        }
        if total_in > MAX_SATOSHIS {
            return Err(Error::BadData("Total in exceeds max satoshis".to_string()));
        }
        if total_in < total_out {
            return Err(Error::BadData("Output total exceeds input".to_string()));
        }

        let cache = SigHashCache::new(self);
        for (input, (tx_in, tx_out)) in self.inputs.iter().zip(spent).enumerate() {
            let checker = TransactionChecker::new(self, input, tx_out.satoshis, &cache, secp);
            if let Err(e) = verify_script(&tx_in.unlock_script, &tx_out.lock_script, flags, &checker) {
                log::debug!("input {} of {:?} failed: {}", input, self.hash(), e.code_name());
                return Err(Error::ScriptError(e));
            }
        }
        Ok(())
    }
}

impl Serializable<Tx> for Tx {
    fn read(reader: &mut dyn Read) -> Result<Tx> {
        let version = reader.read_u32::<LittleEndian>()?;
        let n_inputs = var_int::read(reader)?;
        if n_inputs > MAX_INPUTS {
            return Err(Error::BadData(format!("Too many inputs: {}", n_inputs)));
        }
        let mut inputs = Vec::with_capacity(n_inputs.min(1024) as usize);
        for _ in 0..n_inputs {
            inputs.push(TxIn::read(reader)?);
        }
        let n_outputs = var_int::read(reader)?;
        if n_outputs > MAX_OUTPUTS {
            return Err(Error::BadData(format!("Too many outputs: {}", n_outputs)));
        }
        let mut outputs = Vec::with_capacity(n_outputs.min(1024) as usize);
        for _ in 0..n_outputs {
            outputs.push(TxOut::read(reader)?);
        }
        let lock_time = reader.read_u32::<LittleEndian>()?;
        Ok(Tx {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.version)?;
        var_int::write(self.inputs.len() as u64, writer)?;
        for tx_in in &self.inputs {
            tx_in.write(writer)?;
        }
        var_int::write(self.outputs.len() as u64, writer)?;
        for tx_out in &self.outputs {
            tx_out.write(writer)?;
        }
        writer.write_u32::<LittleEndian>(self.lock_time)
    }
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inputs_str = format!("[<{} inputs>]", self.inputs.len());
        let outputs_str = format!("[<{} outputs>]", self.outputs.len());
        f.debug_struct("Tx")
            .field("version", &self.version)
            .field("inputs", if self.inputs.len() <= 3 { &self.inputs } else { &inputs_str })
            .field("outputs", if self.outputs.len() <= 3 { &self.outputs } else { &outputs_str })
            .field("lock_time", &self.lock_time)
            .finish()
    }
}
