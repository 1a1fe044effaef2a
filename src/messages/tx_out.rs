//! Transaction output.

use crate::messages::MAX_SATOSHIS;
use crate::script::{Script, MAX_SCRIPT_SIZE};
use crate::util::{var_int, Error, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Transaction output.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxOut {
    /// Number of satoshis to spend.
    pub satoshis: i64,
    /// Public key script to claim the output.
    pub lock_script: Script,
}

impl TxOut {
    /// Placeholder serialized for unsigned outputs in legacy SIGHASH_SINGLE: -1 satoshis, empty script.
    #[must_use]
    pub fn null() -> TxOut {
        TxOut { satoshis: -1, lock_script: Script::new() }
    }

    /// Returns the size of the transaction output in bytes.
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        8 + var_int::size(self.lock_script.0.len() as u64) + self.lock_script.0.len()
    }

    /// Validates the output amount.
    ///
    /// # Errors
    /// `Error::BadData` if satoshis are negative or exceed `MAX_SATOSHIS`.
    pub fn validate(&self) -> Result<()> {
        if self.satoshis < 0 {
            return Err(Error::BadData("Negative satoshis".to_string()));
        }
        if self.satoshis > MAX_SATOSHIS {
            return Err(Error::BadData("Satoshis exceeds max".to_string()));
        }
        Ok(())
    }
}

impl Serializable<TxOut> for TxOut {
    fn read(reader: &mut dyn Read) -> Result<TxOut> {
        let satoshis = reader.read_i64::<LittleEndian>()?;
        let script_len = var_int::read(reader)? as usize;
        if script_len > MAX_SCRIPT_SIZE {
            return Err(Error::BadData(format!("Lock script too long: {}", script_len)));
        }
        let mut lock_script = vec![0; script_len];
        reader.read_exact(&mut lock_script)?;
        Ok(TxOut {
            satoshis,
            lock_script: Script(lock_script),
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_i64::<LittleEndian>(self.satoshis)?;
        var_int::write(self.lock_script.0.len() as u64, writer)?;
        writer.write_all(&self.lock_script.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn write_read() {
        let mut v = Vec::new();
        let t = TxOut {
            satoshis: 4400044000,
            lock_script: Script(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 100, 99, 98, 97, 96]),
        };
        t.write(&mut v).unwrap();
        assert_eq!(v.len(), t.size());
        assert_eq!(TxOut::read(&mut Cursor::new(&v)).unwrap(), t);
    }

    #[test]
    fn null_output() {
        let mut v = Vec::new();
        TxOut::null().write(&mut v).unwrap();
        assert_eq!(v, vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]);
    }

    #[test]
    fn validate() {
        let t = TxOut { satoshis: 4400044000, lock_script: Script(vec![1; 100]) };
        assert!(t.validate().is_ok());
        let t = TxOut { satoshis: -1, lock_script: Script::new() };
        assert_eq!(t.validate().unwrap_err().to_string(), "Bad data: Negative satoshis");
        let t = TxOut { satoshis: MAX_SATOSHIS + 1, lock_script: Script::new() };
        assert_eq!(t.validate().unwrap_err().to_string(), "Bad data: Satoshis exceeds max");
    }

    #[test]
    fn read_invalid() {
        let b = hex::decode("00e1f50500000000fe05000100").unwrap();
        let result = TxOut::read(&mut Cursor::new(&b));
        assert_eq!(result.unwrap_err().to_string(), format!("Bad data: Lock script too long: {}", 0x10005));
    }
}
