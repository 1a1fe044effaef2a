//! Transaction structures and their wire encoding.
//!
//! These carry the data the signature hash commits to and the scripts the
//! interpreter runs.

mod out_point;
mod tx;
mod tx_in;
mod tx_out;

pub use self::out_point::{OutPoint, COINBASE_OUTPOINT_HASH, COINBASE_OUTPOINT_INDEX};
pub use self::tx::{Tx, MAX_SATOSHIS};
pub use self::tx_in::TxIn;
pub use self::tx_out::TxOut;
