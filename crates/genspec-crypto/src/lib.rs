pub mod account;
pub mod gate;
pub mod keypair;
pub mod mnemonic;
pub mod ss58;

pub use account::Account;
pub use gate::{CryptoGate, KeyGenerator};
pub use keypair::KeyPair;
