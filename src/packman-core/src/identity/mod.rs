//! Private keys, the keychain assembled for one login attempt, and the mapping
//! from a key to the identity the server knows it by.
pub mod key;
pub mod key_id;
pub mod keychain;
pub mod pem_safekeeping;

pub use key::{Key, KeyType};
pub use key_id::{KeyId, UserFingerprintKeyId};
pub use keychain::{IdentityMap, Keychain};
