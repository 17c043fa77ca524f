pub mod client;
pub mod encryption;
pub mod execute;
pub mod fs;
pub mod key;
pub mod login;
pub mod signature;
pub mod structured_file;
pub mod transport;
