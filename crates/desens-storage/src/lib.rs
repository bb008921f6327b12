//! Output side of the batch
//!
//! This crate provides:
//! - Sinks turning redacted text into a payload (plain or AES-256-GCM)
//! - Key file handling
//! - The output writer with randomized file names

pub mod crypto;
pub mod error;
pub mod key;
pub mod sink;
pub mod writer;

pub use crypto::{Cipher, KEY_LEN, NONCE_LEN};
pub use error::{Result, StorageError};
pub use key::KeyFile;
pub use sink::{EncryptedSink, PlainSink, Sink};
pub use writer::OutputWriter;
