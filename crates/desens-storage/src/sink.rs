//! Final form of a redacted document

use desens_core::Payload;

use crate::{Cipher, Result};

pub trait Sink: Send + Sync {
    fn seal(&self, text: &str) -> Result<Payload>;

    /// Output file extension, without the dot
    fn extension(&self) -> &'static str;
}

/// UTF-8 text as-is
pub struct PlainSink;

impl Sink for PlainSink {
    fn seal(&self, text: &str) -> Result<Payload> {
        Ok(Payload::Text(text.to_string()))
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

/// AES-256-GCM blob
pub struct EncryptedSink {
    cipher: Cipher,
}

impl EncryptedSink {
    pub fn new(cipher: Cipher) -> Self {
        Self { cipher }
    }
}

impl Sink for EncryptedSink {
    fn seal(&self, text: &str) -> Result<Payload> {
        Ok(Payload::Encrypted(self.cipher.encrypt(text)?))
    }

    fn extension(&self) -> &'static str {
        "enc"
    }
}
