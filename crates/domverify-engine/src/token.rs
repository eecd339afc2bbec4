//! Proof tokens and record identifiers.

use domverify_core::{RecordId, Result, VerifyError};
use ring::rand::{SecureRandom, SystemRandom};

/// Bytes of entropy in a record identifier
const RECORD_ID_BYTES: usize = 16;

/// Minimum entropy accepted for proof tokens
pub const MIN_TOKEN_BYTES: usize = 16;

/// Generates unguessable, non-sequential tokens from the OS CSPRNG.
pub struct TokenGenerator {
    rng: SystemRandom,
    token_bytes: usize,
}

impl TokenGenerator {
    /// Create a generator producing `token_bytes` of entropy per token
    /// (hex-encoded, so tokens are twice as long). Values below
    /// [`MIN_TOKEN_BYTES`] are raised to it.
    #[must_use]
    pub fn new(token_bytes: usize) -> Self {
        Self {
            rng: SystemRandom::new(),
            token_bytes: token_bytes.max(MIN_TOKEN_BYTES),
        }
    }

    /// Fresh proof token for a DNS TXT record
    pub fn token(&self) -> Result<String> {
        self.random_hex(self.token_bytes)
    }

    /// Fresh opaque record identifier
    pub fn record_id(&self) -> Result<RecordId> {
        self.random_hex(RECORD_ID_BYTES).map(RecordId::new)
    }

    fn random_hex(&self, len: usize) -> Result<String> {
        let mut buf = vec![0u8; len];
        self.rng.fill(&mut buf).map_err(|_| VerifyError::Token)?;
        Ok(hex::encode(buf))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new(20)
    }
}
