//! Cipher
//!
//! scrypt key derivation + AES-256-CBC with a fresh IV per call.

use std::fmt;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{JsonDbError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Size of the derived AES-256 key in bytes
pub const KEY_SIZE: usize = 32;

/// Size of the CBC initialization vector in bytes
pub const IV_SIZE: usize = 16;

/// Separates the ciphertext and IV components of a blob
pub const BLOB_DELIMITER: char = '|';

/// scrypt cost parameters
///
/// Defaults are N = 2^14, r = 8, p = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost N
    pub log_n: u8,

    /// Block size
    pub r: u32,

    /// Parallelization
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }
}

/// Symmetric cipher keyed by a password-derived key
///
/// Stateless apart from the key; safe to share across threads.
pub struct Cipher {
    key: Zeroizing<[u8; KEY_SIZE]>,
}

impl Cipher {
    /// Derive a key from `password` and `salt`
    pub fn new(password: &[u8], salt: &[u8], params: KdfParams) -> Result<Self> {
        let scrypt_params = scrypt::Params::new(params.log_n, params.r, params.p, KEY_SIZE)
            .map_err(|e| JsonDbError::Crypto(format!("invalid scrypt parameters: {}", e)))?;

        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        scrypt::scrypt(password, salt, &scrypt_params, key.as_mut_slice())
            .map_err(|e| JsonDbError::Crypto(format!("key derivation failed: {}", e)))?;

        Ok(Self { key })
    }

    /// Encrypt `plaintext` into a `<hex-ciphertext>|<hex-iv>` blob
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let mut iv = [0u8; IV_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);

        let encryptor = Aes256CbcEnc::new_from_slices(self.key.as_slice(), &iv)
            .map_err(|e| JsonDbError::Crypto(format!("cipher init failed: {}", e)))?;
        let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        Ok(format!(
            "{}{}{}",
            hex::encode(ciphertext),
            BLOB_DELIMITER,
            hex::encode(iv)
        ))
    }

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt)
    pub fn decrypt(&self, blob: &str) -> Result<Vec<u8>> {
        let (ciphertext_hex, iv_hex) = match blob.trim_end().split_once(BLOB_DELIMITER) {
            Some((ct, iv)) if !iv.is_empty() => (ct, iv),
            _ => return Err(JsonDbError::Crypto("an iv is required".to_string())),
        };

        let iv = hex::decode(iv_hex)
            .map_err(|e| JsonDbError::Crypto(format!("invalid iv encoding: {}", e)))?;
        if iv.len() != IV_SIZE {
            return Err(JsonDbError::Crypto(format!(
                "invalid iv length: expected {} bytes, got {}",
                IV_SIZE,
                iv.len()
            )));
        }

        let ciphertext = hex::decode(ciphertext_hex)
            .map_err(|e| JsonDbError::Crypto(format!("invalid ciphertext encoding: {}", e)))?;

        let decryptor = Aes256CbcDec::new_from_slices(self.key.as_slice(), &iv)
            .map_err(|e| JsonDbError::Crypto(format!("cipher init failed: {}", e)))?;

        decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| JsonDbError::Crypto("decryption failed: bad padding".to_string()))
    }

    /// Encrypt a UTF-8 string
    pub fn encrypt_str(&self, plaintext: &str) -> Result<String> {
        self.encrypt(plaintext.as_bytes())
    }

    /// Decrypt a blob whose plaintext is UTF-8
    pub fn decrypt_str(&self, blob: &str) -> Result<String> {
        let bytes = self.decrypt(blob)?;
        String::from_utf8(bytes)
            .map_err(|e| JsonDbError::Crypto(format!("plaintext is not UTF-8: {}", e)))
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
