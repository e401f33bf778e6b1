//! Crypto Module
//!
//! Optional encryption at rest for entry files.
//!
//! ## Responsibilities
//! - Derive a 256-bit key from a password and a salt (scrypt)
//! - Encrypt/decrypt document bytes with AES-256-CBC
//! - Encode ciphertext and IV into a printable blob
//!
//! ## Blob Format
//! ```text
//! ┌──────────────────────┬───┬──────────────┐
//! │ hex(ciphertext)      │ | │ hex(iv, 16)  │
//! └──────────────────────┴───┴──────────────┘
//! ```
//!
//! There is no authentication tag: a modified blob either fails to decrypt
//! (padding error) or yields garbage plaintext.

mod cipher;

pub use cipher::{Cipher, KdfParams, BLOB_DELIMITER, IV_SIZE, KEY_SIZE};
