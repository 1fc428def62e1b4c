//! AES-256-GCM encryption for token values stored at rest.
//!
//! The key is a 32-byte value provided as a hex-encoded string (64
//! characters). A random 12-byte nonce is prepended to each ciphertext and
//! the whole envelope is base64-encoded so it stores as plain JSON text.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;

use crate::error::{storage_error, Error, StorageErrorKind};

const NONCE_SIZE: usize = 12;

/// Encrypt a token value with AES-256-GCM under the given hex key.
pub fn encrypt(plaintext: &str, key_hex: &str) -> Result<String, Error> {
    let key = parse_key(key_hex)?;
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|_| storage_error(StorageErrorKind::EncryptionFailed, "bad key length"))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| storage_error(StorageErrorKind::EncryptionFailed, "AES-GCM encrypt failed"))?;

    let mut envelope = nonce_bytes.to_vec();
    envelope.extend(ciphertext);

    Ok(BASE64.encode(envelope))
}

/// Decrypt a value produced by [`encrypt`] with the same hex key.
pub fn decrypt(envelope_b64: &str, key_hex: &str) -> Result<String, Error> {
    let key = parse_key(key_hex)?;
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|_| storage_error(StorageErrorKind::DecryptionFailed, "bad key length"))?;

    let envelope = BASE64.decode(envelope_b64).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: crate::error::ErrorKind::Storage(StorageErrorKind::DecryptionFailed),
    })?;

    if envelope.len() < NONCE_SIZE {
        return Err(storage_error(
            StorageErrorKind::DecryptionFailed,
            "ciphertext shorter than nonce",
        ));
    }

    let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_SIZE);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| storage_error(StorageErrorKind::DecryptionFailed, "AES-GCM decrypt failed"))?;

    String::from_utf8(plaintext).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: crate::error::ErrorKind::Storage(StorageErrorKind::DecryptionFailed),
    })
}

fn parse_key(key_hex: &str) -> Result<[u8; 32], Error> {
    let bytes = hex::decode(key_hex).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: crate::error::ErrorKind::Storage(StorageErrorKind::EncryptionFailed),
    })?;
    if bytes.len() != 32 {
        return Err(storage_error(
            StorageErrorKind::EncryptionFailed,
            "encryption key must be 32 bytes",
        ));
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    Ok(key)
}
