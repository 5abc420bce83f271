//! Salted password decryption.
//!
//! Passwords are stored as base64 AES-256-CBC ciphertext. Key and IV are
//! derived from the salt with OpenSSL's legacy `EVP_BytesToKey` (MD5, one
//! round, no salt bytes), the scheme behind `openssl enc -md md5 -nosalt`.
//! The salt therefore acts as a passphrase with no work factor.

use aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use md5::{Digest, Md5};

use crate::error::{Result, SessionError};

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

/// Returns the login password: verbatim without a salt, decrypted otherwise.
pub fn decrypt_password(password: &str, salt: Option<&str>) -> Result<String> {
    match salt {
        None => Ok(password.to_string()),
        Some(salt) => decrypt(password, salt),
    }
}

fn decrypt(ciphertext: &str, salt: &str) -> Result<String> {
    let mut buffer = BASE64
        .decode(ciphertext.trim())
        .map_err(|e| SessionError::Crypto(format!("Invalid base64 ciphertext: {e}")))?;

    let (key, iv) = derive_key_iv(salt.as_bytes());
    let cipher = Aes256CbcDec::new_from_slices(&key, &iv).map_err(|e| {
        SessionError::Crypto(format!("Failed to initialize AES decryptor: {e}"))
    })?;

    let plaintext = cipher
        .decrypt_padded_mut::<Pkcs7>(&mut buffer)
        .map_err(|e| SessionError::Crypto(format!("Decryption failed: {e}")))?;

    String::from_utf8(plaintext.to_vec())
        .map_err(|_| SessionError::Crypto("Decrypted password is not valid UTF-8".to_string()))
}

/// Produces the base64 ciphertext that [`decrypt_password`] accepts for `salt`.
pub fn encrypt_password(password: &str, salt: &str) -> Result<String> {
    let (key, iv) = derive_key_iv(salt.as_bytes());
    let cipher = Aes256CbcEnc::new_from_slices(&key, &iv).map_err(|e| {
        SessionError::Crypto(format!("Failed to initialize AES encryptor: {e}"))
    })?;

    let message = password.as_bytes();
    let mut buffer = vec![0u8; (message.len() / BLOCK_LEN + 1) * BLOCK_LEN];
    buffer[..message.len()].copy_from_slice(message);
    let ciphertext = cipher
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, message.len())
        .map_err(|e| SessionError::Crypto(format!("Encryption failed: {e}")))?;

    Ok(BASE64.encode(ciphertext))
}

/// `EVP_BytesToKey(md5, salt = none, count = 1)`.
fn derive_key_iv(secret: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut derived = Vec::with_capacity(KEY_LEN + IV_LEN + BLOCK_LEN);
    let mut previous: Vec<u8> = Vec::new();
    while derived.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        hasher.update(&previous);
        hasher.update(secret);
        previous = hasher.finalize().to_vec();
        derived.extend_from_slice(&previous);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&derived[..KEY_LEN]);
    iv.copy_from_slice(&derived[KEY_LEN..KEY_LEN + IV_LEN]);
    (key, iv)
}
