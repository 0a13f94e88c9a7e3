use std::fmt;

use aes::Aes256;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use cbc::{Decryptor, Encryptor};
use sha2::{Digest, Sha256};

use crate::error::{DecryptionError, EncryptionError, ValidationError};

type Aes256CbcDec = Decryptor<Aes256>;
type Aes256CbcEnc = Encryptor<Aes256>;

const KEY_HEX_LEN: usize = 64;
const IV_HEX_LEN: usize = 32;
const BLOCK_SIZE: usize = 16;

/// Fixed key/IV AES-256-CBC context. Built once per credential entry
/// and passed into every decrypt/encrypt operation; never persisted.
pub struct CipherContext {
    key: [u8; 32],
    iv: [u8; 16],
}

impl fmt::Debug for CipherContext {
    // Key material stays out of logs and error output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherContext").finish_non_exhaustive()
    }
}

impl CipherContext {
    /// Build a context from hex-encoded credentials.
    ///
    /// The key must be exactly 64 hex characters and the IV exactly 32,
    /// case-insensitive. Surrounding whitespace is trimmed first.
    pub fn new(key_hex: &str, iv_hex: &str) -> Result<Self, ValidationError> {
        let key_hex = key_hex.trim();
        let iv_hex = iv_hex.trim();

        if !is_hex_of_len(key_hex, KEY_HEX_LEN) {
            return Err(ValidationError::BadKey(key_hex.len()));
        }
        if !is_hex_of_len(iv_hex, IV_HEX_LEN) {
            return Err(ValidationError::BadIv(iv_hex.len()));
        }

        let mut key = [0u8; 32];
        let mut iv = [0u8; 16];
        hex::decode_to_slice(key_hex, &mut key)
            .map_err(|_| ValidationError::BadKey(key_hex.len()))?;
        hex::decode_to_slice(iv_hex, &mut iv).map_err(|_| ValidationError::BadIv(iv_hex.len()))?;

        Ok(Self { key, iv })
    }

    /// Decrypt a hex-encoded AES-256-CBC ciphertext into UTF-8 plaintext.
    ///
    /// The ciphertext must be hex digits only and block-aligned (length a
    /// multiple of 32). Malformed input fails fast without invoking the
    /// cipher; a bad PKCS#7 pad after decryption is the expected failure
    /// mode for wrong credentials or corrupted data.
    pub fn decrypt(&self, cipher_hex: &str) -> Result<String, DecryptionError> {
        let cipher_hex = cipher_hex.trim();
        if cipher_hex.len() % (BLOCK_SIZE * 2) != 0
            || !cipher_hex.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(DecryptionError::MalformedCiphertext);
        }

        let mut buffer =
            hex::decode(cipher_hex).map_err(|_| DecryptionError::MalformedCiphertext)?;

        let cipher = Aes256CbcDec::new(&self.key.into(), &self.iv.into());
        let plaintext = cipher
            .decrypt_padded_mut::<Pkcs7>(&mut buffer)
            .map_err(|_| DecryptionError::BadPadding)?;

        String::from_utf8(plaintext.to_vec()).map_err(|_| DecryptionError::NotUtf8)
    }

    /// Encrypt UTF-8 plaintext, returning the hex-encoded ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        let msg = plaintext.as_bytes();
        let padded_len = (msg.len() / BLOCK_SIZE + 1) * BLOCK_SIZE;
        let mut buffer = vec![0u8; padded_len];
        buffer[..msg.len()].copy_from_slice(msg);

        let cipher = Aes256CbcEnc::new(&self.key.into(), &self.iv.into());
        let ciphertext = cipher
            .encrypt_padded_mut::<Pkcs7>(&mut buffer, msg.len())
            .map_err(|e| EncryptionError::PadFailed(format!("{:?}", e)))?;

        Ok(hex::encode(ciphertext))
    }
}

/// SHA-256 over the UTF-8 bytes of `payload`, as a lowercase hex digest.
pub fn sha256_hex(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

fn is_hex_of_len(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> CipherContext {
        CipherContext::new(&"a1".repeat(32), &"b2".repeat(16)).unwrap()
    }

    #[test]
    fn test_construct_valid() {
        assert!(CipherContext::new(&"a1".repeat(32), &"b2".repeat(16)).is_ok());
    }

    #[test]
    fn test_construct_uppercase_hex() {
        assert!(CipherContext::new(&"A1".repeat(32), &"B2".repeat(16)).is_ok());
    }

    #[test]
    fn test_construct_trims_whitespace() {
        let key = format!("  {}\n", "a1".repeat(32));
        let iv = format!("\t{} ", "b2".repeat(16));
        assert!(CipherContext::new(&key, &iv).is_ok());
    }

    #[test]
    fn test_construct_short_key() {
        let key = "a".repeat(63);
        let err = CipherContext::new(&key, &"b2".repeat(16)).unwrap_err();
        assert_eq!(err, ValidationError::BadKey(63));
    }

    #[test]
    fn test_construct_non_hex_key() {
        let key = "g".repeat(64);
        assert!(matches!(
            CipherContext::new(&key, &"b2".repeat(16)),
            Err(ValidationError::BadKey(_))
        ));
    }

    #[test]
    fn test_construct_bad_iv() {
        assert!(matches!(
            CipherContext::new(&"a1".repeat(32), "b2b2"),
            Err(ValidationError::BadIv(4))
        ));
    }

    #[test]
    fn test_round_trip() {
        let ctx = test_context();
        let cipher_hex = ctx.encrypt("123-45-6789").unwrap();
        assert_eq!(ctx.decrypt(&cipher_hex).unwrap(), "123-45-6789");
    }

    #[test]
    fn test_round_trip_empty_plaintext() {
        let ctx = test_context();
        let cipher_hex = ctx.encrypt("").unwrap();
        assert_eq!(cipher_hex.len(), 32);
        assert_eq!(ctx.decrypt(&cipher_hex).unwrap(), "");
    }

    #[test]
    fn test_decrypt_non_hex() {
        let ctx = test_context();
        assert_eq!(
            ctx.decrypt("not-hex!!").unwrap_err(),
            DecryptionError::MalformedCiphertext
        );
    }

    #[test]
    fn test_decrypt_unaligned_length() {
        let ctx = test_context();
        // Valid hex, but not a whole number of 16-byte blocks.
        assert_eq!(
            ctx.decrypt(&"ab".repeat(7)).unwrap_err(),
            DecryptionError::MalformedCiphertext
        );
    }

    #[test]
    fn test_decrypt_wrong_key_never_recovers_plaintext() {
        let ctx = test_context();
        let cipher_hex = ctx.encrypt("123-45-6789").unwrap();
        let other = CipherContext::new(&"ff".repeat(32), &"b2".repeat(16)).unwrap();
        // A wrong key yields either a padding failure or garbage, never
        // the original plaintext.
        match other.decrypt(&cipher_hex) {
            Ok(garbage) => assert_ne!(garbage, "123-45-6789"),
            Err(_) => {}
        }
    }

    #[test]
    fn test_decrypt_truncated_ciphertext_fails_padding() {
        let ctx = test_context();
        // 32-byte plaintext encrypts to three blocks; dropping the padding
        // block leaves a final decrypted byte of 0x66, an invalid pad.
        let cipher_hex = ctx.encrypt("0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(cipher_hex.len(), 96);
        assert_eq!(
            ctx.decrypt(&cipher_hex[..64]).unwrap_err(),
            DecryptionError::BadPadding
        );
    }

    #[test]
    fn test_debug_output_redacts_key_material() {
        let ctx = test_context();
        assert_eq!(format!("{:?}", ctx), "CipherContext { .. }");
    }

    #[test]
    fn test_decrypt_is_deterministic() {
        let ctx = test_context();
        let cipher_hex = ctx.encrypt("999-99-9999").unwrap();
        let first = ctx.decrypt(&cipher_hex).unwrap();
        let second = ctx.decrypt(&cipher_hex).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
