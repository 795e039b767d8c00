//! Traditional PKWARE encryption (ZipCrypto).
//!
//! The cipher keeps three 32-bit keys seeded from the password and updated
//! with every plaintext byte, per APPNOTE 6.1 section 6.1. Each encrypted
//! entry is preceded by a 12-byte encryption header whose final byte acts
//! as a fast password check: it must match the high byte of the entry CRC
//! (or of the modification time when a data descriptor is used).
//!
//! ZipCrypto is cryptographically weak; it is implemented here for
//! compatibility with password-protected archives, not as a security
//! boundary. The encrypt side exists because the cipher is symmetric and
//! tests author their own encrypted fixtures with it.

use crate::error::{ArchiveError, Result};
use crate::zip::structures::{ENCRYPTION_HEADER_SIZE, ZipFileEntry};

/// CRC-32 (IEEE) table used by the key schedule.
///
/// The key schedule needs raw register access to the CRC state, which the
/// whole-buffer hashing API cannot provide, so the table lives here.
const fn crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                0xEDB8_8320 ^ (crc >> 1)
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

const CRC_TABLE: [u32; 256] = crc_table();

#[inline]
fn crc32_byte(crc: u32, byte: u8) -> u32 {
    CRC_TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8)
}

/// ZipCrypto cipher state for one entry stream.
#[derive(Clone)]
pub struct ZipCrypto {
    keys: [u32; 3],
}

impl ZipCrypto {
    /// Initialize the key schedule from a password.
    pub fn new(password: &[u8]) -> Self {
        let mut cipher = Self {
            keys: [0x1234_5678, 0x2345_6789, 0x3456_7890],
        };
        for &byte in password {
            cipher.update_keys(byte);
        }
        cipher
    }

    #[inline]
    fn update_keys(&mut self, plain: u8) {
        self.keys[0] = crc32_byte(self.keys[0], plain);
        self.keys[1] = self.keys[1]
            .wrapping_add(self.keys[0] & 0xFF)
            .wrapping_mul(134_775_813)
            .wrapping_add(1);
        self.keys[2] = crc32_byte(self.keys[2], (self.keys[1] >> 24) as u8);
    }

    #[inline]
    fn stream_byte(&self) -> u8 {
        let temp = (self.keys[2] | 2) as u16;
        (temp.wrapping_mul(temp ^ 1) >> 8) as u8
    }

    /// Decrypt a single byte and advance the key schedule.
    #[inline]
    pub fn decrypt_byte(&mut self, cipher: u8) -> u8 {
        let plain = cipher ^ self.stream_byte();
        self.update_keys(plain);
        plain
    }

    /// Encrypt a single byte and advance the key schedule.
    #[inline]
    pub fn encrypt_byte(&mut self, plain: u8) -> u8 {
        let cipher = plain ^ self.stream_byte();
        self.update_keys(plain);
        cipher
    }

    /// Decrypt a buffer in place.
    pub fn decrypt(&mut self, buf: &mut [u8]) {
        for byte in buf {
            *byte = self.decrypt_byte(*byte);
        }
    }

    /// Encrypt a buffer in place.
    pub fn encrypt(&mut self, buf: &mut [u8]) {
        for byte in buf {
            *byte = self.encrypt_byte(*byte);
        }
    }

    /// Consume an entry's 12-byte encryption header and verify the
    /// password check byte.
    ///
    /// A mismatch is a wrong password, typed at the point of failure. Note
    /// the check byte only catches 255 of 256 wrong passwords; callers
    /// follow up with a probe decompression or a CRC check.
    pub fn verify_header(
        &mut self,
        header: &[u8; ENCRYPTION_HEADER_SIZE],
        entry: &ZipFileEntry,
    ) -> Result<()> {
        let mut decrypted = *header;
        self.decrypt(&mut decrypted);
        if decrypted[ENCRYPTION_HEADER_SIZE - 1] != entry.password_check_byte() {
            return Err(ArchiveError::WrongPassword);
        }
        Ok(())
    }
}
