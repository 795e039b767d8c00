//! In-memory ZIP archive authoring for tests.
//!
//! Builds small, well-formed archives with STORED or DEFLATE entries,
//! optionally encrypted with traditional PKWARE encryption. The cipher is
//! symmetric, so the crate's own `ZipCrypto` produces fixtures the
//! extractor must be able to open.

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use quickzip::zip::ZipCrypto;
use std::io::Write;
use std::path::Path;

const MOD_TIME: u16 = 0x6083;
const MOD_DATE: u16 = 0x58A1;

pub struct ZipBuilder {
    data: Vec<u8>,
    central: Vec<u8>,
    entries: u16,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            central: Vec::new(),
            entries: 0,
        }
    }

    /// Add a directory entry (name must end with '/').
    pub fn add_dir(&mut self, name: &str) -> &mut Self {
        assert!(name.ends_with('/'), "directory names must end with '/'");
        self.push_entry(name, &[], 0, 0, 0, None);
        self
    }

    /// Add a STORED (uncompressed) file entry.
    pub fn add_stored(&mut self, name: &str, contents: &[u8], password: Option<&[u8]>) -> &mut Self {
        let crc = crc32fast::hash(contents);
        self.push_entry(name, contents, 0, crc, contents.len() as u32, password);
        self
    }

    /// Add a DEFLATE-compressed file entry.
    pub fn add_deflated(
        &mut self,
        name: &str,
        contents: &[u8],
        password: Option<&[u8]>,
    ) -> &mut Self {
        let crc = crc32fast::hash(contents);
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(contents).expect("deflate write");
        let compressed = encoder.finish().expect("deflate finish");
        self.push_entry(name, &compressed, 8, crc, contents.len() as u32, password);
        self
    }

    fn push_entry(
        &mut self,
        name: &str,
        payload: &[u8],
        method: u16,
        crc: u32,
        uncompressed_size: u32,
        password: Option<&[u8]>,
    ) {
        let lfh_offset = self.data.len() as u32;
        let flags: u16 = if password.is_some() { 0x0001 } else { 0 };

        // Encrypt: 12-byte header (check byte = high byte of CRC) followed
        // by the payload, one continuous key stream.
        let stored_payload = match password {
            Some(password) => {
                let mut cipher = ZipCrypto::new(password);
                let mut buf = Vec::with_capacity(12 + payload.len());
                let mut header = [0u8; 12];
                for (i, byte) in header.iter_mut().enumerate().take(11) {
                    *byte = (i as u8).wrapping_mul(37).wrapping_add(11);
                }
                header[11] = (crc >> 24) as u8;
                cipher.encrypt(&mut header);
                buf.extend_from_slice(&header);
                let mut body = payload.to_vec();
                cipher.encrypt(&mut body);
                buf.extend_from_slice(&body);
                buf
            }
            None => payload.to_vec(),
        };
        let compressed_size = stored_payload.len() as u32;

        // Local File Header
        let w = &mut self.data;
        w.extend_from_slice(b"PK\x03\x04");
        w.write_u16::<LittleEndian>(20).unwrap(); // version needed
        w.write_u16::<LittleEndian>(flags).unwrap();
        w.write_u16::<LittleEndian>(method).unwrap();
        w.write_u16::<LittleEndian>(MOD_TIME).unwrap();
        w.write_u16::<LittleEndian>(MOD_DATE).unwrap();
        w.write_u32::<LittleEndian>(crc).unwrap();
        w.write_u32::<LittleEndian>(compressed_size).unwrap();
        w.write_u32::<LittleEndian>(uncompressed_size).unwrap();
        w.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        w.write_u16::<LittleEndian>(0).unwrap(); // extra field length
        w.extend_from_slice(name.as_bytes());
        w.extend_from_slice(&stored_payload);

        // Central Directory File Header
        let c = &mut self.central;
        c.extend_from_slice(b"PK\x01\x02");
        c.write_u16::<LittleEndian>(20).unwrap(); // version made by
        c.write_u16::<LittleEndian>(20).unwrap(); // version needed
        c.write_u16::<LittleEndian>(flags).unwrap();
        c.write_u16::<LittleEndian>(method).unwrap();
        c.write_u16::<LittleEndian>(MOD_TIME).unwrap();
        c.write_u16::<LittleEndian>(MOD_DATE).unwrap();
        c.write_u32::<LittleEndian>(crc).unwrap();
        c.write_u32::<LittleEndian>(compressed_size).unwrap();
        c.write_u32::<LittleEndian>(uncompressed_size).unwrap();
        c.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        c.write_u16::<LittleEndian>(0).unwrap(); // extra field length
        c.write_u16::<LittleEndian>(0).unwrap(); // comment length
        c.write_u16::<LittleEndian>(0).unwrap(); // disk number start
        c.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
        c.write_u32::<LittleEndian>(0).unwrap(); // external attrs
        c.write_u32::<LittleEndian>(lfh_offset).unwrap();
        c.extend_from_slice(name.as_bytes());

        self.entries += 1;
    }

    /// Serialize the archive: entry data, central directory, EOCD.
    pub fn finish(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        let cd_offset = out.len() as u32;
        out.extend_from_slice(&self.central);

        out.extend_from_slice(b"PK\x05\x06");
        out.write_u16::<LittleEndian>(0).unwrap(); // disk number
        out.write_u16::<LittleEndian>(0).unwrap(); // disk with CD
        out.write_u16::<LittleEndian>(self.entries).unwrap();
        out.write_u16::<LittleEndian>(self.entries).unwrap();
        out.write_u32::<LittleEndian>(self.central.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // comment length
        out
    }

    /// Serialize and write the archive to `path`.
    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.finish()).expect("write archive fixture");
    }
}
