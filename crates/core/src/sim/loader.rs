//! Memory image loading.
//!
//! This module parses the textual memory image format into a `SparseMemory`.
//! The format is a whitespace-separated token stream:
//! 1. **Address directives:** `@HHHHHHHH` moves the write cursor to an
//!    absolute byte address.
//! 2. **Data bytes:** `HH` writes one byte at the cursor and advances it.
//!
//! All numbers are hexadecimal and case-insensitive. Anything else is a fatal
//! `SimError::MalformedImage`.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::debug;

use crate::common::SimError;
use crate::mem::SparseMemory;

/// Parses a memory image from a reader.
pub fn parse_image<R: Read>(reader: R) -> Result<SparseMemory, SimError> {
    let mut mem = SparseMemory::new();
    let mut cursor: u32 = 0;

    for (line_idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        for token in line.split_whitespace() {
            if let Some(addr) = token.strip_prefix('@') {
                cursor = u32::from_str_radix(addr, 16).map_err(|_| {
                    SimError::MalformedImage {
                        token: token.to_string(),
                        line: line_idx + 1,
                    }
                })?;
            } else {
                let byte = u8::from_str_radix(token, 16).map_err(|_| {
                    SimError::MalformedImage {
                        token: token.to_string(),
                        line: line_idx + 1,
                    }
                })?;
                mem.write_u8(cursor, byte);
                cursor = cursor.wrapping_add(1);
            }
        }
    }

    debug!("image loaded: {} bytes", mem.len());
    Ok(mem)
}

/// Parses a memory image from a file.
pub fn parse_image_file<P: AsRef<Path>>(path: P) -> Result<SparseMemory, SimError> {
    parse_image(File::open(path)?)
}
