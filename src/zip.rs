//! Minimal read-only ZIP access for office documents.
//!
//! Entries are located by walking local file headers from offset 0. When
//! that walk ends without finding the wanted entry, the central directory
//! at the end of the archive is consulted instead; this covers archives
//! whose writers put sizes in trailing data descriptors.
//!
//! Only stored (0) and deflated (8) entries can be read.

use crate::error::{Error, Result};
use flate2::read::DeflateDecoder;
use std::io::Read;

/// Local file header signature (`PK\x03\x04`).
pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4b50;

/// Central directory file header signature (`PK\x01\x02`).
pub const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;

/// End of central directory record signature (`PK\x05\x06`).
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;

/// Compression method: stored.
pub const METHOD_STORED: u16 = 0;

/// Compression method: deflate.
pub const METHOD_DEFLATED: u16 = 8;

const LOCAL_HEADER_LEN: usize = 30;
const CENTRAL_HEADER_LEN: usize = 46;
const EOCD_LEN: usize = 22;
const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// General purpose flag bit: sizes are in a trailing data descriptor.
const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// One entry located in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipLocalEntry<'a> {
    /// Entry name (lossy UTF-8)
    pub name: String,
    /// Raw compression method
    pub compression_method: u16,
    /// Size of the payload as stored in the archive
    pub compressed_size: u32,
    /// Offset of the payload from the start of the archive
    pub data_offset: usize,
    /// General purpose bit flags
    pub flags: u16,
    /// Stored payload
    pub data: &'a [u8],
}

impl<'a> ZipLocalEntry<'a> {
    /// Whether the local header defers its sizes to a data descriptor.
    pub fn has_deferred_size(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0 && self.compressed_size == 0
    }

    /// Human-readable compression method.
    pub fn compression_name(&self) -> &'static str {
        match self.compression_method {
            METHOD_STORED => "stored",
            METHOD_DEFLATED => "deflate",
            _ => "unsupported",
        }
    }

    /// Decompress the entry payload.
    ///
    /// Stored entries are copied; deflated entries are raw-inflated and
    /// must not exceed `limit` bytes. Other methods are an error.
    pub fn decompress(&self, limit: usize) -> Result<Vec<u8>> {
        match self.compression_method {
            METHOD_STORED => Ok(self.data.to_vec()),
            METHOD_DEFLATED => inflate_raw(self.data, limit, &self.name),
            method => Err(Error::UnsupportedCompression {
                method,
                entry: self.name.clone(),
            }),
        }
    }
}

/// Raw-inflate a deflate stream (no zlib wrapper), bounded by `limit`.
pub fn inflate_raw(data: &[u8], limit: usize, entry: &str) -> Result<Vec<u8>> {
    let decoder = DeflateDecoder::new(data);
    read_bounded(decoder, limit, entry)
}

pub(crate) fn read_bounded<R: Read>(reader: R, limit: usize, entry: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let cap = (limit as u64).saturating_add(1);
    reader
        .take(cap)
        .read_to_end(&mut out)
        .map_err(|e| Error::Decompress {
            entry: entry.to_string(),
            message: e.to_string(),
        })?;

    if out.len() > limit {
        return Err(Error::DecompressedTooLarge {
            entry: entry.to_string(),
            limit,
        });
    }
    Ok(out)
}

/// Iterator over entries reachable by walking local file headers.
///
/// The walk ends at the first offset that does not hold a local header
/// signature, at a header whose payload would run past the buffer, or at
/// an entry whose size is deferred to a data descriptor.
#[derive(Debug, Clone)]
pub struct LocalEntries<'a> {
    data: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> Iterator for LocalEntries<'a> {
    type Item = ZipLocalEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match parse_local_header(self.data, self.offset, None) {
            Some(entry) => {
                if entry.has_deferred_size() {
                    log::debug!("zip walk stops at {}: sizes in data descriptor", entry.name);
                    self.done = true;
                } else {
                    self.offset = entry.data_offset + entry.data.len();
                }
                Some(entry)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Walk local file headers starting at offset 0.
pub fn local_entries(data: &[u8]) -> LocalEntries<'_> {
    LocalEntries {
        data,
        offset: 0,
        done: false,
    }
}

/// Parse the local header at `offset`.
///
/// `size_override` replaces the header's compressed size, for entries
/// located through the central directory.
fn parse_local_header(data: &[u8], offset: usize, size_override: Option<u32>) -> Option<ZipLocalEntry<'_>> {
    if read_u32(data, offset)? != LOCAL_FILE_HEADER_SIGNATURE {
        return None;
    }
    if offset.checked_add(LOCAL_HEADER_LEN)? > data.len() {
        return None;
    }

    let flags = read_u16(data, offset + 6)?;
    let compression_method = read_u16(data, offset + 8)?;
    let compressed_size = size_override.unwrap_or(read_u32(data, offset + 18)?);
    let name_len = read_u16(data, offset + 26)? as usize;
    let extra_len = read_u16(data, offset + 28)? as usize;

    let name_start = offset + LOCAL_HEADER_LEN;
    let name_end = name_start.checked_add(name_len)?;
    let data_start = name_end.checked_add(extra_len)?;
    let data_end = data_start.checked_add(compressed_size as usize)?;
    if data_end > data.len() {
        return None;
    }

    Some(ZipLocalEntry {
        name: String::from_utf8_lossy(&data[name_start..name_end]).into_owned(),
        compression_method,
        compressed_size,
        data_offset: data_start,
        flags,
        data: &data[data_start..data_end],
    })
}

/// Find an entry by exact name.
///
/// Tries the local header walk first and falls back to the central
/// directory. `None` means the entry is not in the archive (or the buffer
/// is not a readable archive at all).
pub fn find_entry<'a>(data: &'a [u8], name: &str) -> Option<ZipLocalEntry<'a>> {
    let walked = local_entries(data).find(|e| e.name == name);
    if let Some(entry) = walked.filter(|e| !e.has_deferred_size()) {
        log::debug!("found {} at offset {} by local header walk", name, entry.data_offset);
        return Some(entry);
    }

    let entry = find_in_central_directory(data, name)?;
    log::debug!("found {} at offset {} via central directory", name, entry.data_offset);
    Some(entry)
}

fn find_end_of_central_directory(data: &[u8]) -> Option<usize> {
    if data.len() < EOCD_LEN {
        return None;
    }
    let last = data.len() - EOCD_LEN;
    let first = last.saturating_sub(MAX_COMMENT_LEN);
    (first..=last)
        .rev()
        .find(|&pos| read_u32(data, pos) == Some(END_OF_CENTRAL_DIRECTORY_SIGNATURE))
}

fn find_in_central_directory<'a>(data: &'a [u8], name: &str) -> Option<ZipLocalEntry<'a>> {
    let eocd = find_end_of_central_directory(data)?;
    let entry_count = read_u16(data, eocd + 10)? as usize;
    let mut offset = read_u32(data, eocd + 16)? as usize;

    for _ in 0..entry_count {
        if read_u32(data, offset)? != CENTRAL_DIRECTORY_SIGNATURE {
            return None;
        }
        let compressed_size = read_u32(data, offset + 20)?;
        let name_len = read_u16(data, offset + 28)? as usize;
        let extra_len = read_u16(data, offset + 30)? as usize;
        let comment_len = read_u16(data, offset + 32)? as usize;
        let local_offset = read_u32(data, offset + 42)? as usize;

        let name_start = offset + CENTRAL_HEADER_LEN;
        let name_bytes = data.get(name_start..name_start.checked_add(name_len)?)?;
        if name_bytes == name.as_bytes() {
            return parse_local_header(data, local_offset, Some(compressed_size));
        }

        offset = name_start
            .checked_add(name_len)?
            .checked_add(extra_len)?
            .checked_add(comment_len)?;
    }
    None
}
