//! On-disk record layouts.
//!
//! Every multi-byte number on disk is the fixed-width octal ASCII field from
//! [`crate::octal`], never a native integer laid out by the compiler — so,
//! unlike the ELF/FAT readers elsewhere in this workspace, records here are
//! serialized through explicit accessors rather than `transmute`.

use crate::octal;

/// Width of one octal numeric field on disk (11 digits + NUL).
pub const OCTAL_FIELD_LEN: usize = 12;

/// Length of the null-terminated basename field in a directory entry.
pub const FILENAME_LEN: usize = 176;

/// Size in bytes of one directory entry on disk.
pub const DIRECTORY_ENTRY_SIZE: usize = FILENAME_LEN + OCTAL_FIELD_LEN + OCTAL_FIELD_LEN;

/// Maximum number of files a single archive can hold.
pub const MAX_FILES: usize = 10_000;

/// Size in bytes of the fixed directory region at the head of an archive.
pub const DIRECTORY_SIZE: usize = DIRECTORY_ENTRY_SIZE * MAX_FILES;

/// Size in bytes of one data block, header included.
pub const BLOCK_SIZE: usize = 256 * 1024;

/// Size in bytes of a data block's `next`/`isFree` header.
pub const BLOCK_HEADER_SIZE: usize = OCTAL_FIELD_LEN * 2;

/// Usable payload bytes per data block.
pub const PAYLOAD_SIZE: usize = BLOCK_SIZE - BLOCK_HEADER_SIZE;

const _: () = assert!(DIRECTORY_SIZE == DIRECTORY_ENTRY_SIZE * MAX_FILES);

/// One row of the archive's directory: a file's basename, its starting
/// block, and its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub filename: String,
    pub block_address: u64,
    pub size: u64,
}

impl DirectoryEntry {
    /// An entry with an empty filename is an unused directory slot.
    pub fn is_empty(&self) -> bool {
        self.filename.is_empty()
    }

    pub fn empty() -> Self {
        DirectoryEntry { filename: String::new(), block_address: 0, size: 0 }
    }

    /// Serializes this entry into the fixed 200-byte on-disk layout.
    pub fn to_bytes(&self) -> [u8; DIRECTORY_ENTRY_SIZE] {
        let mut buffer = [0u8; DIRECTORY_ENTRY_SIZE];

        let name_bytes = self.filename.as_bytes();
        let copy_len = name_bytes.len().min(FILENAME_LEN - 1);
        buffer[..copy_len].copy_from_slice(&name_bytes[..copy_len]);
        // Remaining filename bytes, including the terminating NUL, stay zero.

        buffer[FILENAME_LEN..FILENAME_LEN + OCTAL_FIELD_LEN]
            .copy_from_slice(&octal::encode(self.block_address));
        buffer[FILENAME_LEN + OCTAL_FIELD_LEN..DIRECTORY_ENTRY_SIZE]
            .copy_from_slice(&octal::encode(self.size));

        buffer
    }

    /// Parses a 200-byte directory slot. An all-zero (or empty-filename)
    /// slot decodes to [`DirectoryEntry::empty`].
    pub fn from_bytes(buffer: &[u8]) -> Self {
        debug_assert_eq!(buffer.len(), DIRECTORY_ENTRY_SIZE);

        let name_field = &buffer[..FILENAME_LEN];
        let name_end = name_field.iter().position(|&b| b == 0).unwrap_or(FILENAME_LEN);
        let filename = String::from_utf8_lossy(&name_field[..name_end]).into_owned();

        let block_address = octal::decode(&buffer[FILENAME_LEN..FILENAME_LEN + OCTAL_FIELD_LEN]);
        let size = octal::decode(&buffer[FILENAME_LEN + OCTAL_FIELD_LEN..DIRECTORY_ENTRY_SIZE]);

        DirectoryEntry { filename, block_address, size }
    }
}

/// One fixed-size data block: a link to the next block in the chain, a
/// free/used flag, and the payload bytes.
#[derive(Debug, Clone)]
pub struct Block {
    pub next: u64,
    pub is_free: bool,
    pub payload: Vec<u8>,
}

impl Block {
    pub fn empty_free() -> Self {
        Block { next: 0, is_free: true, payload: vec![0u8; PAYLOAD_SIZE] }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(BLOCK_SIZE);
        buffer.extend_from_slice(&octal::encode(self.next));
        buffer.extend_from_slice(&octal::encode(self.is_free as u64));
        buffer.extend_from_slice(&self.payload);
        buffer.resize(BLOCK_SIZE, 0);
        buffer
    }

    pub fn from_bytes(buffer: &[u8]) -> Self {
        debug_assert_eq!(buffer.len(), BLOCK_SIZE);
        let next = octal::decode(&buffer[0..OCTAL_FIELD_LEN]);
        let is_free = octal::decode(&buffer[OCTAL_FIELD_LEN..BLOCK_HEADER_SIZE]) != 0;
        let payload = buffer[BLOCK_HEADER_SIZE..BLOCK_SIZE].to_vec();
        Block { next, is_free, payload }
    }
}
