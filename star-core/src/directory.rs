//! The fixed 2 MiB directory at the head of an archive.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::StarError;
use crate::format::{DirectoryEntry, DIRECTORY_ENTRY_SIZE, DIRECTORY_SIZE, MAX_FILES};

/// The archive's directory, held as an owned, fixed-length array of slots.
/// Dropping a `Directory` releases its buffer the normal way; there is no
/// manual allocation to free.
pub struct Directory {
    entries: Vec<DirectoryEntry>,
}

impl Directory {
    /// A brand-new, fully empty directory.
    pub fn new() -> Self {
        Directory { entries: (0..MAX_FILES).map(|_| DirectoryEntry::empty()).collect() }
    }

    /// Reads the directory region from the start of `archive`, failing with
    /// [`StarError::CorruptArchive`] if the archive is too short to hold one.
    pub fn load(archive: &mut File) -> Result<Self, StarError> {
        archive.seek(SeekFrom::Start(0))?;
        let mut buffer = vec![0u8; DIRECTORY_SIZE];

        let mut read = 0;
        while read < buffer.len() {
            match archive.read(&mut buffer[read..])? {
                0 => break,
                n => read += n,
            }
        }
        if read < DIRECTORY_SIZE {
            return Err(StarError::CorruptArchive {
                reason: format!("directory is only {read} of {DIRECTORY_SIZE} bytes"),
            });
        }

        let entries = buffer
            .chunks_exact(DIRECTORY_ENTRY_SIZE)
            .map(DirectoryEntry::from_bytes)
            .collect();

        Ok(Directory { entries })
    }

    /// Writes the directory region back to the start of `archive`.
    pub fn store(&self, archive: &mut File) -> Result<(), StarError> {
        let mut buffer = Vec::with_capacity(DIRECTORY_SIZE);
        for entry in &self.entries {
            buffer.extend_from_slice(&entry.to_bytes());
        }
        archive.seek(SeekFrom::Start(0))?;
        archive.write_all(&buffer)?;
        Ok(())
    }

    /// Entries up to (not including) the first empty slot, in slot order.
    pub fn active_entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.iter().take_while(|entry| !entry.is_empty())
    }

    /// Slot index of the given basename, stopping the scan at the first
    /// empty slot, matching `isFileInFATTable`.
    pub fn find(&self, filename: &str) -> Option<usize> {
        self.active_entries().position(|entry| entry.filename == filename)
    }

    /// Index of the first unused slot, if the directory isn't full.
    pub fn first_empty(&self) -> Option<usize> {
        self.entries.iter().position(|entry| entry.is_empty())
    }

    pub fn entry(&self, index: usize) -> &DirectoryEntry {
        &self.entries[index]
    }

    pub fn set_entry(&mut self, index: usize, entry: DirectoryEntry) {
        self.entries[index] = entry;
    }

    pub fn clear_entry(&mut self, index: usize) {
        self.entries[index] = DirectoryEntry::empty();
        self.compact();
    }

    /// Shifts every entry after the first empty slot down by one, so the
    /// "first empty slot ends enumeration" invariant holds after a delete
    /// clears a slot that wasn't already last.
    pub fn compact(&mut self) {
        let Some(mut write) = self.first_empty() else { return };
        for read in write + 1..self.entries.len() {
            if !self.entries[read].is_empty() {
                self.entries.swap(write, read);
                write += 1;
            }
        }
        for entry in &mut self.entries[write..] {
            *entry = DirectoryEntry::empty();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips a leading path off `path`, keeping only the final component —
/// matching `get_filename`'s plain last-`/`-split, with no special-casing
/// of `.`/`..`/trailing slashes.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[index + 1..],
        None => path,
    }
}
