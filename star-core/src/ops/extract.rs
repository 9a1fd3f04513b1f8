//! `extract`: writes every archived file back out into the current
//! directory. Read-only with respect to the archive.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::blocks::BlockAllocator;
use crate::directory::Directory;
use crate::error::StarError;
use crate::format::PAYLOAD_SIZE;
use crate::logging::Logger;

pub fn extract(archive_path: &Path, logger: &dyn Logger) -> Result<(), StarError> {
    let mut archive = File::open(archive_path)?;
    let directory = Directory::load(&mut archive)?;

    for entry in directory.active_entries() {
        if let Err(err) = extract_one(&mut archive, entry, logger) {
            logger.error(&format!("Failed to create file {}: {err}", entry.filename));
        }
    }

    Ok(())
}

fn extract_one(
    archive: &mut File,
    entry: &crate::format::DirectoryEntry,
    logger: &dyn Logger,
) -> Result<(), StarError> {
    let mut output = File::create(&entry.filename)?;
    logger.verbose(&format!("starting to create {}", entry.filename));

    let mut allocator = BlockAllocator::new(archive);
    let mut written: u64 = 0;

    if entry.size > 0 {
        for step in allocator.walk(entry.block_address) {
            let (index, block) = step?;
            logger.verbose(&format!("reading block #{index}"));

            let remaining = entry.size - written;
            let take = (PAYLOAD_SIZE as u64).min(remaining) as usize;
            output.write_all(&block.payload[..take])?;
            written += take as u64;

            if written >= entry.size {
                break;
            }
        }
    }

    Ok(())
}
