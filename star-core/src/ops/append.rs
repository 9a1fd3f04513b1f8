//! `append`: adds new files to an existing archive without touching any
//! file already stored in it.
//!
//! The original archiver only logged a message here and never actually
//! wrote anything; this builds the operation out for real, reusing the
//! same per-file block-writing approach as `create`, but targeting the
//! first empty directory slot for each new file and writing its blocks at
//! end-of-archive instead of planning from a zeroed layout.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::blocks::BlockAllocator;
use crate::directory::{basename, Directory};
use crate::error::StarError;
use crate::format::{Block, DirectoryEntry, MAX_FILES, PAYLOAD_SIZE};
use crate::logging::Logger;
use crate::ops::{blocks_needed, read_up_to};

pub fn append(archive_path: &Path, inputs: &[PathBuf], logger: &dyn Logger) -> Result<(), StarError> {
    if inputs.is_empty() {
        logger.error("no files to add...");
        return Err(StarError::NoFiles);
    }

    // Unlike `create`, which truncates and warns, requesting more files than
    // an archive can ever hold is fatal here — there's no sane subset to add.
    if inputs.len() > MAX_FILES {
        return Err(StarError::CapacityExceeded { max: MAX_FILES });
    }

    logger.verbose(&format!("starting to add new archives inside {}", archive_path.display()));

    let mut archive = File::options().read(true).write(true).open(archive_path)?;
    let mut directory = Directory::load(&mut archive)?;

    for input_path in inputs {
        let metadata = match fs::metadata(input_path) {
            Ok(metadata) => metadata,
            Err(_) => {
                logger.error(&format!(
                    "Error reading file {}, continuing with other files.",
                    input_path.display()
                ));
                continue;
            }
        };

        let Some(slot) = directory.first_empty() else {
            return Err(StarError::DirectoryFull);
        };

        let filename = basename(&input_path.to_string_lossy()).to_string();
        let file_size = metadata.len();
        let num_blocks = blocks_needed(file_size);

        let mut allocator = BlockAllocator::new(&mut archive);
        let mut input = File::open(input_path)?;
        let mut block_address = 0;

        for b in 0..num_blocks {
            let mut payload = vec![0u8; PAYLOAD_SIZE];
            let read = read_up_to(&mut input, &mut payload)?;
            payload[read..].fill(0);

            // `next` isn't known until the following block is appended, so
            // it's patched in once the chain's whole length is on disk.
            let index = allocator.append_block(&Block { next: 0, is_free: false, payload })?;
            if b == 0 {
                block_address = index;
            } else {
                let mut previous = allocator.read_block(index - 1)?;
                previous.next = index;
                allocator.write_block(index - 1, &previous)?;
            }
        }

        logger.verbose(&format!("appended {filename} at block #{block_address}"));
        directory.set_entry(slot, DirectoryEntry { filename, block_address, size: file_size });
    }

    directory.store(&mut archive)?;
    Ok(())
}
