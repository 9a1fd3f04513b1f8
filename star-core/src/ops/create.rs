//! `create`: packs a fresh set of input files into a new archive.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::blocks::BlockAllocator;
use crate::directory::{basename, Directory};
use crate::error::StarError;
use crate::format::{Block, DirectoryEntry, MAX_FILES, PAYLOAD_SIZE};
use crate::logging::Logger;
use crate::ops::{blocks_needed, read_up_to};

/// Writes `inputs` into a brand-new archive at `output_path`.
///
/// A missing or unreadable input file is fatal for the whole operation —
/// unlike the rest of the operations, `create` has nothing partially
/// committed yet to be careful about, so the whole archive is abandoned
/// rather than written with a corrupt entry.
pub fn create(output_path: &Path, inputs: &[PathBuf], logger: &dyn Logger) -> Result<(), StarError> {
    if inputs.is_empty() {
        logger.error("no files to add...");
        return Err(StarError::NoFiles);
    }

    let inputs: &[PathBuf] = if inputs.len() > MAX_FILES {
        logger.verbose("star only supports up to 10k files. Since it has a 2MB FAT Table");
        &inputs[..MAX_FILES]
    } else {
        inputs
    };

    logger.verbose(&format!("starting to create {}", output_path.display()));

    let mut directory = Directory::new();
    let mut planned = Vec::with_capacity(inputs.len());
    let mut blocks_created: u64 = 0;

    for (index, input_path) in inputs.iter().enumerate() {
        let metadata = fs::metadata(input_path).map_err(|_| StarError::FileMissing { path: input_path.clone() })?;
        let file_size = metadata.len();
        let filename = basename(&input_path.to_string_lossy()).to_string();
        let num_blocks = blocks_needed(file_size);

        logger.verbose(&format!("Adding file {filename} to header"));

        directory.set_entry(index, DirectoryEntry { filename, block_address: blocks_created, size: file_size });
        planned.push((input_path.clone(), num_blocks));
        blocks_created += num_blocks;
    }

    let mut archive = File::create(output_path)?;
    archive.set_len(0)?;
    directory.store(&mut archive)?;

    let mut blocks_written: u64 = 0;
    for (input_path, num_blocks) in planned {
        let mut input = File::open(&input_path)?;
        let mut allocator = BlockAllocator::new(&mut archive);

        for b in 0..num_blocks {
            let mut payload = vec![0u8; PAYLOAD_SIZE];
            let read = read_up_to(&mut input, &mut payload)?;
            payload[read..].fill(0);

            let next = if b + 1 < num_blocks { blocks_written + b + 1 } else { 0 };
            let block = Block { next, is_free: false, payload };
            allocator.write_block(blocks_written + b, &block)?;
        }

        blocks_written += num_blocks;
    }

    Ok(())
}
