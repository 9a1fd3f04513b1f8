//! `pack`: defragments an archive by laying out every file's blocks
//! contiguously from the start of the body and dropping anything free.
//!
//! The original archiver's defragmentation pass mixed byte offsets and
//! block indices in the same pointer fields, which corrupts chains once a
//! file moves anywhere but the very start of the body. This rewrite
//! standardizes on block indices everywhere — `blockAddress` and `next`
//! are never anything else — by reading every active file's chain fully,
//! then rewriting the body from scratch in directory order.

use std::fs::File;
use std::path::Path;

use crate::blocks::BlockAllocator;
use crate::directory::Directory;
use crate::error::StarError;
use crate::format::{Block, DIRECTORY_SIZE};
use crate::logging::Logger;

pub fn pack(archive_path: &Path, logger: &dyn Logger) -> Result<(), StarError> {
    logger.verbose(&format!("starting to desfragment the tar file {}", archive_path.display()));

    let mut archive = File::options().read(true).write(true).open(archive_path)?;
    let mut directory = Directory::load(&mut archive)?;

    let active_count = directory.active_entries().count();
    let mut per_file_blocks: Vec<Vec<Block>> = Vec::with_capacity(active_count);

    {
        let mut allocator = BlockAllocator::new(&mut archive);
        for index in 0..active_count {
            let entry = directory.entry(index);
            let mut blocks = Vec::new();
            if entry.size > 0 {
                for step in allocator.walk(entry.block_address) {
                    let (block_index, block) = step?;
                    logger.verbose(&format!("reading block #{block_index} for {}", entry.filename));
                    blocks.push(block);
                }
            }
            per_file_blocks.push(blocks);
        }
    }

    archive.set_len(DIRECTORY_SIZE as u64)?;

    let mut cursor: u64 = 0;
    for (index, blocks) in per_file_blocks.into_iter().enumerate() {
        let mut entry = directory.entry(index).clone();
        let file_block_count = blocks.len() as u64;

        if file_block_count > 0 {
            logger.verbose(&format!(
                "updated block address for {} from {} to {cursor}",
                entry.filename, entry.block_address
            ));
            entry.block_address = cursor;
        }
        directory.set_entry(index, entry);

        let mut allocator = BlockAllocator::new(&mut archive);
        for (offset, mut block) in blocks.into_iter().enumerate() {
            let target = cursor + offset as u64;
            block.is_free = false;
            block.next = if (offset as u64) + 1 < file_block_count { target + 1 } else { 0 };
            allocator.write_block(target, &block)?;
        }

        cursor += file_block_count;
    }

    directory.store(&mut archive)?;

    logger.verbose("file desfragmented successfully");
    Ok(())
}
