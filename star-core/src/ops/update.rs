//! `update`: overwrites an archived file's content in place, shrinking or
//! growing its block chain as needed.
//!
//! When the new content needs fewer or the same number of blocks, the kept
//! prefix is overwritten and the freed suffix is released. When it needs
//! more, the kept prefix is overwritten, fresh blocks are appended at
//! end-of-archive, and the old chain's tail is relinked to them. The
//! entry's `blockAddress` never changes once a file has at least one
//! existing block — only `size` and the blocks beyond it do.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::blocks::BlockAllocator;
use crate::directory::{basename, Directory};
use crate::error::StarError;
use crate::format::{Block, PAYLOAD_SIZE};
use crate::logging::Logger;
use crate::ops::{blocks_needed, read_up_to};

pub fn update(archive_path: &Path, inputs: &[PathBuf], logger: &dyn Logger) -> Result<(), StarError> {
    logger.verbose(&format!("Starting to update archives inside {}", archive_path.display()));

    let mut archive = File::options().read(true).write(true).open(archive_path)?;
    let mut directory = Directory::load(&mut archive)?;

    for input_path in inputs {
        let mut input = match File::open(input_path) {
            Ok(file) => file,
            Err(_) => {
                logger.error(&format!(
                    "Error reading file {}, continuing with other files.",
                    input_path.display()
                ));
                continue;
            }
        };

        let new_file_size = input.metadata()?.len();
        let filename = basename(&input_path.to_string_lossy()).to_string();

        let Some(index) = directory.find(&filename) else {
            logger.error("file not in archive... continuing...");
            continue;
        };

        let mut entry = directory.entry(index).clone();
        let existing_blocks = blocks_needed(entry.size);
        let new_num_blocks = blocks_needed(new_file_size);

        logger.verbose(&format!(
            "file {} has {existing_blocks} blocks and will require now {new_num_blocks} blocks.",
            entry.filename
        ));

        let mut allocator = BlockAllocator::new(&mut archive);

        if existing_blocks >= new_num_blocks {
            // `existing_blocks == 0` here only happens with `new_num_blocks
            // == 0` too (the entry was already empty and stays empty) — its
            // `block_address` owns no real chain and must not be touched.
            if existing_blocks > 0 {
                overwrite_and_shrink(&mut allocator, entry.block_address, new_num_blocks, &mut input)?;
            }
        } else {
            entry.block_address =
                overwrite_and_grow(&mut allocator, entry.block_address, existing_blocks, new_num_blocks, &mut input)?;
        }

        entry.size = new_file_size;
        directory.set_entry(index, entry);
    }

    directory.store(&mut archive)?;
    Ok(())
}

/// Overwrites the first `new_num_blocks` blocks of the chain starting at
/// `start` with fresh content, terminates the chain there, and frees
/// whatever used to follow.
fn overwrite_and_shrink(
    allocator: &mut BlockAllocator,
    start: u64,
    new_num_blocks: u64,
    input: &mut File,
) -> Result<(), StarError> {
    if new_num_blocks == 0 {
        allocator.free_chain(start)?;
        return Ok(());
    }

    let mut current = start;
    let mut freed_from = 0u64;

    for i in 0..new_num_blocks {
        let mut block = allocator.read_block(current)?;
        let old_next = block.next;

        block.payload = read_payload(input)?;
        block.is_free = false;

        if i + 1 == new_num_blocks {
            freed_from = old_next;
            block.next = 0;
        }

        allocator.write_block(current, &block)?;

        if i + 1 < new_num_blocks {
            current = old_next;
        }
    }

    if freed_from != 0 {
        allocator.free_chain(freed_from)?;
    }

    Ok(())
}

/// Overwrites the whole existing chain, appends the extra blocks the new
/// content needs at end-of-archive, and links the old tail to them.
/// Returns the file's (possibly newly assigned) starting block index.
fn overwrite_and_grow(
    allocator: &mut BlockAllocator,
    start: u64,
    existing_blocks: u64,
    new_num_blocks: u64,
    input: &mut File,
) -> Result<u64, StarError> {
    if existing_blocks == 0 {
        return append_chain(allocator, new_num_blocks, input);
    }

    let mut current = start;
    let mut last_index = start;

    for i in 0..existing_blocks {
        let mut block = allocator.read_block(current)?;
        let next = block.next;

        block.payload = read_payload(input)?;
        block.is_free = false;
        allocator.write_block(current, &block)?;

        last_index = current;
        if i + 1 < existing_blocks {
            current = next;
        }
    }

    let first_new = append_chain(allocator, new_num_blocks - existing_blocks, input)?;

    let mut last_block = allocator.read_block(last_index)?;
    last_block.next = first_new;
    allocator.write_block(last_index, &last_block)?;

    Ok(start)
}

fn append_chain(allocator: &mut BlockAllocator, count: u64, input: &mut File) -> Result<u64, StarError> {
    if count == 0 {
        return Ok(0);
    }

    let first = allocator.block_count()?;
    for b in 0..count {
        let next = if b + 1 < count { first + b + 1 } else { 0 };
        let block = Block { next, is_free: false, payload: read_payload(input)? };
        allocator.write_block(first + b, &block)?;
    }

    Ok(first)
}

fn read_payload(input: &mut File) -> Result<Vec<u8>, StarError> {
    let mut payload = vec![0u8; PAYLOAD_SIZE];
    let read = read_up_to(input, &mut payload)?;
    payload[read..].fill(0);
    Ok(payload)
}
