//! The block body of an archive: fixed-size blocks addressed by index,
//! linked into per-file chains via each block's `next` field.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::StarError;
use crate::format::{Block, BLOCK_SIZE, DIRECTORY_SIZE};

/// Reads and writes blocks by index against the body of an archive file.
pub struct BlockAllocator<'a> {
    archive: &'a mut File,
}

impl<'a> BlockAllocator<'a> {
    pub fn new(archive: &'a mut File) -> Self {
        BlockAllocator { archive }
    }

    fn offset(index: u64) -> u64 {
        DIRECTORY_SIZE as u64 + index * BLOCK_SIZE as u64
    }

    /// Number of blocks currently stored in the body.
    pub fn block_count(&mut self) -> Result<u64, StarError> {
        let len = self.archive.seek(SeekFrom::End(0))?;
        Ok((len - DIRECTORY_SIZE as u64) / BLOCK_SIZE as u64)
    }

    pub fn read_block(&mut self, index: u64) -> Result<Block, StarError> {
        self.archive.seek(SeekFrom::Start(Self::offset(index)))?;
        let mut buffer = vec![0u8; BLOCK_SIZE];
        self.archive.read_exact(&mut buffer)?;
        Ok(Block::from_bytes(&buffer))
    }

    pub fn write_block(&mut self, index: u64, block: &Block) -> Result<(), StarError> {
        self.archive.seek(SeekFrom::Start(Self::offset(index)))?;
        self.archive.write_all(&block.to_bytes())?;
        Ok(())
    }

    /// Appends `block` at the end of the archive and returns its index.
    pub fn append_block(&mut self, block: &Block) -> Result<u64, StarError> {
        let index = self.block_count()?;
        self.write_block(index, block)?;
        Ok(index)
    }

    /// Marks the block at `index` as free, preserving its `next` and
    /// payload, matching `markRemainingBlocksAsFree`.
    pub fn mark_free(&mut self, index: u64) -> Result<(), StarError> {
        let mut block = self.read_block(index)?;
        block.is_free = true;
        self.write_block(index, &block)
    }

    /// Frees every block in the chain starting at `start`. Block index 0 is
    /// a legitimate chain head (the first file's first block, reached only
    /// via the directory) — only a block's own `next == 0` ends a chain.
    pub fn free_chain(&mut self, start: u64) -> Result<(), StarError> {
        let mut current = start;
        loop {
            let block = self.read_block(current)?;
            self.mark_free(current)?;
            if block.next == 0 {
                break;
            }
            current = block.next;
        }
        Ok(())
    }

    /// Drops free blocks off the tail of the archive, matching
    /// `removeFreeBlocksAtEnd`.
    pub fn truncate_trailing_free(&mut self) -> Result<(), StarError> {
        let mut count = self.block_count()?;
        while count > 0 {
            let block = self.read_block(count - 1)?;
            if !block.is_free {
                break;
            }
            count -= 1;
        }
        let new_len = DIRECTORY_SIZE as u64 + count * BLOCK_SIZE as u64;
        self.archive.set_len(new_len)?;
        Ok(())
    }

    /// Walks the chain starting at `start`, yielding `(index, block)` pairs
    /// lazily — no pointer structure is ever held in memory at once. `start`
    /// is always read, even when it's 0: callers decide whether an entry
    /// owns a chain at all (an empty file owns none) before calling this.
    pub fn walk(&mut self, start: u64) -> ChainWalker<'_, 'a> {
        ChainWalker { allocator: self, next: Some(start) }
    }
}

/// Lazily walks a block chain, stopping once it yields the block whose
/// `next` is zero.
pub struct ChainWalker<'b, 'a> {
    allocator: &'b mut BlockAllocator<'a>,
    next: Option<u64>,
}

impl Iterator for ChainWalker<'_, '_> {
    type Item = Result<(u64, Block), StarError>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        match self.allocator.read_block(index) {
            Ok(block) => {
                self.next = if block.next == 0 { None } else { Some(block.next) };
                Some(Ok((index, block)))
            }
            Err(err) => {
                self.next = None;
                Some(Err(err))
            }
        }
    }
}
