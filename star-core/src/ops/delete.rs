//! `delete`: frees a file's blocks and removes it from the directory.
//!
//! The original archiver only ever walked the matching entries without
//! freeing their blocks or clearing the slot — a no-op bug. This frees the
//! chain, clears the slot, and compacts the directory so the "first empty
//! slot ends enumeration" invariant survives the removal.

use std::fs::File;
use std::path::Path;

use crate::blocks::BlockAllocator;
use crate::directory::{basename, Directory};
use crate::error::StarError;
use crate::logging::Logger;

pub fn delete(archive_path: &Path, names: &[String], logger: &dyn Logger) -> Result<(), StarError> {
    logger.verbose(&format!("starting to delete archives inside {}", archive_path.display()));

    let mut archive = File::options().read(true).write(true).open(archive_path)?;
    let mut directory = Directory::load(&mut archive)?;

    for raw_name in names {
        let name = basename(raw_name);
        match directory.find(name) {
            Some(index) => {
                let entry = directory.entry(index).clone();
                // A zero-byte entry owns no blocks — its `block_address` is
                // only ever a placeholder and may alias another file's
                // first block (index 0 included), so it must never be freed.
                if entry.size > 0 {
                    BlockAllocator::new(&mut archive).free_chain(entry.block_address)?;
                }
                directory.clear_entry(index);
                logger.verbose(&format!("deleted {name} from archive"));
            }
            None => {
                logger.error(&format!("file not in archive... continuing... ({name})"));
            }
        }
    }

    BlockAllocator::new(&mut archive).truncate_trailing_free()?;
    directory.store(&mut archive)?;

    Ok(())
}
