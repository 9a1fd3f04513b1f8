//! `list`: enumerates the basenames stored in an archive's directory.

use std::fs::File;
use std::path::Path;

use crate::directory::Directory;
use crate::error::StarError;
use crate::logging::Logger;

pub fn list(archive_path: &Path, logger: &dyn Logger) -> Result<Vec<String>, StarError> {
    let mut archive = File::open(archive_path)?;
    let directory = Directory::load(&mut archive)?;

    let names: Vec<String> = directory.active_entries().map(|entry| entry.filename.clone()).collect();
    for name in &names {
        logger.verbose(&format!("this is a file present: {name}"));
    }

    Ok(names)
}
