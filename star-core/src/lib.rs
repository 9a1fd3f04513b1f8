//! Engine for `star`, a FAT-layout single-file archiver: a fixed directory
//! at the head of the archive followed by a body of fixed-size blocks
//! chained per file, in the spirit of a FAT filesystem rather than
//! streaming POSIX tar.

pub mod blocks;
pub mod directory;
pub mod error;
pub mod format;
pub mod logging;
pub mod octal;
pub mod ops;

pub use error::StarError;
pub use format::{DirectoryEntry, MAX_FILES};
pub use logging::{ConsoleLogger, LogLevel, Logger, NullLogger};

pub use ops::append::append;
pub use ops::create::create;
pub use ops::delete::delete;
pub use ops::extract::extract;
pub use ops::list::list;
pub use ops::pack::pack;
pub use ops::update::update;
