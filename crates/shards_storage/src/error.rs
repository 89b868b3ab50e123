use crate::BlockIdRange;

use thiserror::Error;

/// Everything that can go wrong while configuring, reading or writing block storage.
///
/// Absent blocks are not errors; they read as all-zero (empty) blocks.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("block resolution {0} is not a positive power of two")]
    InvalidBlockResolution(i32),
    #[error("border size {0} must not be negative")]
    InvalidBorderSize(i32),
    #[error("block id range {0:?} must hold between 1 and i32::MAX blocks")]
    InvalidBlockIdRange(BlockIdRange),
    #[error("buffer holds {actual} samples but level {level} of layer `{layer}` needs {expected}")]
    BufferSizeMismatch {
        layer: String,
        level: u8,
        expected: usize,
        actual: usize,
    },
    #[error("no layer named `{0}`")]
    UnknownLayer(String),
    #[error("layer `{0}` already exists")]
    DuplicateLayer(String),
    #[error("level {level} is out of range; the volume has {num_levels} levels")]
    LevelOutOfRange { level: u8, num_levels: u8 },
    #[error("corrupt block: {0}")]
    CorruptBlock(String),
    #[error("database has no `{0}` metadata; it was not created as a block database")]
    MissingMetadata(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[cfg(feature = "sled")]
    #[error(transparent)]
    Serialization(#[from] bincode::Error),
    #[cfg(feature = "sled")]
    #[error(transparent)]
    Database(#[from] sled::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn fails() -> Result<()> {
            Err::<(), _>(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"))?;
            Ok(())
        }

        assert!(matches!(fails(), Err(StorageError::Io(_))));
    }

    /// Without a database there is nothing to serialize, so every variant is one of these.
    #[cfg(not(feature = "sled"))]
    #[test]
    fn in_memory_errors_need_no_database_variants() {
        fn describe(error: &StorageError) -> &'static str {
            match error {
                StorageError::InvalidBlockResolution(_)
                | StorageError::InvalidBorderSize(_)
                | StorageError::InvalidBlockIdRange(_)
                | StorageError::BufferSizeMismatch { .. }
                | StorageError::UnknownLayer(_)
                | StorageError::DuplicateLayer(_)
                | StorageError::LevelOutOfRange { .. } => "configuration",
                StorageError::CorruptBlock(_) | StorageError::MissingMetadata(_) => "data",
                StorageError::Io(_) => "io",
            }
        }

        assert_eq!(describe(&StorageError::UnknownLayer("a".into())), "configuration");
    }
}
