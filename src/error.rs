use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for tileset loading, saving and creation.
#[derive(Debug)]
pub enum TilesetError {
    /// An empty filename was passed to load or create
    InvalidFilename(String),
    /// Definition or image file could not be opened
    FileOpen {
        /// File that failed to open
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },
    /// Definition file is not valid script text
    Script {
        /// Definition file
        path: PathBuf,
        /// 1-based line of the first syntax error
        line: usize,
        /// What the parser expected
        message: String,
    },
    /// A required table or field is missing or malformed
    Schema(String),
    /// The source image could not be decoded
    ImageDecode {
        /// Image that failed to decode
        path: PathBuf,
        /// Decoder failure
        source: image::ImageError,
    },
    /// A new tileset would overwrite an existing definition file
    AlreadyExists(PathBuf),
    /// Writing the definition file produced one or more errors
    Write {
        /// Definition file being written
        path: PathBuf,
        /// Every error recorded during the write
        messages: Vec<String>,
    },
    /// Save was attempted on a tileset that was never loaded or created
    NotInitialized,
    /// A tile index outside the tileset
    InvalidTileIndex {
        /// Offending index
        index: u32,
        /// Exclusive upper bound
        limit: usize,
    },
    /// An animation must contain at least one frame
    EmptyAnimation,
}

/// Result alias used throughout the crate.
pub type Result<T, E = TilesetError> = std::result::Result<T, E>;

impl fmt::Display for TilesetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilesetError::InvalidFilename(what) => write!(f, "Empty {} filename", what),
            TilesetError::FileOpen { path, source } => {
                write!(f, "Failed to open {}: {}", path.display(), source)
            }
            TilesetError::Script {
                path,
                line,
                message,
            } => write!(f, "Script error in {} at line {}: {}", path.display(), line, message),
            TilesetError::Schema(msg) => write!(f, "Invalid tileset definition: {}", msg),
            TilesetError::ImageDecode { path, source } => {
                write!(f, "Failed to load tileset image {}: {}", path.display(), source)
            }
            TilesetError::AlreadyExists(path) => write!(
                f,
                "Failed to create tileset, it already exists: {}",
                path.display()
            ),
            TilesetError::Write { path, messages } => write!(
                f,
                "Errors were detected when saving tileset file {}:\n{}",
                path.display(),
                messages.join("\n")
            ),
            TilesetError::NotInitialized => write!(f, "Tileset holds no loaded data"),
            TilesetError::InvalidTileIndex { index, limit } => {
                write!(f, "Tile index {} out of range (limit {})", index, limit)
            }
            TilesetError::EmptyAnimation => write!(f, "Animated tile has no frames"),
        }
    }
}

impl std::error::Error for TilesetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TilesetError::FileOpen { source, .. } => Some(source),
            TilesetError::ImageDecode { source, .. } => Some(source),
            _ => None,
        }
    }
}
