/// Errors raised while turning level data into a playable world.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// Tile array length does not match `width * height`.
    InvalidLevelData { expected: usize, actual: usize },
    /// Zero-sized grid or non-positive tile size.
    InvalidDimensions { width: u32, height: u32, tile_size: f32 },
    /// A required entity is absent from the level's entity list.
    MissingEntity(&'static str),
    /// The level file could not be parsed.
    Parse(String),
    /// A session was started with an empty level list.
    NoLevels,
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevelData { expected, actual } => write!(
                f,
                "invalid level data: expected {expected} tiles, got {actual}"
            ),
            Self::InvalidDimensions {
                width,
                height,
                tile_size,
            } => write!(
                f,
                "invalid level dimensions: {width}x{height} tiles of {tile_size}px"
            ),
            Self::MissingEntity(kind) => write!(f, "level has no {kind} entity"),
            Self::Parse(e) => write!(f, "level parse error: {e}"),
            Self::NoLevels => write!(f, "no levels to play"),
        }
    }
}

impl std::error::Error for LevelError {}
