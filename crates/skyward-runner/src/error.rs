use skyward_platformer::LevelError;

/// Errors that stop a headless run before or during setup.
#[derive(Debug)]
pub enum RunnerError {
    /// A level or script file could not be read.
    Io {
        path: String,
        source: std::io::Error,
    },
    /// A level file was read but is not a playable level.
    Level { path: String, source: LevelError },
    /// The input script is malformed.
    Script(String),
    /// The runner configuration is unusable.
    Config(String),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {path}: {source}"),
            Self::Level { path, source } => write!(f, "{path}: {source}"),
            Self::Script(e) => write!(f, "input script error: {e}"),
            Self::Config(e) => write!(f, "invalid runner config: {e}"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Level { source, .. } => Some(source),
            Self::Script(_) | Self::Config(_) => None,
        }
    }
}
