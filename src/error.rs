use std::fmt::Display;
use tokio::task::JoinError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    DirectoryName,
    Io(std::io::Error),
    Join(JoinError),
    Extraction(rusty_ytdl::VideoError),
    TomlDeserialization(toml::de::Error),
    EmptyPlaylist(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DirectoryName => write!(f, "Error generating application directory for your host system. See README.md for more information about application directories."),
            Error::Io(e) => write!(f, "Standard io error <{e}>"),
            Error::Join(e) => write!(f, "Join error <{e}>"),
            Error::Extraction(e) => write!(f, "Extraction error <{e}>"),
            Error::TomlDeserialization(e) => write!(f, "Toml deserialization error:\n{e}"),
            Error::EmptyPlaylist(name) => write!(f, "Playlist \"{name}\" contains no videos"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}
impl From<JoinError> for Error {
    fn from(value: JoinError) -> Self {
        Error::Join(value)
    }
}
impl From<rusty_ytdl::VideoError> for Error {
    fn from(value: rusty_ytdl::VideoError) -> Self {
        Error::Extraction(value)
    }
}
impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::TomlDeserialization(value)
    }
}
