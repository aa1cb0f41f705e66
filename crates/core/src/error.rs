use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error with sub process: {}", _0)]
    SubProcess(#[from] std::io::Error),

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Required environment file at `{}` could not be read: {}", .path, .original)]
    PrimaryEnvFile {
        path: String,
        original: std::io::Error,
    },

    #[error("Missing required dependency: `{}` was not found", .0)]
    MissingDependency(String),

    #[error("STDIO error: {}", .0)]
    Stdio(std::io::Error),

    #[error("Misc error: {}", .0)]
    Misc(String),
}

impl Error {
    pub fn io_error(file_description: &str, path: &str, original: std::io::Error) -> Self {
        Self::Io {
            file_description: file_description.to_string(),
            path: path.to_string(),
            original,
        }
    }

    pub fn primary_env_file(path: &str, original: std::io::Error) -> Self {
        Self::PrimaryEnvFile {
            path: path.to_string(),
            original,
        }
    }
}
