use std::path::PathBuf;

use thiserror::Error;

/// The closed set of failure categories a caller may branch on.
///
/// Each [`WeatherError`] variant belongs to exactly one kind; the
/// human-readable message lives in the variant's `Display` impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Startup configuration is unusable (credentials, config file).
    Config,
    /// Network or API failure.
    Transport,
    /// The API has no data for the requested city.
    NotFound,
    /// The user typed something we cannot act on.
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Could not open {}. Make sure it exists in the program directory.", .path.display())]
    MissingCredentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API key file {} is empty.", .path.display())]
    EmptyCredentials { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Error fetching data. Check city name.")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Error fetching data. Check city name.")]
    UnexpectedResponse { message: String },

    #[error("City not found.")]
    NotFound { city: String },

    #[error("Favorites are full!")]
    FavoritesFull { capacity: usize },

    #[error("Invalid choice.")]
    InvalidIndex { index: usize, len: usize },

    #[error("City name cannot be empty.")]
    EmptyCityName,

    #[error("Invalid choice.")]
    InvalidChoice { input: String },
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::MissingCredentials { .. }
            | WeatherError::EmptyCredentials { .. }
            | WeatherError::Config { .. } => ErrorKind::Config,
            WeatherError::Transport { .. } | WeatherError::UnexpectedResponse { .. } => {
                ErrorKind::Transport
            }
            WeatherError::NotFound { .. } => ErrorKind::NotFound,
            WeatherError::FavoritesFull { .. }
            | WeatherError::InvalidIndex { .. }
            | WeatherError::EmptyCityName
            | WeatherError::InvalidChoice { .. } => ErrorKind::InvalidInput,
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        WeatherError::Config { message: message.into() }
    }

    pub fn not_found<S: Into<String>>(city: S) -> Self {
        WeatherError::NotFound { city: city.into() }
    }

    pub fn invalid_choice<S: Into<String>>(input: S) -> Self {
        WeatherError::InvalidChoice { input: input.into() }
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
