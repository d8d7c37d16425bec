use derive_more::From;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
    CliUsage(String),

    /// Non-200 answer from the search engine.
    HttpStatus(u16),

    BodyTooLarge {
        limit: usize,
    },

    #[from]
    SystemTime(std::time::SystemTimeError),

    #[from]
    File(std::io::Error),

    #[from]
    Json(serde_json::Error),

    #[from]
    Reqwest(reqwest::Error),
}

// region:    --- Error Boilerplate

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        match self {
            Self::HttpStatus(code) => {
                write!(fmt, "HTTP request failed with status code: {code}")
            }
            Self::BodyTooLarge { limit } => {
                write!(fmt, "response body exceeds the {limit} bytes limit")
            }
            _ => write!(fmt, "{self:?}"),
        }
    }
}

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate
