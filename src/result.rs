extern crate image;
extern crate reqwest;
extern crate serde_json;
extern crate std;

pub type MetroDashResult<T> = std::result::Result<T, MetroDashError>;

#[derive(Debug)]
pub enum MetroDashError {
    HttpError(reqwest::Error),
    // The server answered 2xx but the body couldn't be read.
    HttpBody(reqwest::Error),
    HttpStatus(u16),
    ImageError(image::ImageError),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    Message(String),
}

/// How the poll loop should treat a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Transport,
    Parse,
    Other,
}

impl MetroDashError {
    pub fn kind(&self) -> FetchErrorKind {
        match *self {
            MetroDashError::HttpError(_) => FetchErrorKind::Transport,
            MetroDashError::HttpBody(_) => FetchErrorKind::Transport,
            MetroDashError::HttpStatus(_) => FetchErrorKind::Transport,
            MetroDashError::IoError(_) => FetchErrorKind::Transport,
            MetroDashError::JsonError(_) => FetchErrorKind::Parse,
            MetroDashError::ImageError(_) => FetchErrorKind::Other,
            MetroDashError::Message(_) => FetchErrorKind::Other,
        }
    }

    /// True when a response came back from the server, whatever was in it.
    pub fn server_answered(&self) -> bool {
        match *self {
            MetroDashError::HttpBody(_) | MetroDashError::HttpStatus(_) => return true,
            _ => return false,
        }
    }
}

pub fn make_error(message: &str) -> MetroDashError {
    return MetroDashError::Message(message.to_string());
}

impl std::fmt::Display for MetroDashError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            MetroDashError::HttpError(ref err) => {
                return write!(f, "HTTP Error: {}", err);
            },
            MetroDashError::HttpBody(ref err) => {
                return write!(f, "HTTP Body Error: {}", err);
            },
            MetroDashError::HttpStatus(status) => {
                return write!(f, "HTTP Status: {}", status);
            },
            MetroDashError::ImageError(ref err) => {
                return write!(f, "Image Error: {}", err);
            },
            MetroDashError::IoError(ref err) => {
                return write!(f, "IO Error: {}", err);
            },
            MetroDashError::JsonError(ref err) => {
                return write!(f, "JSON Error: {}", err);
            },
            MetroDashError::Message(ref message) => {
                return write!(f, "Error: {}", message);
            },
        }
    }
}

impl std::error::Error for MetroDashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            MetroDashError::HttpError(ref err) => Some(err),
            MetroDashError::HttpBody(ref err) => Some(err),
            MetroDashError::ImageError(ref err) => Some(err),
            MetroDashError::IoError(ref err) => Some(err),
            MetroDashError::JsonError(ref err) => Some(err),
            MetroDashError::HttpStatus(_) => None,
            MetroDashError::Message(_) => None,
        }
    }
}

impl From<reqwest::Error> for MetroDashError {
    fn from(err: reqwest::Error) -> MetroDashError {
        return MetroDashError::HttpError(err);
    }
}

impl From<image::ImageError> for MetroDashError {
    fn from(err: image::ImageError) -> MetroDashError {
        return MetroDashError::ImageError(err);
    }
}

impl From<std::io::Error> for MetroDashError {
    fn from(err: std::io::Error) -> MetroDashError {
        return MetroDashError::IoError(err);
    }
}

impl From<serde_json::Error> for MetroDashError {
    fn from(err: serde_json::Error) -> MetroDashError {
        return MetroDashError::JsonError(err);
    }
}
