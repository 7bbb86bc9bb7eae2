use std::fmt;

#[derive(Debug)]
pub enum Error {
    Config(String),
    Yaml(serde_yaml::Error),
    UnsupportedFormat(String),
    Builder(String),
    Zip(zip::result::ZipError),
    Pdf(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(reason) => write!(f, "invalid configuration: {reason}"),
            Error::Yaml(e) => write!(f, "YAML error: {e}"),
            Error::UnsupportedFormat(ext) => {
                write!(f, "unsupported output format '{ext}' (expected .docx or .pdf)")
            }
            Error::Builder(e) => write!(f, "document builder error: {e}"),
            Error::Zip(e) => write!(f, "ZIP error: {e}"),
            Error::Pdf(e) => write!(f, "PDF error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Yaml(e) => Some(e),
            Error::Zip(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Yaml(e)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Zip(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
