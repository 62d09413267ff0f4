use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error loading workbook: {0}")]
    Workbook(String),

    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("{0} column not found in sheet")]
    MissingColumn(String),

    #[error("Unknown month: {0}")]
    UnknownMonth(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl From<calamine::Error> for SalesError {
    fn from(e: calamine::Error) -> Self {
        SalesError::Workbook(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SalesError>;
