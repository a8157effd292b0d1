use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Settings write error: {0}")]
    SettingsWrite(#[from] toml::ser::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("Window error: {0}")]
    Window(String),

    #[error("Could not open {path}: {message}")]
    Open { path: String, message: String },
}

impl From<eframe::Error> for Error {
    fn from(value: eframe::Error) -> Self {
        Error::Window(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
