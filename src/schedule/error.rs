use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Candidates existed but none answered a load query.
    #[error("no filesystem node")]
    NoHost,

    /// No copy of the section was ever registered.
    #[error("no replica of section {section} of {file}")]
    NoReplica { file: String, section: String },

    #[error("program {0} is not registered")]
    ProgramNotRegistered(String),

    #[error("{0} is not an executable")]
    ProgramNotExecutable(String),

    #[error("no binary is registered as {0}")]
    NoBinaryRegistered(String),

    #[error("there is no host which can run {0}")]
    NoCompatibleHost(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("directory error: {0}")]
    Directory(#[from] anyhow::Error),
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
