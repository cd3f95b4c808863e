use suite::SuiteError;

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Suite(#[from] SuiteError),
    #[error("unknown selection: {0}")]
    UnknownSelection(String),
    #[error("selection task failed: {0}")]
    Task(String),
}
