use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(
        "failed to create output directory (path: {path}): {source}",
        path = path.display()
    )]
    OutputDirCreation {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(
        "failed to write bundle file (path: {path}): {source}",
        path = path.display()
    )]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("FHIR error: {0}")]
    Fhir(#[from] fhir::FhirError),
}

pub type GeneratorResult<T> = std::result::Result<T, GeneratorError>;
