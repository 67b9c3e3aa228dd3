use std::{io, path::PathBuf};

use bin2uf2_core::{uf2::Uf2ParseError, Bin2Uf2Error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file {}", .path.display())]
    FailedToReadInput { path: PathBuf, source: io::Error },
    #[error("Failed to create output file {}", .path.display())]
    FailedToCreateOutput { path: PathBuf, source: io::Error },
    #[error("Failed to write output file {}", .path.display())]
    FailedToWriteOutput { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Encode(#[from] Bin2Uf2Error),
    #[error("{} is not a valid UF2 file", .path.display())]
    InvalidUf2 {
        path: PathBuf,
        source: Uf2ParseError,
    },
}
