use std::fmt;

use thiserror::Error;
use yaml_rust2::EmitError;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("front-matter emit failed: {0}")]
    Yaml(#[from] EmitError),
    #[error("write failed: {0}")]
    Fmt(#[from] fmt::Error),
}
