//! SystemVerilog front end: lexical preprocessing and header parsing.
//! Produces a single `model::Module` from one source file.

pub mod parser;
pub mod preprocessor;

use std::path::Path;

use crate::error::Error;
use crate::model::Module;
use crate::report::Report;

/// Runs the preprocessor then the header parser over `path`'s contents.
pub fn load_module(path: &Path, report: &mut Report) -> Result<Module, Error> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::SourceIoError(path.to_path_buf(), e.into()))?;
    let (cleaned, diags) = preprocessor::preprocess(&text);
    for d in diags {
        report.push(crate::report::Diagnostic::PreprocessorError {
            line: d.line,
            message: d.message,
        });
    }
    parser::parse_module(&cleaned, path, report)
}
