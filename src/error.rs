//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use std::fmt::Display;
use std::path::PathBuf;

use colored::Colorize;

/// Fatal conditions that abort the run with a non-zero exit status.
///
/// Non-fatal conditions (spec kinds `PreprocessorError`, `MalformedPort`,
/// `MalformedParameter`, `LibraryIoError`, `LibraryParseWarning`, `NoMatch`,
/// `AmbiguousMatch`) never appear here; they are accumulated into a
/// [`crate::report::Report`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read source file {0:?}: {1}")]
    SourceIoError(PathBuf, LastError),
    #[error("no top-level module found in {0:?}{1}")]
    NoModuleFound(PathBuf, Hint),
    #[error("failed to write output to {0:?}: {1}")]
    OutputIoError(PathBuf, LastError),
    #[error("{0}")]
    Custom(String),
}

/// Wraps the `Display` text of an underlying `std::error::Error` so it can be
/// embedded in a `thiserror` message without forcing a trait object lifetime.
#[derive(Debug)]
pub struct LastError(pub String);

impl Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<E: std::error::Error> From<E> for LastError {
    fn from(value: E) -> Self {
        LastError(value.to_string())
    }
}

#[derive(Debug)]
pub enum Hint {
    None,
    CheckModuleKeyword,
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::None => return Ok(()),
            Self::CheckModuleKeyword => {
                "verify the file contains a `module ... endmodule` declaration"
            }
        };
        write!(f, "\n\n{}: {}", "hint".green(), message)
    }
}

impl Error {
    /// Maps a fatal error to the process's exit code.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::SourceIoError(..)
            | Error::NoModuleFound(..)
            | Error::OutputIoError(..)
            | Error::Custom(_) => 1,
        }
    }
}
