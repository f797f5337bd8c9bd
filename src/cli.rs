//! Command-line surface for sv2ipxact.
//!
//! This is the ambient surface a complete tool needs even though it sits
//! outside the core conversion pipeline: argument parsing (`cliproc`, the
//! same crate/idiom `orbit`'s own subcommands use), a project-level config
//! file merge, and mapping the parsed arguments into a `pipeline::run` call.

use std::path::PathBuf;

use cliproc::{Cli, Error as CliError, FromCli};
use cliproc::arg::{Flag, Optional, Positional};
use colored::Colorize;

use crate::config::ProjectConfig;
use crate::serializer::revision::Revision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Validate,
    ValidateLocal,
    NoValidate,
}

impl Default for ValidationMode {
    fn default() -> Self {
        ValidationMode::NoValidate
    }
}

#[derive(Debug, PartialEq)]
pub struct Args {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub rebuild: bool,
    pub library_dir: Option<PathBuf>,
    pub cache: Option<PathBuf>,
    pub threshold: Option<f32>,
    pub revision: Option<Revision>,
    pub validation: ValidationMode,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

impl FromCli for Args {
    fn from_cli<'c>(cli: &'c mut Cli) -> Result<Self, CliError<'c>> {
        cli.set_help(HELP);
        let rev2009 = cli.check_flag(Flag::new("ipxact-2009"))?;
        let rev2014 = cli.check_flag(Flag::new("ipxact-2014"))?;
        let rev2022 = cli.check_flag(Flag::new("ipxact-2022"))?;
        let validate = cli.check_flag(Flag::new("validate"))?;
        let validate_local = cli.check_flag(Flag::new("validate-local"))?;
        let no_validate = cli.check_flag(Flag::new("no-validate"))?;

        let revision = match (rev2009, rev2014, rev2022) {
            (true, false, false) => Some(Revision::V2009),
            (false, true, false) => Some(Revision::V2014),
            (false, false, true) => Some(Revision::V2022),
            (false, false, false) => None,
            _ => {
                return Err(CliError::BrokenRule(
                    "only one of --ipxact-2009, --ipxact-2014, --ipxact-2022 may be given"
                        .to_string(),
                ))
            }
        };

        let validation = match (validate, validate_local, no_validate) {
            (true, false, false) => ValidationMode::Validate,
            (false, true, false) => ValidationMode::ValidateLocal,
            (false, false, true) => ValidationMode::NoValidate,
            (false, false, false) => ValidationMode::NoValidate,
            _ => {
                return Err(CliError::BrokenRule(
                    "only one of --validate, --validate-local, --no-validate may be given"
                        .to_string(),
                ))
            }
        };

        Ok(Args {
            rebuild: cli.check_flag(Flag::new("rebuild"))?,
            verbose: cli.check_flag(Flag::new("verbose"))?,
            output: cli.check_option(Optional::new("output").value("path"))?,
            library_dir: cli.check_option(Optional::new("library-dir").value("path"))?,
            cache: cli.check_option(Optional::new("cache").value("path"))?,
            threshold: cli.check_option(Optional::new("threshold").value("f32"))?,
            config: cli.check_option(Optional::new("config").value("path"))?,
            input: cli.require_positional(Positional::new("input"))?,
            revision,
            validation,
        })
    }
}

impl Args {
    /// Merges config-file defaults under CLI flags: CLI flags always
    /// override config file values.
    pub fn merge_config(&mut self, cfg: &ProjectConfig) {
        if self.library_dir.is_none() {
            self.library_dir = cfg.library_dir.clone();
        }
        if self.cache.is_none() {
            self.cache = cfg.cache.clone();
        }
        if self.threshold.is_none() {
            self.threshold = cfg.threshold;
        }
        if self.revision.is_none() {
            self.revision = cfg.revision;
        }
    }

    pub fn init_logger(&self) {
        let level = if self.verbose { "debug" } else { "warn" };
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(level),
        )
        .format_timestamp(None)
        .try_init();
    }
}

pub fn print_cli_error(err: &CliError) {
    eprintln!("{}: {}", "error".red().bold(), err);
}

const HELP: &str = "\
sv2ipxact converts a SystemVerilog top-level module into an IP-XACT component

Usage:
    sv2ipxact [options] <input>

Args:
    <input>                     path to a SystemVerilog source file

Options:
    --output <path>             destination for the generated IP-XACT document
    --rebuild                   force the library index to rebuild from disk
    --library-dir <path>        root of the bus/abstraction definition tree
    --cache <path>              path to the library index cache file
    --threshold <f32>           minimum acceptance score for a bus match [default: 0.6]
    --ipxact-2009                emit the spirit: (2009) revision
    --ipxact-2014                emit the ipxact: (2014) revision [default]
    --ipxact-2022                emit the ipxact: (2022) revision
    --validate                   validate output against the upstream XSD
    --validate-local              validate output against a locally cached XSD
    --no-validate                 skip schema validation [default]
    --config <path>              project configuration file (default: sv2ipxact.toml)
    --verbose                    print the run report and debug logging

Use 'sv2ipxact --help' to see this again.
";
