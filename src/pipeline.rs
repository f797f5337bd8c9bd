//! Orchestrates the conversion pipeline's linear data flow: source text ->
//! cleaned text -> `Module` -> grouped ports -> matched bus interfaces -> XML
//! bytes. This is the glue the CLI calls; none of the six core components
//! know about `Args` or exit codes.

use std::path::{Path, PathBuf};

use crate::cli::{Args, ValidationMode};
use crate::config::ProjectConfig;
use crate::error::Error;
use crate::grouper;
use crate::library;
use crate::matcher::{self, MatcherConfig};
use crate::report::Report;
use crate::serializer;
use crate::sv;

const DEFAULT_CACHE_FILE_NAME: &str = ".sv2ipxact-cache.bin";

/// Runs one end-to-end conversion: parser, library index, grouper, matcher,
/// serializer, in that order.
pub fn run(mut args: Args) -> Result<Report, Error> {
    if let Some(config_path) = ProjectConfig::resolve_path(args.config.as_deref(), &args.input) {
        let cfg = ProjectConfig::load(&config_path)
            .map_err(|e| Error::Custom(format!("failed to read {:?}: {}", config_path, e)))?;
        args.merge_config(&cfg);
    }
    args.init_logger();

    let mut report = Report::new();

    let module = sv::load_module(&args.input, &mut report)?;
    log::debug!(
        "parsed module {:?} with {} port(s), {} parameter(s)",
        module.name,
        module.ports.len(),
        module.parameters.len()
    );

    let library_root = args.library_dir.clone().ok_or_else(|| {
        Error::Custom(
            "no library directory given; pass --library-dir or set it in sv2ipxact.toml"
                .to_string(),
        )
    })?;
    let cache_path = args
        .cache
        .clone()
        .unwrap_or_else(|| library_root.join(DEFAULT_CACHE_FILE_NAME));

    let catalog = library::load(&library_root, &cache_path, args.rebuild, &mut report)?;
    log::debug!("library index carries {} definition(s)", catalog.len());

    let grouping = grouper::group_ports(&module);
    log::debug!(
        "grouped ports into {} candidate group(s), {} residual",
        grouping.groups.len(),
        grouping.residual.len()
    );

    let matcher_config = MatcherConfig {
        threshold: args.threshold.unwrap_or(MatcherConfig::default().threshold),
        ..MatcherConfig::default()
    };
    let outcome = matcher::match_groups(
        &grouping.groups,
        &catalog,
        &module,
        &matcher_config,
        &mut report,
    );

    let mut unmapped = outcome.unmapped.clone();
    unmapped.extend(grouping.residual.clone());

    let revision = args.revision.unwrap_or_default();
    let bytes = serializer::serialize(&module, &outcome.interfaces, &unmapped, revision)?;

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    serializer::write_output_atomically(&output_path, &bytes)?;
    log::debug!("wrote {} byte(s) to {:?}", bytes.len(), output_path);

    log_validation_mode(args.validation, &output_path);

    Ok(report)
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("xml")
}

/// `--validate`/`--validate-local` are parsed and threaded through, but the
/// actual XSD fetch/validate step belongs to an external validator; this
/// pipeline's job ends at noting which mode was requested.
fn log_validation_mode(mode: ValidationMode, output_path: &Path) {
    match mode {
        ValidationMode::Validate | ValidationMode::ValidateLocal => log::info!(
            "{:?} requested for {:?}; schema validation is performed by an external XSD validator",
            mode,
            output_path
        ),
        ValidationMode::NoValidate => {}
    }
}
