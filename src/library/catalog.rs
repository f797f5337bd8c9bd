//! Library Index: walks a library root of IP-XACT XML files into
//! an in-memory `Catalog`, with on-disk caching validated by library-tree
//! modification time. Grounded on `orbit`'s own catalog-building pattern
//! (`core::catalog::Catalog`) and its `tempfile`-backed atomic cache writes.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use indexmap::IndexMap;
use serde_derive::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::Error;
use crate::model::{AbstractionDefinition, BusDefinition, Vlnv};
use crate::report::{Diagnostic, Report};

use super::xml::{self, ParsedDefinition};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    bus_definitions: IndexMap<Vlnv, BusDefinition>,
    abstraction_definitions: IndexMap<Vlnv, AbstractionDefinition>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.bus_definitions.len() + self.abstraction_definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bus_definitions(&self) -> impl Iterator<Item = &BusDefinition> {
        self.bus_definitions.values()
    }

    pub fn abstraction_definitions(&self) -> impl Iterator<Item = &AbstractionDefinition> {
        self.abstraction_definitions.values()
    }

    pub fn find_bus(&self, vlnv: &Vlnv) -> Option<&BusDefinition> {
        self.bus_definitions.get(vlnv)
    }

    /// Every abstraction definition together with its resolved bus
    /// definition; an abstraction whose `busType` reference dangles is
    /// skipped (the matcher can't score a bus it can't see properties of).
    pub fn abstractions_with_bus(&self) -> impl Iterator<Item = (&AbstractionDefinition, &BusDefinition)> {
        self.abstraction_definitions
            .values()
            .filter_map(move |abs| self.find_bus(&abs.bus_type).map(|bus| (abs, bus)))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheBlob {
    max_mtime_secs: u64,
    catalog: Catalog,
}

/// Loads the library index: reuse the cache if
/// its recorded mtime is at least as new as the tree's current max mtime and
/// a rebuild wasn't requested; otherwise walk the tree and rebuild.
pub fn load(
    library_root: &Path,
    cache_path: &Path,
    rebuild: bool,
    report: &mut Report,
) -> Result<Catalog, Error> {
    let max_mtime = max_tree_mtime(library_root);

    if !rebuild {
        if let Some(blob) = try_read_cache(cache_path) {
            if let Some(observed) = max_mtime {
                if blob.max_mtime_secs >= observed {
                    return Ok(blob.catalog);
                }
            }
        }
    }

    if !library_root.exists() {
        report.push(Diagnostic::LibraryIoError {
            path: library_root.display().to_string(),
            reason: "library directory does not exist; matcher will return every port unmatched"
                .to_string(),
        });
        return Ok(Catalog::default());
    }

    let catalog = build_from_tree(library_root, report);

    if let Some(observed) = max_mtime {
        let blob = CacheBlob {
            max_mtime_secs: observed,
            catalog: catalog.clone(),
        };
        if let Err(e) = write_cache_atomically(cache_path, &blob) {
            report.push(Diagnostic::LibraryIoError {
                path: cache_path.display().to_string(),
                reason: format!("failed to write cache: {}", e),
            });
        }
    }

    if catalog.is_empty() {
        report.push(Diagnostic::LibraryIoError {
            path: library_root.display().to_string(),
            reason: "0 bus/abstraction definitions loaded; check --library-dir".to_string(),
        });
    }

    Ok(catalog)
}

fn build_from_tree(library_root: &Path, report: &mut Report) -> Catalog {
    let mut bus_definitions = IndexMap::new();
    let mut abstraction_definitions = IndexMap::new();

    for entry in WalkDir::new(library_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map(|x| x == "xml").unwrap_or(false))
    {
        let path = entry.path();
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                report.push(Diagnostic::LibraryParseWarning {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        match xml::parse_file(&contents) {
            Ok(ParsedDefinition::Bus(def)) => {
                bus_definitions.insert(def.vlnv.clone(), def);
            }
            Ok(ParsedDefinition::Abstraction(def)) => {
                abstraction_definitions.insert(def.vlnv.clone(), def);
            }
            Ok(ParsedDefinition::Other) => {}
            Err(reason) => report.push(Diagnostic::LibraryParseWarning {
                path: path.display().to_string(),
                reason,
            }),
        }
    }

    bus_definitions.sort_keys();
    abstraction_definitions.sort_keys();

    Catalog {
        bus_definitions,
        abstraction_definitions,
    }
}

fn max_tree_mtime(root: &Path) -> Option<u64> {
    if !root.exists() {
        return None;
    }
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .filter_map(|m| m.modified().ok())
        .filter_map(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .max()
}

fn try_read_cache(cache_path: &Path) -> Option<CacheBlob> {
    let bytes = std::fs::read(cache_path).ok()?;
    let (blob, _) = bincode::serde::decode_from_slice::<CacheBlob, _>(
        &bytes,
        bincode::config::standard(),
    )
    .ok()?;
    Some(blob)
}

fn write_cache_atomically(cache_path: &Path, blob: &CacheBlob) -> Result<(), std::io::Error> {
    let dir = cache_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let bytes = bincode::serde::encode_to_vec(blob, bincode::config::standard())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    use std::io::Write;
    tmp.write_all(&bytes)?;
    tmp.persist(cache_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    Ok(())
}
