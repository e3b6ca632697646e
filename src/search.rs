use crate::content;
use anyhow::{Context, Result};
use exprfind_match::CompiledExpression;
use fswalk::{WalkData, read_names, walk_it};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::{
    borrow::Cow,
    collections::BTreeSet,
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::atomic::Ordering,
    time::Instant,
};
use tracing::info;

/// Where candidate file names come from.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// Walk each root recursively, skipping `exclude` directories.
    Walk {
        roots: Vec<PathBuf>,
        exclude: Vec<PathBuf>,
    },
    /// Read a delimited list of names; `-` means stdin.
    List { path: PathBuf, delimiter: u8 },
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub source: CandidateSource,
    /// Tested against each candidate name.
    pub name: Option<CompiledExpression>,
    /// Tested against each line of each candidate that passed `name`.
    pub content: Option<CompiledExpression>,
    /// Test `name` against the last path component only.
    pub basename: bool,
}

/// Runs a search and returns the surviving names, sorted and deduplicated.
///
/// A candidate survives when it passes every expression present in `config`.
/// Name tests run first so contents are only read for files whose names
/// already passed.
pub fn search(config: &SearchConfig) -> Result<BTreeSet<String>> {
    let candidates = collect_candidates(&config.source)?;
    let search_time = Instant::now();
    let matched: BTreeSet<String> = candidates
        .into_par_iter()
        .filter(|path| match &config.name {
            Some(expr) => expr.matches(&name_subject(path, config.basename)),
            None => true,
        })
        .filter(|path| match &config.content {
            Some(expr) => content::file_matches(path, expr),
            None => true,
        })
        .map(|path| path.to_string_lossy().into_owned())
        .collect();
    info!(
        matched = matched.len(),
        elapsed = ?search_time.elapsed(),
        "search finished"
    );
    Ok(matched)
}

pub fn collect_candidates(source: &CandidateSource) -> Result<Vec<PathBuf>> {
    match source {
        CandidateSource::Walk { roots, exclude } => {
            let walk_data = WalkData::new(exclude.clone());
            let walk_time = Instant::now();
            let mut candidates = Vec::new();
            for root in roots {
                let found = walk_it(root, &walk_data)
                    .with_context(|| format!("Failed to walk {}", root.display()))?;
                candidates.extend(found);
            }
            info!(
                files = walk_data.num_files.load(Ordering::Relaxed),
                dirs = walk_data.num_dirs.load(Ordering::Relaxed),
                elapsed = ?walk_time.elapsed(),
                "walked filesystem"
            );
            Ok(candidates)
        }
        CandidateSource::List { path, delimiter } => {
            let names = if path.as_os_str() == "-" {
                read_names(io::stdin().lock(), *delimiter)
                    .context("Failed to read names from stdin")?
            } else {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open name list {}", path.display()))?;
                read_names(file, *delimiter)
                    .with_context(|| format!("Failed to read name list {}", path.display()))?
            };
            info!(names = names.len(), "read name list");
            Ok(names.into_iter().map(PathBuf::from).collect())
        }
    }
}

fn name_subject(path: &Path, basename: bool) -> Cow<'_, str> {
    if basename {
        if let Some(name) = path.file_name() {
            return name.to_string_lossy();
        }
    }
    path.to_string_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_subject_uses_whole_path_by_default() {
        let path = Path::new("src/bin/main.rs");
        assert_eq!(name_subject(path, false), "src/bin/main.rs");
        assert_eq!(name_subject(path, true), "main.rs");
    }

    #[test]
    fn name_subject_falls_back_without_file_name() {
        assert_eq!(name_subject(Path::new(".."), true), "..");
        assert_eq!(name_subject(Path::new("/"), true), "/");
    }
}
