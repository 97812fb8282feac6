//! Corpus building: discovery of result files and grouping by key

use crate::{
    error::{AppError, Result},
    ingest::{keys::KeyExtractor, loader::load_result_file},
    logging::Logger,
    models::{GroupingKey, RecordBatch},
};
use indexmap::IndexMap;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Record batches grouped by key, in the order keys were first seen
pub type Corpus = IndexMap<GroupingKey, Vec<RecordBatch>>;

const RESULT_EXTENSION: &str = "json";

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Whether one of the directories above `path` is named `subdir`
pub fn is_in_subdir(path: &Path, subdir: &str) -> bool {
    path.parent()
        .map(|parent| {
            parent
                .components()
                .any(|component| component == Component::Normal(OsStr::new(subdir)))
        })
        .unwrap_or(false)
}

/// All `*.json` files below `root` that sit under a `subdir` directory
///
/// Files come back sorted by their full path string, so `a-b/x.json` sorts
/// before `a/x.json`. Hidden files and directories are skipped.
pub fn discover_result_files(root: &Path, subdir: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(AppError::io(format!(
            "Input directory {} does not exist or is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension() == Some(OsStr::new(RESULT_EXTENSION)) && is_in_subdir(path, subdir) {
            files.push(path.to_path_buf());
        }
    }
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(files)
}

/// Builds a [`Corpus`] from one or more input roots
pub struct CorpusBuilder {
    subdir: String,
    extractor: KeyExtractor,
    logger: Logger,
}

impl CorpusBuilder {
    pub fn new(subdir: impl Into<String>, extractor: KeyExtractor, logger: &Logger) -> Self {
        Self {
            subdir: subdir.into(),
            extractor,
            logger: logger.named("CORPUS"),
        }
    }

    /// Walk every root in argument order and group all matching files
    pub fn build(&self, roots: &[PathBuf]) -> Result<Corpus> {
        let mut corpus = Corpus::new();
        let mut file_count = 0usize;

        for root in roots {
            let files = discover_result_files(root, &self.subdir)?;
            self.logger.info(&format!("Discovered {} result files", files.len()))
                .field("root", root.display().to_string())
                .field("subdir", &self.subdir)
                .log();

            for path in files {
                self.add_file(&mut corpus, &path)?;
                file_count += 1;
            }
        }

        self.logger.info("Corpus built")
            .field("files", file_count)
            .field("keys", corpus.len())
            .log();

        Ok(corpus)
    }

    /// Load one file and append its batch under its key
    pub fn add_file(&self, corpus: &mut Corpus, path: &Path) -> Result<GroupingKey> {
        let batch = load_result_file(path)?;
        let key = self.extractor.extract(path, &batch.invocation)?;

        self.logger.debug("Loaded result file")
            .field("path", path.display().to_string())
            .field("key", key.to_string())
            .field("rows", batch.len())
            .log();

        corpus.entry(key.clone()).or_default().push(batch);
        Ok(key)
    }
}

/// Build a corpus without resolver keys
pub fn parse_files(roots: &[PathBuf], subdir: &str, logger: &Logger) -> Result<Corpus> {
    CorpusBuilder::new(subdir, KeyExtractor::default(), logger).build(roots)
}
