//! Result file ingestion: loading, key extraction and corpus building

pub mod corpus;
pub mod keys;
pub mod loader;

pub use corpus::{discover_result_files, is_in_subdir, parse_files, Corpus, CorpusBuilder};
pub use keys::{get_argument, get_protocol, get_resolver, get_test, KeyExtractor};
pub use loader::{load_result_file, parse_result_lines, split_command_line};
