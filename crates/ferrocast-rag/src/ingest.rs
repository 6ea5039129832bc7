//! Corpus loading from plain-text reports and CSV tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ferrocast_core::Document;

use crate::RagError;

/// One document per blank-line separated paragraph.
///
/// Ids are `<file-stem>-<n>` with `n` counting from 1. Metadata carries the
/// file name as `source` and the paragraph number as `paragraph`.
pub fn load_text_report(path: impl AsRef<Path>) -> Result<Vec<Document>, RagError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| RagError::io(path, source))?;
    let stem = file_stem(path);
    let source = file_name(path);

    let mut documents = Vec::new();
    for paragraph in paragraphs(&content) {
        let number = documents.len() + 1;
        let metadata = BTreeMap::from([
            ("source".to_owned(), source.clone()),
            ("paragraph".to_owned(), number.to_string()),
        ]);
        documents.push(Document::with_metadata(
            format!("{stem}-{number}"),
            paragraph,
            metadata,
        )?);
    }

    tracing::debug!(path = %path.display(), documents = documents.len(), "loaded text report");
    Ok(documents)
}

/// One document per CSV row.
///
/// The text is every `column: value` pair joined with `; `. Metadata keeps each
/// column plus `source` and the 1-based `row`. Rows whose cells are all blank
/// are skipped.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Document>, RagError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| RagError::io(path, source))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let headers = reader.headers()?.clone();
    let stem = file_stem(path);
    let source = file_name(path);

    let mut documents = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = index + 1;

        let text = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| format!("{column}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");

        let mut metadata: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_owned(), value.to_owned()))
            .collect();
        metadata.insert("source".to_owned(), source.clone());
        metadata.insert("row".to_owned(), row.to_string());

        documents.push(Document::with_metadata(format!("{stem}-row-{row}"), text, metadata)?);
    }

    tracing::debug!(path = %path.display(), documents = documents.len(), "loaded csv table");
    Ok(documents)
}

/// Every `.txt` and `.csv` file directly inside `dir`, in file-name order.
pub fn load_corpus_dir(dir: impl AsRef<Path>) -> Result<Vec<Document>, RagError> {
    let dir = dir.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| RagError::io(dir, source))? {
        let path = entry.map_err(|source| RagError::io(dir, source))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut documents = Vec::new();
    for path in files {
        match extension(&path).as_deref() {
            Some("txt") => documents.extend(load_text_report(&path)?),
            Some("csv") => documents.extend(load_csv(&path)?),
            _ => tracing::debug!(path = %path.display(), "skipping non-corpus file"),
        }
    }

    tracing::info!(dir = %dir.display(), documents = documents.len(), "loaded corpus");
    Ok(documents)
}

fn paragraphs(content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_owned())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
