use std::{
    fs::OpenOptions,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::model;

/// Reads one symbol per line. Blank lines are ignored.
pub fn read_symbols_from_file(symbols_file_path: &str) -> model::Result<Vec<String>> {
    // Validate symbols file path
    let path = Path::new(symbols_file_path);
    if !path.exists() {
        return Err(model::CollarError::FileNotFound(symbols_file_path.into()));
    }

    let file = OpenOptions::new().read(true).open(path)?;

    let mut symbols = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|_e| model::CollarError::CouldNotReadLine)?;
        if line.trim().is_empty() {
            continue;
        }
        symbols.push(line);
    }
    Ok(symbols)
}

/// Trims and upper-cases symbols, dropping blanks and repeats. First occurrence wins.
pub fn normalize_symbols<I, S>(symbols: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for symbol in symbols {
        let symbol = symbol.as_ref().trim().to_uppercase();
        if symbol.is_empty() || normalized.contains(&symbol) {
            continue;
        }
        normalized.push(symbol);
    }
    normalized
}

/// Merges symbols given directly with those from an optional file.
///
/// Fails with [`model::CollarError::NoSymbols`] when nothing is left to scan.
pub fn collect_symbols(
    symbols: &[String],
    symbols_file_path: Option<&str>,
) -> model::Result<Vec<String>> {
    let mut all = symbols.to_vec();
    if let Some(path) = symbols_file_path {
        all.extend(read_symbols_from_file(path)?);
    }
    let all = normalize_symbols(all);
    if all.is_empty() {
        return Err(model::CollarError::NoSymbols);
    }
    Ok(all)
}
