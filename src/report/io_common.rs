use std::collections::HashSet;

use crate::report::*;

/// The supported export formats.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputProvider {
    Csv,
    Xlsx,
}

impl InputProvider {
    pub fn parse(s: &str) -> RpResult<InputProvider> {
        match s {
            "csv" => Ok(InputProvider::Csv),
            "xlsx" | "msforms" => Ok(InputProvider::Xlsx),
            x => whatever!("Provider not implemented {:?}", x),
        }
    }

    /// The extension used to discover input files.
    pub fn extension(&self) -> &'static str {
        match self {
            InputProvider::Csv => "csv",
            InputProvider::Xlsx => "xlsx",
        }
    }
}

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// The name of a column, as found in the first row of an export.
///
/// Exports sometimes start with a byte order mark. Blank headers get a
/// positional name so that they do not collide.
pub fn header_name(idx: usize, raw: &str) -> String {
    let name = raw.trim_start_matches('\u{feff}').trim();
    if name.is_empty() {
        format!("Column {}", idx + 1)
    } else {
        name.to_string()
    }
}

/// Renames repeated column names to `<name>.1`, `<name>.2`, ... in order of
/// appearance. The first occurrence keeps its name.
pub fn unique_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = names.iter().cloned().collect();
    let mut used: HashSet<String> = HashSet::new();
    let mut res: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if used.insert(name.clone()) {
            res.push(name);
            continue;
        }
        let mut n = 1;
        while seen.contains(&format!("{}.{}", name, n)) {
            n += 1;
        }
        let renamed = format!("{}.{}", name, n);
        debug!("unique_headers: renaming repeated column {:?} to {:?}", name, renamed);
        seen.insert(renamed.clone());
        used.insert(renamed.clone());
        res.push(renamed);
    }
    res
}
