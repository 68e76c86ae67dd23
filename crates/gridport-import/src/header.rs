//! Header resolution: raw header row -> destination schema + column bindings.
//!
//! Each mode is a `match` arm over [`HeaderMode`]; resolution runs once per
//! read and its output is immutable afterwards. Name mismatches under the
//! explicit index modes are diagnostics, not failures; structural problems
//! (out-of-bounds indices, missing columns) abort the read.

use std::collections::HashMap;

use gridport_core::{letters_to_index, Column, ColumnType, Error, ImportLog, Result, Schema};

use crate::settings::{HeaderMode, ImportSettings};

/// One (source column -> destination column) binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBinding {
    /// 0-based column index in the source sheet
    pub source: usize,
    /// 0-based column index in the destination schema
    pub dest: usize,
}

impl ColumnBinding {
    pub fn new(source: usize, dest: usize) -> Self {
        Self { source, dest }
    }
}

/// The result of resolving a header row
#[derive(Debug, Clone)]
pub struct HeaderResolution {
    pub schema: Schema,
    pub bindings: Vec<ColumnBinding>,
}

/// Resolve the header row into a schema and bindings.
///
/// `header` holds the full header row as display text, indexed by absolute
/// source column; for headerless sheets the reader passes blank text of the
/// sheet's width so the window modes still see its extent.
pub fn resolve(
    header: &[String],
    settings: &ImportSettings,
    log: &mut ImportLog,
) -> Result<HeaderResolution> {
    match &settings.mode {
        HeaderMode::None => resolve_window(header, settings, log),
        HeaderMode::IndexList(list) => resolve_index_list(header, list, settings, log),
        HeaderMode::StartIndex(start) => {
            resolve_start_index(header, start.resolve()?, settings, log)
        }
        HeaderMode::ByName => resolve_by_name(header, settings, log),
        HeaderMode::Dispersed => resolve_dispersed(header, settings, log),
    }
}

fn resolve_window(
    header: &[String],
    settings: &ImportSettings,
    _log: &mut ImportLog,
) -> Result<HeaderResolution> {
    let start = settings.start_column;
    let available = header.len().saturating_sub(start);
    let take = match settings.column_count {
        Some(count) => count.min(available),
        None => available,
    };

    let prefix = settings.effective_prefix();
    let mut sources = Vec::new();
    let mut names = Vec::new();
    for offset in 0..take {
        let source = start + offset;
        let text = header[source].trim();
        if text.is_empty() {
            if settings.ignore_blank_headers {
                continue;
            }
            names.push(format!("{}{}", prefix, source + 1));
        } else {
            names.push(text.to_string());
        }
        sources.push(source);
    }

    if sources.is_empty() {
        return Err(Error::EmptyFile(
            "header row has no usable columns".to_string(),
        ));
    }

    let names = uniquify(names);
    let names = apply_renames(names, &sources, settings);
    let names = uniquify(names);

    // A pre-built schema of matching width contributes types; names always
    // come from the header.
    let typed = settings
        .schema
        .as_ref()
        .filter(|s| s.len() == names.len());
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let ty = typed
                .and_then(|s| s.column(i))
                .map(|c| c.ty)
                .unwrap_or(ColumnType::Any);
            Column::new(name, ty)
        })
        .collect();

    Ok(HeaderResolution {
        schema: Schema::from_columns(columns),
        bindings: sources
            .into_iter()
            .enumerate()
            .map(|(dest, source)| ColumnBinding::new(source, dest))
            .collect(),
    })
}

fn resolve_index_list(
    header: &[String],
    list: &[usize],
    settings: &ImportSettings,
    log: &mut ImportLog,
) -> Result<HeaderResolution> {
    let schema = required_schema(settings)?;
    if schema.len() > list.len() {
        return Err(Error::parse(format!(
            "destination schema has {} columns but the index list only has {}",
            schema.len(),
            list.len()
        )));
    }

    let mut bindings = Vec::with_capacity(schema.len());
    for (dest, column) in schema.columns().iter().enumerate() {
        let source = list[dest];
        check_bounds(source, header.len())?;
        if settings.has_header {
            log_name_mismatch(header, source, &column.name, settings, log);
        }
        bindings.push(ColumnBinding::new(source, dest));
    }

    Ok(HeaderResolution {
        schema: schema.clone(),
        bindings,
    })
}

fn resolve_start_index(
    header: &[String],
    start: usize,
    settings: &ImportSettings,
    log: &mut ImportLog,
) -> Result<HeaderResolution> {
    let schema = required_schema(settings)?;
    if start + schema.len() > header.len() {
        return Err(Error::parse(format!(
            "columns {}..{} extend past the end of the header row (width {})",
            start,
            start + schema.len(),
            header.len()
        )));
    }

    let mut bindings = Vec::with_capacity(schema.len());
    for (dest, column) in schema.columns().iter().enumerate() {
        let source = start + dest;
        if settings.has_header {
            log_name_mismatch(header, source, &column.name, settings, log);
        }
        bindings.push(ColumnBinding::new(source, dest));
    }

    Ok(HeaderResolution {
        schema: schema.clone(),
        bindings,
    })
}

fn resolve_by_name(
    header: &[String],
    settings: &ImportSettings,
    log: &mut ImportLog,
) -> Result<HeaderResolution> {
    let schema = required_schema(settings)?;
    let start = settings.start_column;
    let end = match settings.column_count {
        Some(count) => (start + count).min(header.len()),
        None => header.len(),
    };

    // Case-insensitive renamed-header-text -> source index, first wins.
    let mut by_name: Vec<(String, usize)> = Vec::new();
    for source in start..end {
        let text = renamed_header_text(header, source, settings);
        if text.is_empty() {
            continue;
        }
        if by_name.iter().any(|(n, _)| n.eq_ignore_ascii_case(&text)) {
            log::warn!(
                "duplicate header name {:?} at column {}; first occurrence wins",
                text,
                source + 1
            );
            log.record(
                (settings.header_row + 1) as i64,
                (source + 1) as i64,
                &text,
                format!("duplicate header name {:?}; first occurrence wins", text),
                Some(header[source].clone()),
            );
            continue;
        }
        by_name.push((text, source));
    }

    let mut bindings = Vec::with_capacity(schema.len());
    for (dest, column) in schema.columns().iter().enumerate() {
        let source = by_name
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(&column.name))
            .map(|(_, s)| *s)
            .ok_or_else(|| Error::ParseFailed {
                row: (settings.header_row + 1) as i64,
                column: -1,
                value: Some(column.name.clone()),
                message: format!("column {:?} not found in header row", column.name),
            })?;
        bindings.push(ColumnBinding::new(source, dest));
    }

    Ok(HeaderResolution {
        schema: schema.clone(),
        bindings,
    })
}

fn resolve_dispersed(
    header: &[String],
    settings: &ImportSettings,
    log: &mut ImportLog,
) -> Result<HeaderResolution> {
    // Letter-keyed entries resolve first; index-keyed entries win when both
    // name the same source column.
    let mut by_source: HashMap<usize, String> = HashMap::new();
    for (letters, name) in &settings.dispersed_by_letter {
        let source = letters_to_index(letters)?;
        by_source.insert(source, name.clone());
    }
    for (source, name) in &settings.dispersed_by_index {
        if let Some(previous) = by_source.insert(*source, name.clone()) {
            if !previous.eq_ignore_ascii_case(name) {
                log.record(
                    -1,
                    (*source + 1) as i64,
                    name,
                    format!(
                        "column {} mapped as both {:?} and {:?}; index mapping wins",
                        *source + 1,
                        previous,
                        name
                    ),
                    None,
                );
            }
        }
    }

    if by_source.is_empty() {
        return Err(Error::parse(
            "dispersed header resolution produced no bindings",
        ));
    }

    let mut entries: Vec<(usize, String)> = by_source.into_iter().collect();
    entries.sort_by_key(|(source, _)| *source);

    let mut sources = Vec::with_capacity(entries.len());
    let mut columns = Vec::with_capacity(entries.len());
    for (source, name) in entries {
        check_bounds(source, header.len())?;
        let ty = settings
            .schema
            .as_ref()
            .and_then(|s| s.index_of(&name).and_then(|i| s.column(i)))
            .map(|c| c.ty)
            .unwrap_or(ColumnType::Any);
        sources.push(source);
        columns.push(Column::new(name, ty));
    }

    let names = uniquify(columns.iter().map(|c| c.name.clone()).collect());
    for (column, name) in columns.iter_mut().zip(names) {
        column.name = name;
    }

    Ok(HeaderResolution {
        schema: Schema::from_columns(columns),
        bindings: sources
            .into_iter()
            .enumerate()
            .map(|(dest, source)| ColumnBinding::new(source, dest))
            .collect(),
    })
}

fn required_schema(settings: &ImportSettings) -> Result<&Schema> {
    settings.schema.as_ref().ok_or_else(|| {
        Error::Configuration("header mode requires a pre-built destination schema".to_string())
    })
}

fn check_bounds(source: usize, width: usize) -> Result<()> {
    if source >= width {
        return Err(Error::parse(format!(
            "source column {} is out of header-row bounds (width {})",
            source + 1,
            width
        )));
    }
    Ok(())
}

/// Rename resolved names after synthesis: the index map (keyed by absolute
/// source index) wins, then the name map (case-insensitive).
fn apply_renames(names: Vec<String>, sources: &[usize], settings: &ImportSettings) -> Vec<String> {
    names
        .into_iter()
        .zip(sources)
        .map(|(name, &source)| {
            if let Some(renamed) = settings.renames_by_index.get(&source) {
                return renamed.clone();
            }
            if let Some(renamed) = lookup_ci(&settings.renames_by_name, &name) {
                return renamed.clone();
            }
            name
        })
        .collect()
}

/// Header text after the rename maps: the index map wins, then the name map.
fn renamed_header_text(header: &[String], source: usize, settings: &ImportSettings) -> String {
    let text = header.get(source).map(|s| s.trim()).unwrap_or("");
    if let Some(renamed) = settings.renames_by_index.get(&source) {
        return renamed.clone();
    }
    if let Some(renamed) = lookup_ci(&settings.renames_by_name, text) {
        return renamed.clone();
    }
    text.to_string()
}

/// Mismatches between header text and the destination name are diagnostics
/// under the explicit index modes, never failures.
fn log_name_mismatch(
    header: &[String],
    source: usize,
    expected: &str,
    settings: &ImportSettings,
    log: &mut ImportLog,
) {
    let text = header.get(source).map(|s| s.trim()).unwrap_or("");
    if !text.is_empty() && !text.eq_ignore_ascii_case(expected) {
        log.record(
            (settings.header_row + 1) as i64,
            (source + 1) as i64,
            expected,
            format!("header reads {:?} where column {:?} was expected", text, expected),
            Some(text.to_string()),
        );
    }
}

fn lookup_ci<'a>(map: &'a HashMap<String, String>, name: &str) -> Option<&'a String> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
}

/// Make names pairwise unique (case-insensitively) by appending `_1`, `_2`, ...
fn uniquify(names: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut suffix = 0;
        while seen.iter().any(|s| s.eq_ignore_ascii_case(&candidate)) {
            suffix += 1;
            candidate = format!("{}_{}", name, suffix);
        }
        seen.push(candidate.clone());
        out.push(candidate);
    }
    out
}
