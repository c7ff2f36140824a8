//! Reference-table loading.
//!
//! The raw SGT exports carry whatever extra columns the CNJ added over the
//! years; only the leading code column plus `descricao` and `cod_pai` are
//! contractual, so they are located by name on every load. The flattened
//! intermediates written by [`crate::flatten`] and the auxiliary lookups
//! (`mpm_serventias.csv`, `ibge.csv`) load into plain keyed maps.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ReferenceError, ReferenceResult};
use crate::models::{ClassRow, CourtType, Municipality, MovementRow, SubjectRow};
use crate::parser;

// =============================================================================
// Raw SGT Tables
// =============================================================================

/// A raw SGT reference table: file-ordered codes, each with an optional
/// parent pointer and a description.
#[derive(Debug, Clone, Default)]
pub struct SgtTable {
    order: Vec<i64>,
    entries: HashMap<i64, SgtEntry>,
}

/// Parent pointer and description of one reference code.
#[derive(Debug, Clone)]
pub struct SgtEntry {
    pub parent: Option<i64>,
    pub descricao: String,
}

impl SgtTable {
    /// Load a table from disk, decoding the file encoding first.
    pub fn load(path: &Path) -> ReferenceResult<Self> {
        let content = parser::read_decoded(path)?;
        Self::from_csv(&content, &path.display().to_string())
    }

    /// Parse decoded CSV text. The first column is the code; `descricao`
    /// and `cod_pai` are located by header name.
    pub fn from_csv(content: &str, file: &str) -> ReferenceResult<Self> {
        let mut rdr = parser::table_reader(content);
        let headers = rdr.headers()?.clone();
        let descricao_idx = column_index(&headers, "descricao", file)?;
        let cod_pai_idx = column_index(&headers, "cod_pai", file)?;

        let mut table = SgtTable::default();
        for record in rdr.records() {
            let record = record?;
            let raw_code = record.get(0).unwrap_or("").trim();
            if raw_code.is_empty() {
                continue;
            }
            let code = parse_code(raw_code).ok_or_else(|| ReferenceError::BadCode {
                file: file.to_string(),
                value: raw_code.to_string(),
            })?;
            let descricao = record.get(descricao_idx).unwrap_or("").trim().to_string();
            let parent = record.get(cod_pai_idx).and_then(|s| parse_code(s.trim()));
            table.order.push(code);
            table.entries.insert(code, SgtEntry { parent, descricao });
        }
        Ok(table)
    }

    /// Codes in file order.
    pub fn codes(&self) -> &[i64] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a code. A dangling parent pointer surfaces here as
    /// [`ReferenceError::UnknownCode`].
    pub fn entry(&self, code: i64) -> ReferenceResult<&SgtEntry> {
        self.entries
            .get(&code)
            .ok_or(ReferenceError::UnknownCode { code })
    }
}

/// Lenient numeric parse for code cells: the exports serialize nullable
/// integer columns as floats ("1234.0"). Anything non-numeric is absent.
fn parse_code(raw: &str) -> Option<i64> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f as i64)
}

fn column_index(
    headers: &csv::StringRecord,
    name: &str,
    file: &str,
) -> ReferenceResult<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| ReferenceError::MissingColumn {
            file: file.to_string(),
            column: name.to_string(),
        })
}

// =============================================================================
// Flattened Tables
// =============================================================================

/// Load a flattened subject table keyed by code.
pub fn load_subjects(path: &Path) -> ReferenceResult<HashMap<i64, SubjectRow>> {
    let content = parser::read_decoded(path)?;
    let mut rdr = parser::table_reader(&content);
    let mut map = HashMap::new();
    for row in rdr.deserialize::<SubjectRow>() {
        let row = row?;
        map.insert(row.codigo, row);
    }
    Ok(map)
}

/// Load a flattened class table keyed by code.
pub fn load_classes(path: &Path) -> ReferenceResult<HashMap<i64, ClassRow>> {
    let content = parser::read_decoded(path)?;
    let mut rdr = parser::table_reader(&content);
    let mut map = HashMap::new();
    for row in rdr.deserialize::<ClassRow>() {
        let row = row?;
        map.insert(row.codigo, row);
    }
    Ok(map)
}

/// Load a flattened movement table keyed by code.
pub fn load_movements(path: &Path) -> ReferenceResult<HashMap<i64, MovementRow>> {
    let content = parser::read_decoded(path)?;
    let mut rdr = parser::table_reader(&content);
    let mut map = HashMap::new();
    for row in rdr.deserialize::<MovementRow>() {
        let row = row?;
        map.insert(row.codigo, row);
    }
    Ok(map)
}

// =============================================================================
// Auxiliary Lookups
// =============================================================================

/// Load the organ-type lookup (`mpm_serventias.csv`): SEQ_ORGAO → DSC_TIP_ORGAO.
pub fn load_organ_types(path: &Path) -> ReferenceResult<HashMap<i64, String>> {
    let content = parser::read_decoded(path)?;
    let mut rdr = parser::table_reader(&content);
    let headers = rdr.headers()?.clone();
    let file = path.display().to_string();
    let seq_idx = column_index(&headers, "SEQ_ORGAO", &file)?;
    let dsc_idx = column_index(&headers, "DSC_TIP_ORGAO", &file)?;

    let mut map = HashMap::new();
    for record in rdr.records() {
        let record = record?;
        let Some(code) = record.get(seq_idx).and_then(|s| parse_code(s.trim())) else {
            continue;
        };
        let dsc = record.get(dsc_idx).unwrap_or("").trim().to_string();
        map.insert(code, dsc);
    }
    Ok(map)
}

/// Load the IBGE municipality lookup: first column code → (municipio, sig_uf).
pub fn load_municipalities(path: &Path) -> ReferenceResult<HashMap<i64, Municipality>> {
    let content = parser::read_decoded(path)?;
    let mut rdr = parser::table_reader(&content);
    let headers = rdr.headers()?.clone();
    let file = path.display().to_string();
    let municipio_idx = column_index(&headers, "municipio", &file)?;
    let uf_idx = column_index(&headers, "sig_uf", &file)?;

    let mut map = HashMap::new();
    for record in rdr.records() {
        let record = record?;
        let Some(code) = record.get(0).and_then(|s| parse_code(s.trim())) else {
            continue;
        };
        map.insert(
            code,
            Municipality {
                municipio: record.get(municipio_idx).unwrap_or("").trim().to_string(),
                sig_uf: record.get(uf_idx).unwrap_or("").trim().to_string(),
            },
        );
    }
    Ok(map)
}

// =============================================================================
// Aggregate
// =============================================================================

/// Every lookup the record extractor joins against, loaded once per run.
#[derive(Debug, Default)]
pub struct RefTables {
    pub subjects: HashMap<i64, SubjectRow>,
    pub classes: HashMap<i64, ClassRow>,
    pub movements: HashMap<i64, MovementRow>,
    /// Court-local movement table; absent when the optional source file
    /// was not provided.
    pub local_movements: Option<HashMap<i64, MovementRow>>,
    pub organ_types: HashMap<i64, String>,
    pub municipalities: HashMap<i64, Municipality>,
}

impl RefTables {
    /// Load the flattened tables plus the auxiliary lookups under `root`.
    pub fn load(root: &Path, court: CourtType) -> ReferenceResult<Self> {
        let local_path = root.join(format!("movimentos_{}.csv", court.as_str()));
        let local_movements = if local_path.exists() {
            Some(load_movements(&local_path)?)
        } else {
            None
        };
        Ok(Self {
            subjects: load_subjects(&root.join("assuntos.csv"))?,
            classes: load_classes(&root.join("classes.csv"))?,
            movements: load_movements(&root.join("movimentos.csv"))?,
            local_movements,
            organ_types: load_organ_types(&root.join("mpm_serventias.csv"))?,
            municipalities: load_municipalities(&root.join("ibge.csv"))?,
        })
    }
}
