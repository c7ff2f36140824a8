//! Hierarchy flattener for the SGT reference tables.
//!
//! Subjects and movements resolve their ancestors through a three-slot
//! window (parent, grandparent, great-grandparent) that slides toward the
//! root, accumulating the description path as it goes; classes walk the
//! parent chain all the way up. The two walks produce different labels
//! and are kept separate on purpose: downstream consumers depend on the
//! exact output of each.
//!
//! Both walks count hops against the table size so a corrupted table with
//! a parent cycle fails fast instead of hanging.

use std::path::{Path, PathBuf};

use crate::error::{ReferenceError, ReferenceResult};
use crate::models::{ClassRow, CourtType, MovementRow, SubjectRow};
use crate::parser;
use crate::tables::SgtTable;

/// Parent of the code in `slot`, when the slot itself is occupied.
fn ancestor(table: &SgtTable, slot: Option<i64>) -> ReferenceResult<Option<i64>> {
    match slot {
        Some(code) => Ok(table.entry(code)?.parent),
        None => Ok(None),
    }
}

/// Slide the three-slot window up the ancestor chain, prepending each
/// newly-exposed ancestor description. Returns the accumulated
/// description plus the final (parent, grandparent) slots.
fn window_walk(
    table: &SgtTable,
    codigo: i64,
    mut descricao: String,
) -> ReferenceResult<(String, Option<i64>, Option<i64>)> {
    let mut cod_pai = table.entry(codigo)?.parent;
    let mut cod_avo = ancestor(table, cod_pai)?;
    let mut cod_bisavo = ancestor(table, cod_avo)?;

    let mut hops = 0usize;
    while let Some(bisavo) = cod_bisavo {
        hops += 1;
        if hops > table.len() {
            return Err(ReferenceError::Cycle { code: codigo });
        }
        let Some(pai) = cod_pai else { break };
        descricao = format!("{} | {}", table.entry(pai)?.descricao, descricao);
        cod_pai = cod_avo;
        cod_avo = Some(bisavo);
        cod_bisavo = ancestor(table, cod_avo)?;
    }

    Ok((descricao, cod_pai, cod_avo))
}

/// Flatten the subject hierarchy.
///
/// When a grandparent survives the walk it becomes the primary label and
/// the parent the secondary; otherwise the pair degrades to parent/self
/// and finally to self/self for roots.
pub fn flatten_subjects(table: &SgtTable) -> ReferenceResult<Vec<SubjectRow>> {
    let mut rows = Vec::with_capacity(table.len());
    for &codigo in table.codes() {
        let descricao = table.entry(codigo)?.descricao.clone();
        let (descricao, cod_pai, cod_avo) = window_walk(table, codigo, descricao)?;

        let (cod_pri, primario, secundario) = match (cod_avo, cod_pai) {
            (Some(avo), Some(pai)) => (
                avo,
                table.entry(avo)?.descricao.clone(),
                table.entry(pai)?.descricao.clone(),
            ),
            (None, Some(pai)) => (
                pai,
                table.entry(pai)?.descricao.clone(),
                descricao.clone(),
            ),
            _ => (codigo, descricao.clone(), descricao.clone()),
        };

        rows.push(SubjectRow {
            codigo,
            cod_pri,
            primario,
            secundario,
            descricao,
        });
    }
    Ok(rows)
}

/// Flatten a movement hierarchy (national or court-local).
///
/// Same window walk as subjects, but the output carries a single primary
/// label: the parent description when a grandparent survives the walk,
/// else the accumulated description.
pub fn flatten_movements(table: &SgtTable) -> ReferenceResult<Vec<MovementRow>> {
    let mut rows = Vec::with_capacity(table.len());
    for &codigo in table.codes() {
        let descricao = table.entry(codigo)?.descricao.clone();
        let (descricao, cod_pai, cod_avo) = window_walk(table, codigo, descricao)?;

        let primario = match (cod_avo, cod_pai) {
            (Some(_), Some(pai)) => table.entry(pai)?.descricao.clone(),
            _ => descricao.clone(),
        };

        rows.push(MovementRow {
            codigo,
            primario,
            descricao,
        });
    }
    Ok(rows)
}

/// Flatten the class hierarchy.
///
/// Unlike subjects and movements, classes walk to the root: the root
/// description becomes the primary label and every intermediate ancestor
/// prefixes the accumulated description.
pub fn flatten_classes(table: &SgtTable) -> ReferenceResult<Vec<ClassRow>> {
    let mut rows = Vec::with_capacity(table.len());
    for &codigo in table.codes() {
        let entry = table.entry(codigo)?;
        let mut descricao = entry.descricao.clone();
        let mut primario = descricao.clone();
        let mut cod_pai = entry.parent;

        let mut hops = 0usize;
        while let Some(pai) = cod_pai {
            hops += 1;
            if hops > table.len() {
                return Err(ReferenceError::Cycle { code: codigo });
            }
            let pai_entry = table.entry(pai)?;
            cod_pai = pai_entry.parent;
            if cod_pai.is_some() {
                descricao = format!("{} | {}", pai_entry.descricao, descricao);
            } else {
                primario = pai_entry.descricao.clone();
            }
        }

        rows.push(ClassRow {
            codigo,
            primario,
            descricao,
        });
    }
    Ok(rows)
}

// =============================================================================
// File-level Entry Points
// =============================================================================

/// Flatten `sgt_assuntos.csv` into `assuntos.csv` under `root`.
pub fn write_subjects(root: &Path) -> ReferenceResult<PathBuf> {
    let table = SgtTable::load(&root.join("sgt_assuntos.csv"))?;
    let rows = flatten_subjects(&table)?;
    let out = root.join("assuntos.csv");
    write_rows(&out, &rows)?;
    Ok(out)
}

/// Flatten `sgt_classes.csv` into `classes.csv` under `root`.
pub fn write_classes(root: &Path) -> ReferenceResult<PathBuf> {
    let table = SgtTable::load(&root.join("sgt_classes.csv"))?;
    let rows = flatten_classes(&table)?;
    let out = root.join("classes.csv");
    write_rows(&out, &rows)?;
    Ok(out)
}

/// Flatten a movement table under `root`: the national `sgt_movimentos.csv`
/// when `court` is `None`, else the court-local variant.
///
/// Returns `Ok(None)` when the optional local source file is absent; the
/// national table is required and its absence is an error.
pub fn write_movements(
    root: &Path,
    court: Option<CourtType>,
) -> ReferenceResult<Option<PathBuf>> {
    let (input, output) = match court {
        Some(c) => (
            root.join(format!("sgt_movimentos_{}.csv", c.as_str())),
            root.join(format!("movimentos_{}.csv", c.as_str())),
        ),
        None => (root.join("sgt_movimentos.csv"), root.join("movimentos.csv")),
    };
    if court.is_some() && !input.exists() {
        return Ok(None);
    }
    let table = SgtTable::load(&input)?;
    let rows = flatten_movements(&table)?;
    write_rows(&output, &rows)?;
    Ok(Some(output))
}

fn write_rows<T: serde::Serialize>(path: &Path, rows: &[T]) -> ReferenceResult<()> {
    let mut wtr = parser::table_writer(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
