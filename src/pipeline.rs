//! End-to-end conversion pipeline.
//!
//! One run flattens the SGT reference tables, loads every lookup once,
//! then produces one denormalized CSV per requested subject filter (or a
//! single unfiltered file) from the JSON dumps of the chosen court
//! category.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};
use crate::extract;
use crate::flatten;
use crate::models::CourtType;
use crate::tables::RefTables;
use crate::writer::RowWriter;

/// What to convert and how to split it.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Root folder holding the reference tables and the court-type folder.
    pub root: PathBuf,
    /// Court category whose JSON dumps are converted.
    pub court: CourtType,
    /// Subject filters; empty means a single unfiltered output.
    pub subjects: Vec<i64>,
}

/// Counters reported after a run. With multiple subject filters the case
/// and row counters accumulate across the filter passes.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files: usize,
    pub cases: usize,
    /// Cases that produced no rows: invalid, filtered out, or without an
    /// emitting movement.
    pub skipped_cases: usize,
    pub rows: usize,
    pub outputs: Vec<PathBuf>,
}

/// Run the full conversion.
pub fn run(options: &ConvertOptions) -> PipelineResult<RunSummary> {
    let root = options.root.as_path();

    flatten::write_subjects(root)?;
    flatten::write_classes(root)?;
    flatten::write_movements(root, None)?;
    if flatten::write_movements(root, Some(options.court))?.is_none() {
        eprintln!(
            "⚠️  No local movement table for {}, movement codes resolve against the national table only",
            options.court
        );
    }

    let refs = RefTables::load(root, options.court)?;
    let files = discover_json(root, options.court)?;
    fs::create_dir_all(root.join("tmp"))?;

    let mut summary = RunSummary {
        files: files.len(),
        ..RunSummary::default()
    };

    let filters: Vec<Option<i64>> = if options.subjects.is_empty() {
        vec![None]
    } else {
        options.subjects.iter().copied().map(Some).collect()
    };

    for filter in filters {
        let output = output_path(root, options.court, filter);
        convert(&files, filter, &refs, &output, &mut summary)?;
        eprintln!("✅ Generated {}", output.display());
        summary.outputs.push(output);
    }

    Ok(summary)
}

/// All case-record JSON files under `{root}/{court}/`, sorted so output
/// order is deterministic.
fn discover_json(root: &Path, court: CourtType) -> PipelineResult<Vec<PathBuf>> {
    let pattern = format!("{}/{}/**/*.json", root.display(), court.as_str());
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        files.push(entry.map_err(|e| PipelineError::Io(e.into_error()))?);
    }
    files.sort();
    Ok(files)
}

fn output_path(root: &Path, court: CourtType, filter: Option<i64>) -> PathBuf {
    let name = match filter {
        Some(subject) => format!("{}_{}.csv", court.as_str(), subject),
        None => format!("{}.csv", court.as_str()),
    };
    root.join("tmp").join(name)
}

/// One pass over every JSON file, writing the rows matching `filter`.
fn convert(
    files: &[PathBuf],
    filter: Option<i64>,
    refs: &RefTables,
    output: &Path,
    summary: &mut RunSummary,
) -> PipelineResult<()> {
    let mut writer = RowWriter::create(output)?;
    for path in files {
        eprintln!("📄 Processing {}", path.display());
        let content = fs::read_to_string(path)?;
        let cases: Vec<Value> = serde_json::from_str(&content).map_err(|source| {
            PipelineError::Json {
                path: path.clone(),
                source,
            }
        })?;
        for case in &cases {
            summary.cases += 1;
            let rows = extract::extract_case(case, refs, filter);
            if rows.is_empty() {
                summary.skipped_cases += 1;
            }
            for row in &rows {
                writer.write(row)?;
                summary.rows += 1;
            }
        }
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Full fixture: reference tables, one dump file, two cases (one with
    /// a corrupt movement timestamp).
    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::write(
            root.join("sgt_assuntos.csv"),
            "codigo;descricao;cod_pai\n\
             100;DIREITO DO TRABALHO;\n\
             150;Rescisão do Contrato de Trabalho;100\n\
             200;Verbas Rescisórias;150\n",
        )
        .unwrap();
        fs::write(
            root.join("sgt_classes.csv"),
            "codigo;descricao;cod_pai\n\
             980;Procedimento de Conhecimento;\n\
             985;Ação Trabalhista - Rito Ordinário;980\n",
        )
        .unwrap();
        fs::write(
            root.join("sgt_movimentos.csv"),
            "codigo;descricao;cod_pai\n\
             1;Magistrado;\n\
             3;Decisão;1\n\
             26;Distribuição;3\n",
        )
        .unwrap();
        fs::write(
            root.join("mpm_serventias.csv"),
            "SEQ_ORGAO;DSC_TIP_ORGAO\n90935;VARA\n",
        )
        .unwrap();
        fs::write(
            root.join("ibge.csv"),
            "codigo;municipio;sig_uf\n3550308;São Paulo;SP\n",
        )
        .unwrap();

        let dump_dir = root.join("justica_trabalho").join("trt02");
        fs::create_dir_all(&dump_dir).unwrap();
        let cases = json!([
            {
                "grau": "G1",
                "siglaTribunal": "TRT02",
                "dadosBasicos": {
                    "numero": "00012345620205020001",
                    "assunto": [{"codigoNacional": 200}],
                    "classeProcessual": 985,
                    "codigoLocalidade": 3550308,
                    "dscSistema": 3
                },
                "movimento": [
                    {"movimentoNacional": {"codigoNacional": 26}, "dataHora": "20200116090000"},
                    {"movimentoNacional": {"codigoNacional": 26}, "dataHora": "20200220113015"}
                ]
            },
            {
                "dadosBasicos": {"numero": "00099999920205020002"},
                "movimento": [
                    {"movimentoNacional": {"codigoNacional": 26}, "dataHora": "20200220113099"}
                ]
            }
        ]);
        fs::write(
            dump_dir.join("processos-trt02_1.json"),
            serde_json::to_string(&cases).unwrap(),
        )
        .unwrap();

        dir
    }

    fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
        let data = fs::read_to_string(path).unwrap();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(data.as_bytes());
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_full_run() {
        let dir = fixture();
        let options = ConvertOptions {
            root: dir.path().to_path_buf(),
            court: CourtType::JusticaTrabalho,
            subjects: vec![],
        };
        let summary = run(&options).unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(summary.cases, 2);
        assert_eq!(summary.skipped_cases, 1); // corrupt timestamp
        assert_eq!(summary.rows, 2);

        // Flattened intermediates
        assert!(dir.path().join("assuntos.csv").exists());
        assert!(dir.path().join("classes.csv").exists());
        assert!(dir.path().join("movimentos.csv").exists());

        let output = dir.path().join("tmp").join("justica_trabalho.csv");
        let rows = read_rows(&output);
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.get(0), Some("0001234-56.2020.502.0001"));
        assert_eq!(first.get(1), Some("Distribuição"));
        assert_eq!(first.get(2), Some("2020-01-16T09:00:00"));
        assert_eq!(first.get(6), Some("DIREITO DO TRABALHO"));
        assert_eq!(first.get(7), Some("Rescisão do Contrato de Trabalho"));
        assert_eq!(first.get(8), Some("Verbas Rescisórias"));
        assert_eq!(first.get(22), Some("Procedimento de Conhecimento"));
        assert_eq!(first.get(23), Some("Ação Trabalhista - Rito Ordinário"));
        assert_eq!(first.get(24), Some("São Paulo"));
        assert_eq!(first.get(25), Some("SP"));
        assert_eq!(first.get(31), Some("SAJ"));
        assert_eq!(first.get(32), Some("Decisão")); // movement primary label
    }

    #[test]
    fn test_subject_filter_split() {
        let dir = fixture();
        let options = ConvertOptions {
            root: dir.path().to_path_buf(),
            court: CourtType::JusticaTrabalho,
            subjects: vec![100, 777],
        };
        let summary = run(&options).unwrap();
        assert_eq!(summary.outputs.len(), 2);

        // 200's primary ancestor is 100, so the case lands in the first
        // split; 777 matches nothing and gets a header-only file.
        let matched = read_rows(&dir.path().join("tmp").join("justica_trabalho_100.csv"));
        assert_eq!(matched.len(), 2);
        let empty = read_rows(&dir.path().join("tmp").join("justica_trabalho_777.csv"));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_missing_required_reference_table_is_fatal() {
        let dir = fixture();
        fs::remove_file(dir.path().join("sgt_classes.csv")).unwrap();
        let options = ConvertOptions {
            root: dir.path().to_path_buf(),
            court: CourtType::JusticaTrabalho,
            subjects: vec![],
        };
        assert!(run(&options).is_err());
    }

    #[test]
    fn test_malformed_dump_is_fatal() {
        let dir = fixture();
        fs::write(
            dir.path()
                .join("justica_trabalho")
                .join("trt02")
                .join("broken.json"),
            "{not json",
        )
        .unwrap();
        let options = ConvertOptions {
            root: dir.path().to_path_buf(),
            court: CourtType::JusticaTrabalho,
            subjects: vec![],
        };
        let err = run(&options).unwrap_err();
        assert!(matches!(err, PipelineError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
