//! Domain models for the conversion pipeline.
//!
//! This module contains the data structures shared across the pipeline:
//!
//! - [`CourtType`] - the six CNJ court categories
//! - [`SubjectRow`], [`ClassRow`], [`MovementRow`] - flattened reference rows
//! - [`Municipality`] - IBGE municipality lookup entry
//! - [`OutputRow`] - one denormalized output row per (case, movement) pair

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// =============================================================================
// Court Categories
// =============================================================================

/// The CNJ court categories a dump can belong to.
///
/// The snake_case name doubles as the folder name holding the JSON dumps
/// and as the suffix of the local movement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CourtType {
    JusticaEleitoral,
    JusticaEstadual,
    JusticaFederal,
    JusticaMilitar,
    JusticaTrabalho,
    TribunaisSuperiores,
}

impl CourtType {
    /// Directory and file-suffix form of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtType::JusticaEleitoral => "justica_eleitoral",
            CourtType::JusticaEstadual => "justica_estadual",
            CourtType::JusticaFederal => "justica_federal",
            CourtType::JusticaMilitar => "justica_militar",
            CourtType::JusticaTrabalho => "justica_trabalho",
            CourtType::TribunaisSuperiores => "tribunais_superiores",
        }
    }
}

impl std::fmt::Display for CourtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Flattened Reference Rows
// =============================================================================

/// One row of the flattened subject table (`assuntos.csv`).
///
/// `cod_pri` is the code of the resolved primary ancestor; the subject
/// filter matches against it in addition to the raw subject codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRow {
    pub codigo: i64,
    pub cod_pri: i64,
    pub primario: String,
    pub secundario: String,
    pub descricao: String,
}

/// One row of the flattened class table (`classes.csv`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRow {
    pub codigo: i64,
    pub primario: String,
    pub descricao: String,
}

/// One row of a flattened movement table (`movimentos.csv` or the
/// court-local `movimentos_{court_type}.csv`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRow {
    pub codigo: i64,
    pub primario: String,
    pub descricao: String,
}

/// IBGE municipality lookup entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Municipality {
    pub municipio: String,
    pub sig_uf: String,
}

// =============================================================================
// Output Row
// =============================================================================

/// The output column header, in order. Downstream consumers read the file
/// by position, so this order is part of the external contract.
pub const OUTPUT_HEADER: [&str; 45] = [
    "ProcessoNumero",
    "MovimentoSecundario",
    "MovimentoDataHora",
    "5-Movi ID",
    "1-Grau",
    "4-Sigla Tribunal",
    "2-Assunto Primário",
    "2-Assunto Secundário",
    "2-Assunto Terciário",
    "4-Assunto Local",
    "2-Assunto Descrição",
    "4-Vinculado",
    "4-Relação Incidental",
    "4-Prioridade",
    "4-Valor Causa",
    "ProcessoOrgaoJulgador",
    "ProcessoOrgaoJulgadorTipo",
    "4-Instância",
    "3-Orgão Julgador Município",
    "3-Orgão Julgador UF",
    "4-Competência",
    "4-Outros Números",
    "1-Classe Primária",
    "1-Classe Secundária",
    "3-Processo Município",
    "3-Processo UF",
    "4-Nível Sigilo",
    "4-Intervenção MP",
    "4-Tamanho",
    "4-Data Ajuizamento",
    "4-Processo EL",
    "4-Sistema",
    "4-Movi Primário",
    "5-Movi Nível Sigilo",
    "4-Movi Tipo Respo",
    "5-Movi Local",
    "5-Movi Complemento",
    "5-Movi Cód Comple",
    "5-Movi Doc Vinculado",
    "5-Movi Órgão Julgador",
    "5-Movi Órgão Julg Tipo",
    "5-Movi Órgão Julg Inst",
    "5-Movi Órgão Julg Município",
    "5-Movi Órgão Julg UF",
    "5-Movi Tipo Decisão",
];

/// One denormalized output row.
///
/// Field order and serde renames must stay aligned with [`OUTPUT_HEADER`];
/// a test guards the pairing. Every column is optional: an absent source
/// field serializes as an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "ProcessoNumero")]
    pub processo_numero: Option<String>,
    #[serde(rename = "MovimentoSecundario")]
    pub movimento_secundario: Option<String>,
    #[serde(rename = "MovimentoDataHora")]
    pub movimento_data_hora: Option<String>,
    #[serde(rename = "5-Movi ID")]
    pub movimento_id: Option<String>,
    #[serde(rename = "1-Grau")]
    pub processo_grau: Option<String>,
    #[serde(rename = "4-Sigla Tribunal")]
    pub processo_sigla_tribunal: Option<String>,
    #[serde(rename = "2-Assunto Primário")]
    pub assunto_primario: Option<String>,
    #[serde(rename = "2-Assunto Secundário")]
    pub assunto_secundario: Option<String>,
    #[serde(rename = "2-Assunto Terciário")]
    pub assunto_terciario: Option<String>,
    #[serde(rename = "4-Assunto Local")]
    pub assunto_local: Option<String>,
    #[serde(rename = "2-Assunto Descrição")]
    pub assunto_descricao: Option<String>,
    #[serde(rename = "4-Vinculado")]
    pub processo_vinculado: Option<String>,
    #[serde(rename = "4-Relação Incidental")]
    pub relacao_incidental: Option<String>,
    #[serde(rename = "4-Prioridade")]
    pub prioridade: Option<String>,
    #[serde(rename = "4-Valor Causa")]
    pub valor_causa: Option<String>,
    #[serde(rename = "ProcessoOrgaoJulgador")]
    pub orgao_julgador: Option<String>,
    #[serde(rename = "ProcessoOrgaoJulgadorTipo")]
    pub orgao_julgador_tipo: Option<String>,
    #[serde(rename = "4-Instância")]
    pub orgao_julgador_instancia: Option<String>,
    #[serde(rename = "3-Orgão Julgador Município")]
    pub orgao_julgador_municipio: Option<String>,
    #[serde(rename = "3-Orgão Julgador UF")]
    pub orgao_julgador_uf: Option<String>,
    #[serde(rename = "4-Competência")]
    pub competencia: Option<String>,
    #[serde(rename = "4-Outros Números")]
    pub outros_numeros: Option<String>,
    #[serde(rename = "1-Classe Primária")]
    pub classe_primaria: Option<String>,
    #[serde(rename = "1-Classe Secundária")]
    pub classe_secundaria: Option<String>,
    #[serde(rename = "3-Processo Município")]
    pub processo_municipio: Option<String>,
    #[serde(rename = "3-Processo UF")]
    pub processo_uf: Option<String>,
    #[serde(rename = "4-Nível Sigilo")]
    pub nivel_sigilo: Option<String>,
    #[serde(rename = "4-Intervenção MP")]
    pub intervencao_mp: Option<String>,
    #[serde(rename = "4-Tamanho")]
    pub tamanho: Option<String>,
    #[serde(rename = "4-Data Ajuizamento")]
    pub data_ajuizamento: Option<String>,
    #[serde(rename = "4-Processo EL")]
    pub processo_el: Option<String>,
    #[serde(rename = "4-Sistema")]
    pub sistema: Option<String>,
    #[serde(rename = "4-Movi Primário")]
    pub movimento_primario: Option<String>,
    #[serde(rename = "5-Movi Nível Sigilo")]
    pub movimento_nivel_sigilo: Option<String>,
    #[serde(rename = "4-Movi Tipo Respo")]
    pub movimento_tipo_responsavel: Option<String>,
    #[serde(rename = "5-Movi Local")]
    pub movimento_local: Option<String>,
    #[serde(rename = "5-Movi Complemento")]
    pub movimento_complemento: Option<String>,
    #[serde(rename = "5-Movi Cód Comple")]
    pub movimento_cod_complemento: Option<String>,
    #[serde(rename = "5-Movi Doc Vinculado")]
    pub movimento_doc_vinculado: Option<String>,
    #[serde(rename = "5-Movi Órgão Julgador")]
    pub movimento_orgao_julgador: Option<String>,
    #[serde(rename = "5-Movi Órgão Julg Tipo")]
    pub movimento_orgao_julgador_tipo: Option<String>,
    #[serde(rename = "5-Movi Órgão Julg Inst")]
    pub movimento_orgao_julgador_instancia: Option<String>,
    #[serde(rename = "5-Movi Órgão Julg Município")]
    pub movimento_orgao_julgador_municipio: Option<String>,
    #[serde(rename = "5-Movi Órgão Julg UF")]
    pub movimento_orgao_julgador_uf: Option<String>,
    #[serde(rename = "5-Movi Tipo Decisão")]
    pub movimento_tipo_decisao: Option<String>,
}
