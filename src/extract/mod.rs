//! Record extractor: denormalizes one CNJ case record into output rows.
//!
//! Everything here is defensive. The per-court dumps disagree on whether
//! codes are numbers or strings, nested objects may be null, and no field
//! beyond the case number and the movement list is guaranteed. Extraction
//! therefore never fails: a case either produces rows or is skipped.
//!
//! Skip rules:
//! - no `dadosBasicos`, no `numero`, or no `movimento` array → skipped
//! - any movement with a missing or malformed timestamp → the whole case
//!   is skipped, no partial emission
//! - subject filter misses → skipped
//!
//! Within a surviving case, a movement without a resolvable code emits no
//! row of its own; lookup misses never skip anything, they leave the raw
//! value in place.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::OutputRow;
use crate::tables::RefTables;

const PROC_EL: [(i64, &str); 2] = [(0, "Eletronico"), (1, "Fisico")];
const SISTEMAS: [(i64, &str); 8] = [
    (1, "PJE"),
    (2, "PROJUDI"),
    (3, "SAJ"),
    (4, "EPROC"),
    (5, "APOLO"),
    (6, "THEMIS"),
    (7, "LIBRA"),
    (8, "Outros"),
];
const RESPONSAVEL: [(i64, &str); 2] = [(0, "Servidor"), (1, "Magistrado")];
const DECISAO: [(i64, &str); 2] = [(0, "Monocratica"), (1, "Colegiada")];

static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{14}$").expect("timestamp pattern is valid"));

/// Denormalize one case record into output rows, one per movement.
///
/// With a `filter`, the case only emits when one of its raw subject codes
/// or one of their resolved primary-ancestor codes matches.
pub fn extract_case(case: &Value, refs: &RefTables, filter: Option<i64>) -> Vec<OutputRow> {
    let Some(basic) = non_null(case.get("dadosBasicos")) else {
        return Vec::new();
    };
    let Some(numero) = non_null(basic.get("numero")) else {
        return Vec::new();
    };
    let Some(movements) = non_null(case.get("movimento")).and_then(Value::as_array) else {
        return Vec::new();
    };

    if movements
        .iter()
        .any(|m| !valid_timestamp(m.get("dataHora")))
    {
        return Vec::new();
    }

    let subjects = collect_subjects(basic);
    if !passes_filter(&subjects, refs, filter) {
        return Vec::new();
    }

    let template = case_row(case, basic, numero, &subjects, refs);
    movements
        .iter()
        .filter_map(|m| movement_row(m, &template, refs))
        .collect()
}

// =============================================================================
// Case-level Extraction
// =============================================================================

/// Subject references gathered from `dadosBasicos.assunto`, document order.
#[derive(Debug, Default)]
struct SubjectRefs {
    /// National codes (own or parent pointer), raw values.
    codes: Vec<Value>,
    /// Court-local subject codes.
    locals: Vec<Value>,
    /// Free-text subject descriptions.
    descriptions: Vec<Value>,
}

fn collect_subjects(basic: &Value) -> SubjectRefs {
    let mut subjects = SubjectRefs::default();
    let Some(list) = non_null(basic.get("assunto")).and_then(Value::as_array) else {
        return subjects;
    };
    for item in list {
        if let Some(code) = non_null(item.get("codigoNacional")) {
            subjects.codes.push(code.clone());
        } else if let Some(code) = non_null(item.get("codigoPaiNacional")) {
            subjects.codes.push(code.clone());
        }
        if let Some(desc) = non_null(item.get("descricao")) {
            subjects.descriptions.push(desc.clone());
        } else if let Some(local) = non_null(item.get("assuntoLocal")) {
            if let Some(code) = non_null(local.get("codigoNacional")) {
                subjects.codes.push(code.clone());
            } else if let Some(code) = non_null(local.get("codigoPaiNacional")) {
                subjects.codes.push(code.clone());
            }
            if let Some(desc) = non_null(local.get("descricao")) {
                subjects.descriptions.push(desc.clone());
            }
            if let Some(code) = non_null(local.get("codigoAssunto")) {
                subjects.locals.push(code.clone());
            }
        }
    }
    subjects
}

fn passes_filter(subjects: &SubjectRefs, refs: &RefTables, filter: Option<i64>) -> bool {
    let Some(wanted) = filter else {
        return true;
    };
    if subjects.codes.iter().any(|c| as_code(c) == Some(wanted)) {
        return true;
    }
    subjects
        .codes
        .iter()
        .filter_map(|c| as_code(c))
        .filter_map(|c| refs.subjects.get(&c))
        .any(|row| row.cod_pri == wanted)
}

/// Build the case-level template row shared by every movement of the case.
fn case_row(
    case: &Value,
    basic: &Value,
    numero: &Value,
    subjects: &SubjectRefs,
    refs: &RefTables,
) -> OutputRow {
    let mut row = OutputRow {
        processo_numero: Some(format_case_number(&display(numero))),
        ..OutputRow::default()
    };

    row.processo_grau = field(case.get("grau"));
    row.processo_sigla_tribunal = field(case.get("siglaTribunal"));

    // The last subject in document order carries the case labels; an
    // unresolvable code clears all three.
    if let Some(raw) = subjects.codes.last() {
        if let Some(flat) = as_code(raw).and_then(|c| refs.subjects.get(&c)) {
            row.assunto_primario = Some(flat.primario.clone());
            row.assunto_secundario = Some(flat.secundario.clone());
            row.assunto_terciario = Some(flat.descricao.clone());
        }
    }
    row.assunto_local = subjects.locals.last().map(display);
    row.assunto_descricao = subjects.descriptions.last().map(display);

    row.processo_vinculado = field(basic.get("processoVinculado"));
    row.relacao_incidental = field(basic.get("relacaoIncidental"));
    row.prioridade = field(basic.get("prioridade"));
    row.valor_causa = field(basic.get("valorCausa"));

    if let Some(orgao) = non_null(basic.get("orgaoJulgador")) {
        row.orgao_julgador = field(orgao.get("nomeOrgao"));
        if let Some(code) = non_null(orgao.get("codigoOrgao")) {
            row.orgao_julgador_tipo = Some(resolve_organ_type(code, refs));
        }
        row.orgao_julgador_instancia = field(orgao.get("instancia"));
        if let Some(code) = non_null(orgao.get("codigoMunicipioIBGE")) {
            let (municipio, uf) = resolve_municipality(code, refs);
            row.orgao_julgador_municipio = Some(municipio);
            row.orgao_julgador_uf = Some(uf);
        }
    }

    row.competencia = field(basic.get("competencia"));
    row.outros_numeros = field(basic.get("outrosnumeros"));

    if let Some(code) = non_null(basic.get("classeProcessual")) {
        match as_code(code).and_then(|c| refs.classes.get(&c)) {
            Some(class) => {
                row.classe_primaria = Some(class.primario.clone());
                row.classe_secundaria = Some(class.descricao.clone());
            }
            None => row.classe_secundaria = Some(display(code)),
        }
    }

    if let Some(code) = non_null(basic.get("codigoLocalidade")) {
        let (municipio, uf) = resolve_municipality(code, refs);
        row.processo_municipio = Some(municipio);
        row.processo_uf = Some(uf);
    }

    row.nivel_sigilo = field(basic.get("nivelSigilo"));
    row.intervencao_mp = field(basic.get("intervencaoMP"));
    row.tamanho = field(basic.get("tamanhoProcesso"));
    row.data_ajuizamento =
        non_null(basic.get("dataAjuizamento")).map(|v| compact_to_iso(&display(v)));
    row.processo_el = non_null(basic.get("procEl")).map(|v| map_enum(v, &PROC_EL));
    row.sistema = non_null(basic.get("dscSistema")).map(|v| map_enum(v, &SISTEMAS));

    row
}

// =============================================================================
// Movement-level Extraction
// =============================================================================

/// Extract one movement. Returns `None` when the movement has no
/// resolvable code or timestamp, emitting no row.
fn movement_row(movement: &Value, template: &OutputRow, refs: &RefTables) -> Option<OutputRow> {
    // Code selection: national code, else the local entry's national
    // parent, else the local code itself (which also marks the movement
    // as locally coded).
    let mut local = None;
    let mut code = None;
    if let Some(c) =
        non_null(movement.get("movimentoNacional")).and_then(|n| non_null(n.get("codigoNacional")))
    {
        code = Some(c.clone());
    } else if let Some(entry) = non_null(movement.get("movimentoLocal")) {
        if let Some(c) = non_null(entry.get("codigoPaiNacional")) {
            code = Some(c.clone());
        } else if let Some(c) = non_null(entry.get("codigoMovimento")) {
            code = Some(c.clone());
            local = Some(c.clone());
        }
    }
    let code = code?;
    let datahora = non_null(movement.get("dataHora"))?;

    let mut row = template.clone();
    row.movimento_data_hora = Some(compact_to_iso(&display(datahora)));
    row.movimento_local = local.as_ref().map(display);

    // Locally coded movements resolve through the court-local table
    // first; on a miss (or for national codes) the national table
    // supplies the labels, and an unknown code stays raw.
    let mut primario = None;
    let mut secundario = display(&code);
    if local.is_some() {
        if let Some(table) = refs.local_movements.as_ref() {
            if let Some(flat) = as_code(&code).and_then(|c| table.get(&c)) {
                primario = Some(flat.descricao.clone());
                secundario = flat.descricao.clone();
            }
        }
    }
    if primario.is_none() {
        if let Some(flat) = as_code(&code).and_then(|c| refs.movements.get(&c)) {
            primario = Some(flat.primario.clone());
            secundario = flat.descricao.clone();
        }
    }
    row.movimento_primario = primario;
    row.movimento_secundario = Some(secundario);

    row.movimento_id = field(movement.get("identificadorMovimento"));
    row.movimento_nivel_sigilo = field(movement.get("nivelSigilo"));
    row.movimento_tipo_responsavel =
        non_null(movement.get("tipoResponsavelMovimento")).map(|v| map_enum(v, &RESPONSAVEL));

    if let Some(complemento) = non_null(movement.get("complementoNacional")) {
        row.movimento_complemento = field(complemento.get("descricaoComplemento"));
        row.movimento_cod_complemento = field(complemento.get("codComplementoTabelado"));
    }
    row.movimento_doc_vinculado = field(movement.get("idDocumentoVinculado"));

    if let Some(orgao) = non_null(movement.get("orgaoJulgador")) {
        row.movimento_orgao_julgador = field(orgao.get("nomeOrgao"));
        if let Some(code) = non_null(orgao.get("codigoOrgao")) {
            row.movimento_orgao_julgador_tipo = Some(resolve_organ_type(code, refs));
        }
        row.movimento_orgao_julgador_instancia = field(orgao.get("instancia"));
        if let Some(code) = non_null(orgao.get("codigoMunicipioIBGE")) {
            let (municipio, uf) = resolve_municipality(code, refs);
            row.movimento_orgao_julgador_municipio = Some(municipio);
            row.movimento_orgao_julgador_uf = Some(uf);
        }
    }

    row.movimento_tipo_decisao =
        non_null(movement.get("tipoDecisao")).map(|v| map_enum(v, &DECISAO));

    Some(row)
}

// =============================================================================
// Value Helpers
// =============================================================================

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Scalar display form; containers fall back to compact JSON.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn field(value: Option<&Value>) -> Option<String> {
    non_null(value).map(display)
}

/// Numeric coercion for code fields: integers, floats, and numeric
/// strings all resolve; anything else is not a code.
fn as_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Coded-value display: the mapped label, the coerced number when
/// unmapped, or the raw value when not numeric.
fn map_enum(value: &Value, mapping: &[(i64, &str)]) -> String {
    match as_code(value) {
        Some(n) => mapping
            .iter()
            .find(|(code, _)| *code == n)
            .map(|(_, label)| (*label).to_string())
            .unwrap_or_else(|| n.to_string()),
        None => display(value),
    }
}

fn resolve_organ_type(code: &Value, refs: &RefTables) -> String {
    as_code(code)
        .and_then(|c| refs.organ_types.get(&c))
        .cloned()
        .unwrap_or_else(|| display(code))
}

/// On a hit the name and UF come from the IBGE table; on a miss the raw
/// code shows in both columns.
fn resolve_municipality(code: &Value, refs: &RefTables) -> (String, String) {
    match as_code(code).and_then(|c| refs.municipalities.get(&c)) {
        Some(m) => (m.municipio.clone(), m.sig_uf.clone()),
        None => {
            let raw = display(code);
            (raw.clone(), raw)
        }
    }
}

// =============================================================================
// Timestamps and Formatting
// =============================================================================

/// A movement timestamp is valid when its display form is 14 digits
/// encoding a real calendar date-time with seconds at most 59.
fn valid_timestamp(value: Option<&Value>) -> bool {
    let Some(value) = non_null(value) else {
        return false;
    };
    let text = display(value);
    if !TIMESTAMP_RE.is_match(&text) {
        return false;
    }
    // chrono's %S admits a leap second, hence the explicit bound
    match text[12..14].parse::<u32>() {
        Ok(seconds) if seconds <= 59 => {}
        _ => return false,
    }
    NaiveDateTime::parse_from_str(&text, "%Y%m%d%H%M%S").is_ok()
}

/// Character window `[start, end)`, empty when past the end of the input.
fn window(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// `NNNNNNN-NN.NNNN.NNN.NNNN` rendering of a raw case number.
fn format_case_number(raw: &str) -> String {
    format!(
        "{}-{}.{}.{}.{}",
        window(raw, 0, 7),
        window(raw, 7, 9),
        window(raw, 9, 13),
        window(raw, 13, 16),
        window(raw, 16, 20)
    )
}

/// Compact `YYYYMMDDHHMMSS` to ISO `YYYY-MM-DDTHH:MM:SS`.
fn compact_to_iso(raw: &str) -> String {
    format!(
        "{}-{}-{}T{}:{}:{}",
        window(raw, 0, 4),
        window(raw, 4, 6),
        window(raw, 6, 8),
        window(raw, 8, 10),
        window(raw, 10, 12),
        window(raw, 12, 14)
    )
}
