//! Built-in curriculum wizard: record shape, rule tables, step plan, group
//! policies, labels, and the closed reference catalogs rules check membership
//! against.
//!
//! The wizard has six steps: personal data + summary, educations,
//! experiences (with nested funciones and per-experience referencias rows),
//! skills + languages, references, certifications. Submit validates the union.
//! The phone-format and birth-date rules are always-active: they re-run on
//! every gate because personal data is shared state other steps can touch
//! indirectly. Per-group date rules stay with their own step so an invalid
//! date on a later step never blocks an earlier one.

use crate::collection::GroupPolicy;
use crate::context::Context;
use crate::engine::{Engine, Shape};
use crate::error::ShapeError;
use crate::format::LabelTable;
use crate::rule::{Rule, Verdict};
use crate::steps::StepPlan;
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

// ─── Cached regexes ─────────────────────────────────────────────────────────

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{6,19}$").unwrap());

// ─── Reference catalogs ─────────────────────────────────────────────────────

/// Valid language proficiency levels.
pub static LANGUAGE_LEVELS: &[&str] = &["A1", "A2", "B1", "B2", "C1", "C2", "Nativo"];

/// Valid education type identifiers.
pub static EDUCATION_TYPES: &[&str] = &[
    "secundaria",
    "tecnico",
    "tecnologo",
    "pregrado",
    "especializacion",
    "maestria",
    "doctorado",
];

/// Earliest calendar date any date-valued field may carry.
pub static MIN_SUPPORTED_DATE: LazyLock<NaiveDate> =
    LazyLock::new(|| NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());

/// Closed value sets injected into the rule tables at definition time.
/// The engine never fetches reference data; hosts may substitute their own.
#[derive(Clone, Debug)]
pub struct Catalogs {
    pub language_levels: Vec<String>,
    pub education_types: Vec<String>,
}

impl Default for Catalogs {
    fn default() -> Catalogs {
        Catalogs {
            language_levels: LANGUAGE_LEVELS.iter().map(|s| s.to_string()).collect(),
            education_types: EDUCATION_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ─── Date predicates ────────────────────────────────────────────────────────

/// Parse a calendar date literal (`YYYY-MM-DD`). Time-of-day never enters
/// into any comparison.
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Bounds check shared by every date rule: parseable, not in the future, not
/// before the minimum supported date. An unparsable value is a semantic
/// failure with a descriptive message, never a crash.
fn check_day_bounds(value: &serde_json::Value) -> Result<NaiveDate, Verdict> {
    let Some(text) = value.as_str() else {
        return Err(Verdict::Message(
            "must be a date in YYYY-MM-DD format".to_string(),
        ));
    };
    let Some(day) = parse_day(text) else {
        return Err(Verdict::Message(
            "must be a date in YYYY-MM-DD format".to_string(),
        ));
    };
    if day > today() {
        return Err(Verdict::Message("date cannot be in the future".to_string()));
    }
    if day < *MIN_SUPPORTED_DATE {
        return Err(Verdict::Message(format!(
            "date cannot be earlier than {}",
            *MIN_SUPPORTED_DATE
        )));
    }
    Ok(day)
}

fn bounded_date(value: &serde_json::Value, _ctx: &Context) -> Verdict {
    match check_day_bounds(value) {
        Ok(_) => Verdict::Pass,
        Err(v) => v,
    }
}

/// End-of-range predicate: bounds check, then ordering against the start date
/// supplied via context. A missing or unparsable start date is the start
/// field's problem, not this one's.
fn end_after_start(value: &serde_json::Value, ctx: &Context) -> Verdict {
    let end = match check_day_bounds(value) {
        Ok(day) => day,
        Err(v) => return v,
    };
    if let Some(start_text) = ctx.text("periodo_inicio")
        && let Some(start) = parse_day(start_text)
        && end < start
    {
        return Verdict::Message("end date cannot precede the start date".to_string());
    }
    Verdict::Pass
}

fn member_of(
    allowed: Vec<String>,
) -> impl Fn(&serde_json::Value, &Context) -> Verdict + Send + Sync + 'static {
    move |value, _ctx| match value.as_str() {
        Some(s) if allowed.iter().any(|a| a == s.trim()) => Verdict::Pass,
        _ => Verdict::Message(format!("must be one of: {}", allowed.join(", "))),
    }
}

// ─── Record shape ───────────────────────────────────────────────────────────

/// The curriculum record's declared shape.
pub fn shape() -> Shape {
    Shape::new()
        .field("datos_personales")
        .field("resumen")
        .group("educaciones")
        .group("experiencias")
        .group("funciones")
        .group("referencias")
        .group("habilidades_tecnicas")
        .group("habilidades_blandas")
        .group("idiomas")
        .group("certificaciones")
}

// ─── Group policies ─────────────────────────────────────────────────────────

/// Row policies: educations, experiences, and funciones rows are mandatory
/// once added; references, skills, languages, and certifications follow
/// all-or-nothing semantics.
pub fn policies() -> Vec<GroupPolicy> {
    vec![
        GroupPolicy::mandatory("educaciones"),
        GroupPolicy::mandatory("experiencias"),
        GroupPolicy::mandatory("funciones"),
        GroupPolicy::optional("referencias", &["nombre", "contacto", "relacion"]),
        GroupPolicy::optional("habilidades_tecnicas", &["nombre"]),
        GroupPolicy::optional("habilidades_blandas", &["nombre"]),
        GroupPolicy::optional("idiomas", &["idioma", "nivel"]),
        GroupPolicy::optional("certificaciones", &["nombre", "institucion"]),
    ]
}

// ─── Labels ─────────────────────────────────────────────────────────────────

/// Display labels keyed by normalized path. Paths without an entry fall back
/// to a title-cased last segment.
pub fn labels() -> LabelTable {
    LabelTable::new()
        .with("datos_personales.nombre", "Nombre")
        .with("datos_personales.apellidos", "Apellidos")
        .with("datos_personales.correo", "Correo electrónico")
        .with("datos_personales.telefono", "Teléfono")
        .with("datos_personales.fecha_nacimiento", "Fecha de nacimiento")
        .with("datos_personales.ciudad", "Ciudad")
        .with("datos_personales.pais", "País")
        .with("resumen", "Resumen profesional")
        .with("educaciones.titulo", "Título")
        .with("educaciones.institucion", "Institución")
        .with("educaciones.tipo", "Tipo de educación")
        .with("educaciones.periodo_inicio", "Fecha de inicio")
        .with("educaciones.periodo_fin", "Fecha de fin")
        .with("experiencias.puesto", "Puesto")
        .with("experiencias.empresa", "Empresa")
        .with("experiencias.periodo_inicio", "Fecha de inicio")
        .with("experiencias.periodo_fin", "Fecha de fin")
        .with("experiencias.funciones.descripcion", "Descripción de la función")
        .with("experiencias.referencias.nombre", "Nombre de la referencia")
        .with("experiencias.referencias.contacto", "Contacto de la referencia")
        .with("experiencias.referencias.relacion", "Relación con la referencia")
        .with("experiencias.referencias.correo", "Correo de la referencia")
        .with("habilidades_tecnicas.nombre", "Habilidad técnica")
        .with("habilidades_tecnicas.nivel", "Nivel de dominio")
        .with("habilidades_blandas.nombre", "Habilidad blanda")
        .with("idiomas.idioma", "Idioma")
        .with("idiomas.nivel", "Nivel de idioma")
        .with("referencias.nombre", "Nombre de la referencia")
        .with("referencias.contacto", "Contacto de la referencia")
        .with("referencias.relacion", "Relación con la referencia")
        .with("referencias.correo", "Correo de la referencia")
        .with("certificaciones.nombre", "Nombre de la certificación")
        .with("certificaciones.institucion", "Institución certificadora")
        .with("certificaciones.fecha", "Fecha de certificación")
}

// ─── Step plan ──────────────────────────────────────────────────────────────

/// Number of wizard steps in the curriculum plan.
pub const STEP_COUNT: u8 = 6;

/// The full curriculum rule table: step-bound base rules plus the
/// always-active phone and date rules.
pub fn plan(catalogs: &Catalogs) -> StepPlan {
    let education_types = catalogs.education_types.clone();
    let language_levels = catalogs.language_levels.clone();

    StepPlan::new(STEP_COUNT)
        // Step 1: personal data + summary.
        .bind(
            1,
            "datos_personales.nombre",
            Rule::new().required().min_length(2).max_length(60),
        )
        .bind(
            1,
            "datos_personales.apellidos",
            Rule::new().required().min_length(2).max_length(60),
        )
        .bind(
            1,
            "datos_personales.correo",
            Rule::new()
                .required()
                .max_length(120)
                .pattern(EMAIL_RE.clone()),
        )
        .bind(1, "datos_personales.telefono", Rule::new().required())
        .bind(1, "datos_personales.fecha_nacimiento", Rule::new().required())
        .bind(
            1,
            "datos_personales.ciudad",
            Rule::new().required().max_length(80),
        )
        .bind(
            1,
            "datos_personales.pais",
            Rule::new().required().max_length(56),
        )
        .bind(
            1,
            "resumen",
            Rule::new().required().min_length(50).max_length(1500),
        )
        // Step 2: educations.
        .bind(
            2,
            "educaciones[*].titulo",
            Rule::new().required().min_length(3).max_length(120),
        )
        .bind(
            2,
            "educaciones[*].institucion",
            Rule::new().required().min_length(3).max_length(120),
        )
        .bind(
            2,
            "educaciones[*].tipo",
            Rule::new().required().validate(member_of(education_types)),
        )
        .bind(2, "educaciones[*].periodo_inicio", Rule::new().required())
        // Step 3: experiences and their nested rows.
        .bind(
            3,
            "experiencias[*].puesto",
            Rule::new().required().min_length(3).max_length(120),
        )
        .bind(
            3,
            "experiencias[*].empresa",
            Rule::new().required().min_length(2).max_length(120),
        )
        .bind(3, "experiencias[*].periodo_inicio", Rule::new().required())
        .bind(
            3,
            "experiencias[*].funciones[*].descripcion",
            Rule::new().required().min_length(5).max_length(300),
        )
        .bind(
            3,
            "experiencias[*].referencias[*].nombre",
            Rule::new().required().min_length(3).max_length(120),
        )
        .bind(
            3,
            "experiencias[*].referencias[*].contacto",
            Rule::new().required().min_length(7).max_length(40),
        )
        .bind(
            3,
            "experiencias[*].referencias[*].relacion",
            Rule::new().required().max_length(80),
        )
        .bind(
            3,
            "experiencias[*].referencias[*].correo",
            Rule::new().pattern(EMAIL_RE.clone()),
        )
        // Step 4: skills and languages.
        .bind(
            4,
            "habilidades_tecnicas[*].nombre",
            Rule::new().required().min_length(2).max_length(80),
        )
        .bind(
            4,
            "habilidades_tecnicas[*].nivel",
            Rule::new().max_length(40),
        )
        .bind(
            4,
            "habilidades_blandas[*].nombre",
            Rule::new().required().min_length(2).max_length(80),
        )
        .bind(
            4,
            "idiomas[*].idioma",
            Rule::new().required().min_length(2).max_length(60),
        )
        .bind(
            4,
            "idiomas[*].nivel",
            Rule::new().required().validate(member_of(language_levels)),
        )
        // Step 5: references.
        .bind(
            5,
            "referencias[*].nombre",
            Rule::new().required().min_length(3).max_length(120),
        )
        .bind(
            5,
            "referencias[*].contacto",
            Rule::new().required().min_length(7).max_length(40),
        )
        .bind(
            5,
            "referencias[*].relacion",
            Rule::new().required().max_length(80),
        )
        .bind(
            5,
            "referencias[*].correo",
            Rule::new().pattern(EMAIL_RE.clone()),
        )
        // Step 6: certifications.
        .bind(
            6,
            "certificaciones[*].nombre",
            Rule::new().required().min_length(3).max_length(120),
        )
        .bind(
            6,
            "certificaciones[*].institucion",
            Rule::new().required().min_length(3).max_length(120),
        )
        // Date rules ride with their own step. Group data is only editable on
        // that step, and cross-step leakage would block step 1 on a bad date
        // the user cannot even see yet.
        .bind(
            2,
            "educaciones[*].periodo_inicio",
            Rule::new().validate(bounded_date),
        )
        .bind(
            2,
            "educaciones[*].periodo_fin",
            Rule::new()
                .validate(end_after_start)
                .with_context(&["periodo_inicio"]),
        )
        .bind(
            3,
            "experiencias[*].periodo_inicio",
            Rule::new().validate(bounded_date),
        )
        .bind(
            3,
            "experiencias[*].periodo_fin",
            Rule::new()
                .validate(end_after_start)
                .with_context(&["periodo_inicio"]),
        )
        .bind(
            6,
            "certificaciones[*].fecha",
            Rule::new().validate(bounded_date),
        )
        // Always active: rules over shared personal-data state, which other
        // steps can touch indirectly.
        .bind_always(
            "datos_personales.telefono",
            Rule::new().pattern(PHONE_RE.clone()),
        )
        .bind_always(
            "datos_personales.fecha_nacimiento",
            Rule::new().validate(bounded_date),
        )
}

/// Assemble the curriculum engine with the given catalogs.
pub fn engine(catalogs: &Catalogs) -> Result<Engine, ShapeError> {
    Engine::new(plan(catalogs), policies(), labels(), &shape())
}
