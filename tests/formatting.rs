use formgate::rule::REQUIRED_MARKER;
use formgate::{ErrorMap, LabelTable, aggregate, format};

fn map(entries: &[(&str, &str)]) -> ErrorMap {
    let mut m = ErrorMap::new();
    for (k, v) in entries {
        m.insert(*k, *v);
    }
    m
}

// ─── Aggregation ────────────────────────────────────────────────────────────

#[test]
fn later_maps_override_earlier_ones_for_the_same_key() {
    let merged = aggregate([map(&[("a.b", "generic")]), map(&[("a.b", "specific")])]);
    assert_eq!(merged.get("a.b"), Some("specific"));
    assert_eq!(merged.len(), 1);
}

#[test]
fn distinct_keys_pass_through_untouched() {
    let merged = aggregate([map(&[("a.b", "x")]), map(&[("c.d", "y")])]);
    assert_eq!(merged.get("a.b"), Some("x"));
    assert_eq!(merged.get("c.d"), Some("y"));
    assert_eq!(merged.len(), 2);
}

#[test]
fn aggregating_nothing_is_empty() {
    assert!(aggregate(Vec::<ErrorMap>::new()).is_empty());
}

// ─── Formatting ─────────────────────────────────────────────────────────────

#[test]
fn required_markers_are_rewritten_with_table_labels() {
    let labels = LabelTable::new().with("referencias.contacto", "Contacto de la referencia");
    let raw = map(&[("referencias.2.contacto", REQUIRED_MARKER)]);
    let formatted = format(raw, &labels);
    assert_eq!(
        formatted.get("referencias.2.contacto"),
        Some("Required field: Contacto de la referencia")
    );
}

#[test]
fn unlabeled_paths_fall_back_to_title_case() {
    let raw = map(&[("experiencias.0.periodo_fin", REQUIRED_MARKER)]);
    let formatted = format(raw, &LabelTable::new());
    assert_eq!(
        formatted.get("experiencias.0.periodo_fin"),
        Some("Required field: Periodo Fin")
    );
}

#[test]
fn non_marker_messages_pass_through() {
    let labels = LabelTable::new().with("a.b", "Campo");
    let raw = map(&[("a.b", "end date cannot precede the start date")]);
    let formatted = format(raw, &labels);
    assert_eq!(formatted.get("a.b"), Some("end date cannot precede the start date"));
}

#[test]
fn formatting_is_idempotent() {
    let labels = LabelTable::new().with("idiomas.nivel", "Nivel de idioma");
    let raw = map(&[
        ("idiomas.0.nivel", REQUIRED_MARKER),
        ("idiomas.1.nivel", "must be one of: A1, A2"),
    ]);
    let once = format(raw, &labels);
    let twice = format(once.clone(), &labels);
    assert_eq!(once, twice);
}

// ─── Serialization ──────────────────────────────────────────────────────────

#[test]
fn error_map_serializes_to_a_flat_object() {
    let m = map(&[("datos_personales.correo", "Required field: Correo electrónico")]);
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "datos_personales.correo": "Required field: Correo electrónico"
        })
    );

    // Round-trips: a server-side error payload can be deserialized into the
    // same shape and pushed through the formatter.
    let back: ErrorMap = serde_json::from_value(json).unwrap();
    assert_eq!(back, m);
}

#[test]
fn label_table_lookup_by_normalized_path() {
    let labels = LabelTable::new().with("educaciones.titulo", "Título");
    assert_eq!(labels.label_for("educaciones.4.titulo"), "Título");
    assert_eq!(labels.label_for("educaciones.titulo"), "Título");
    assert_eq!(labels.label_for("otros.campo_libre"), "Campo Libre");
}
