//! Flattening of embedded parent records into top-level fields.

use serde_json::{Map, Value};

/// Copies the first non-null value found at one of `sources` (dotted paths
/// into the row) to the top-level field `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub target: &'static str,
    pub sources: &'static [&'static str],
}

impl Projection {
    pub const fn new(target: &'static str, sources: &'static [&'static str]) -> Self {
        Self { target, sources }
    }
}

/// Resolves a dotted path. Missing keys, `null` links and non-object
/// intermediates all resolve to `None`.
pub fn lookup<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(row, |current, key| current.as_object()?.get(key))
        .filter(|value| !value.is_null())
}

/// Applies `projections` to `row`. Targets whose sources are all absent are
/// set to `null`; rows that are not JSON objects are returned untouched.
pub fn flatten(mut row: Value, projections: &[Projection]) -> Value {
    let resolved: Vec<(&'static str, Value)> = projections
        .iter()
        .map(|projection| {
            let value = projection
                .sources
                .iter()
                .find_map(|path| lookup(&row, path))
                .cloned()
                .unwrap_or(Value::Null);
            (projection.target, value)
        })
        .collect();

    if let Some(fields) = row.as_object_mut() {
        insert_all(fields, resolved);
    }
    row
}

fn insert_all(fields: &mut Map<String, Value>, resolved: Vec<(&'static str, Value)>) {
    for (target, value) in resolved {
        fields.insert(target.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const MEETING_FIELDS: &[Projection] = &[
        Projection::new("projeto_nome", &["projetos.nome"]),
        Projection::new("nome_empresa", &["projetos.clientes.nome_empresa"]),
        Projection::new("nome_completo", &["projetos.clientes.nome_completo"]),
    ];

    #[test]
    fn copies_nested_parent_fields() {
        let row = json!({
            "id": 1,
            "projetos": {
                "nome": "Portal",
                "clientes": {"nome_empresa": "ACME", "nome_completo": null}
            }
        });

        let flat = flatten(row, MEETING_FIELDS);

        assert_eq!(flat["projeto_nome"], "Portal");
        assert_eq!(flat["nome_empresa"], "ACME");
        assert_eq!(flat["nome_completo"], Value::Null);
        assert_eq!(flat["id"], 1);
        assert_eq!(flat["projetos"]["nome"], "Portal");
    }

    #[test]
    fn absent_parent_yields_null_fields() {
        let flat = flatten(json!({"id": 2, "projetos": null}), MEETING_FIELDS);
        assert_eq!(flat["projeto_nome"], Value::Null);
        assert_eq!(flat["nome_empresa"], Value::Null);

        let flat = flatten(json!({"id": 3}), MEETING_FIELDS);
        assert_eq!(flat["nome_completo"], Value::Null);
    }

    #[test]
    fn non_object_intermediates_do_not_panic() {
        let flat = flatten(json!({"projetos": "broken"}), MEETING_FIELDS);
        assert_eq!(flat["projeto_nome"], Value::Null);

        let flat = flatten(json!({"projetos": [1, 2]}), MEETING_FIELDS);
        assert_eq!(flat["nome_empresa"], Value::Null);
    }

    #[test]
    fn non_object_rows_are_returned_unchanged() {
        assert_eq!(flatten(json!(42), MEETING_FIELDS), json!(42));
        assert_eq!(flatten(Value::Null, MEETING_FIELDS), Value::Null);
    }

    #[test]
    fn first_non_null_source_wins() {
        const NAME: &[Projection] = &[Projection::new(
            "cliente_nome",
            &["clientes.nome_empresa", "clientes.nome_completo"],
        )];

        let company = flatten(
            json!({"clientes": {"nome_empresa": "ACME", "nome_completo": "Ana"}}),
            NAME,
        );
        assert_eq!(company["cliente_nome"], "ACME");

        let person = flatten(
            json!({"clientes": {"nome_empresa": null, "nome_completo": "Ana"}}),
            NAME,
        );
        assert_eq!(person["cliente_nome"], "Ana");
    }
}
