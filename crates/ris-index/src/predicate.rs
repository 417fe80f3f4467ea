//! Rendering of facet filters as Lance SQL predicates.

use ris_core::filter::{Filter, Match};

fn quote(value: &str) -> String { format!("'{}'", value.replace('\'', "''")) }

/// SQL for `filter`, or `None` when it imposes no restriction.
///
/// Keys outside `columns` and empty membership sets render as `FALSE`, the
/// same outcome as a missing payload field.
pub fn to_sql(filter: &Filter, columns: &[&str]) -> Option<String> {
    if filter.is_unrestricted() {
        return None;
    }
    let clauses: Vec<String> = filter
        .must
        .iter()
        .map(|c| {
            if !columns.contains(&c.key.as_str()) {
                return "FALSE".to_string();
            }
            let column = format!("`{}`", c.key);
            match &c.matcher {
                Match::Value(v) => format!("{column} = {}", quote(v)),
                Match::Any(vs) if vs.is_empty() => "FALSE".to_string(),
                Match::Any(vs) => format!("{column} IN ({})", vs.iter().map(|v| quote(v)).collect::<Vec<_>>().join(", ")),
            }
        })
        .collect();
    Some(clauses.join(" AND "))
}
