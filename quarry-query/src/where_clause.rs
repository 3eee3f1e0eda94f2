use std::collections::BTreeMap;

use quarry_common::CoreError;

use crate::ident::quote_ident;

/// A bound parameter value. `gt`/`gte`/`lt`/`lte` lookups parse an
/// all-digit string into an `Integer` so numeric comparisons aren't done as
/// string comparisons; every other lookup binds the (possibly
/// wildcard-wrapped) string verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Integer(i64),
}

const NUMERIC_LOOKUPS: &[&str] = &["gt", "gte", "lt", "lte"];

fn template(lookup: &str) -> Option<&'static str> {
    Some(match lookup {
        "exact" => "{} = :{}",
        "contains" => "{} like :{}",
        "startswith" => "{} like :{}",
        "endswith" => "{} like :{}",
        "gt" => "{} > :{}",
        "gte" => "{} >= :{}",
        "lt" => "{} < :{}",
        "lte" => "{} <= :{}",
        "glob" => "{} glob :{}",
        "like" => "{} like :{}",
        _ => return None,
    })
}

fn convert_value(lookup: &str, value: &str) -> Param {
    let converted = match lookup {
        "contains" => format!("%{value}%"),
        "startswith" => format!("{value}%"),
        "endswith" => format!("%{value}"),
        _ => value.to_string(),
    };
    if NUMERIC_LOOKUPS.contains(&lookup) && !converted.is_empty() && converted.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = converted.parse::<i64>() {
            return Param::Integer(n);
        }
    }
    Param::Text(converted)
}

/// Translates a flat `column` / `column__lookup` → value mapping into an
/// ordered sequence of `AND`-joined SQL clause fragments and their bound
/// parameters.
///
/// Keys are processed in lexicographic order so that `p<i>` parameter names
/// are deterministic across repeated requests with the same filter set.
pub fn build_where_clauses(
    args: &BTreeMap<String, String>,
) -> Result<(Vec<String>, Vec<(String, Param)>), CoreError> {
    let mut clauses = Vec::with_capacity(args.len());
    let mut params = Vec::with_capacity(args.len());

    for (i, (key, value)) in args.iter().enumerate() {
        let (column, lookup) = match key.rsplit_once("__") {
            Some((column, lookup)) => (column, lookup),
            None => (key.as_str(), "exact"),
        };
        let tmpl = template(lookup).ok_or_else(|| {
            CoreError::InvalidSql(format!("Unknown lookup: {lookup}"))
        })?;

        let param_name = format!("p{i}");
        clauses.push(tmpl.replacen("{}", &quote_ident(column), 1).replacen(
            "{}",
            &param_name,
            1,
        ));
        params.push((param_name, convert_value(lookup, value)));
    }

    Ok((clauses, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_to_exact_lookup() {
        let (clauses, params) = build_where_clauses(&args(&[("name", "bob")])).unwrap();
        assert_eq!(clauses, vec!["\"name\" = :p0"]);
        assert_eq!(params, vec![("p0".to_string(), Param::Text("bob".into()))]);
    }

    #[test]
    fn contains_wraps_with_wildcards() {
        let (clauses, params) =
            build_where_clauses(&args(&[("name__contains", "ob")])).unwrap();
        assert_eq!(clauses, vec!["\"name\" like :p0"]);
        assert_eq!(params[0].1, Param::Text("%ob%".into()));
    }

    #[test]
    fn numeric_comparison_parses_digits_as_integer() {
        let (_clauses, params) = build_where_clauses(&args(&[("age__gt", "21")])).unwrap();
        assert_eq!(params[0].1, Param::Integer(21));
    }

    #[test]
    fn numeric_comparison_keeps_non_digit_strings_as_text() {
        let (_clauses, params) = build_where_clauses(&args(&[("age__gt", "21st")])).unwrap();
        assert_eq!(params[0].1, Param::Text("21st".into()));
    }

    #[test]
    fn keys_are_bound_in_lexicographic_order() {
        let (clauses, params) =
            build_where_clauses(&args(&[("zeta", "1"), ("alpha", "2")])).unwrap();
        // BTreeMap iterates "alpha" before "zeta".
        assert_eq!(clauses, vec!["\"alpha\" = :p0", "\"zeta\" = :p1"]);
        assert_eq!(params[0].0, "p0");
        assert_eq!(params[1].0, "p1");
    }

    #[test]
    fn unknown_lookup_is_invalid_sql() {
        let err = build_where_clauses(&args(&[("name__bogus", "x")])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSql(_)));
    }
}
