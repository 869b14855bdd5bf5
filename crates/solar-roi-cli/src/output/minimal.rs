use serde_json::Value;

use super::{result_of, scalar_text};

/// Headline figures, in order of preference.
const HEADLINE_KEYS: [&str; 4] = [
    "total_lifetime_savings",
    "roi_pct",
    "break_even_year",
    "monthly_savings",
];

/// Print just the headline answer: lifetime savings when present,
/// otherwise the first populated headline field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result = result_of(value);

    if let Value::Object(map) = result {
        for key in HEADLINE_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return scalar_text(val);
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, scalar_text(val));
        }
    }

    scalar_text(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefers_lifetime_savings() {
        let v = json!({"result": {"roi_pct": "-8.8", "total_lifetime_savings": "-1547"}});
        assert_eq!(minimal_line(&v), "-1547");
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let v = json!({"policy": "strict"});
        assert_eq!(minimal_line(&v), "policy: strict");
    }
}
