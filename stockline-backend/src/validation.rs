/// Declarative request validation over a JSON key/value map.
use serde_json::{Map, Value};

/// Expected shape of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Numeric,
    Int,
    Email,
}

/// Rule for one request field: display label, required flag and an
/// optional type check. Type checks only run on present, non-blank values.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: Option<FieldKind>,
}

impl FieldRule {
    pub const fn required(
        field: &'static str,
        label: &'static str,
        kind: Option<FieldKind>,
    ) -> Self {
        Self {
            field,
            label,
            required: true,
            kind,
        }
    }

    pub const fn optional(
        field: &'static str,
        label: &'static str,
        kind: Option<FieldKind>,
    ) -> Self {
        Self {
            field,
            label,
            required: false,
            kind,
        }
    }
}

/// Check a request map against a rule table, returning the error messages
/// in rule order. An empty vector means the request is acceptable.
pub fn check_fields(request: &Map<String, Value>, rules: &[FieldRule]) -> Vec<String> {
    let mut errors = Vec::new();

    for rule in rules {
        let value = request.get(rule.field);

        if is_blank(value) {
            if rule.required {
                errors.push(format!("{} is required.", rule.label));
            }
            continue;
        }
        let value = value.unwrap();

        match rule.kind {
            Some(FieldKind::Str) => {
                if !value.is_string() {
                    errors.push(format!("The {} must be a string.", rule.label));
                }
            }
            Some(FieldKind::Numeric | FieldKind::Int) => {
                if !is_numeric(value) {
                    errors.push(format!("The {} must be a number.", rule.label));
                }
            }
            Some(FieldKind::Email) => {
                if !is_email(value) {
                    errors.push(format!("The {} must be a valid email address.", rule.label));
                }
            }
            None => {}
        }
    }

    errors
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok(),
        _ => false,
    }
}

fn is_email(value: &Value) -> bool {
    let Value::String(s) = value else {
        return false;
    };
    let s = s.trim();
    if s.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    const LOGIN_RULES: &[FieldRule] = &[
        FieldRule::required("email", "Email", Some(FieldKind::Email)),
        FieldRule::required("password", "Password", None),
    ];

    #[test]
    fn test_valid_request_has_no_errors() {
        let req = request(json!({"email": "a@b.com", "password": "secret"}));
        assert!(check_fields(&req, LOGIN_RULES).is_empty());
    }

    #[test]
    fn test_invalid_email_yields_exactly_one_format_error() {
        let req = request(json!({"email": "not-an-email", "password": "x"}));
        let errors = check_fields(&req, LOGIN_RULES);
        assert_eq!(errors, vec!["The Email must be a valid email address."]);
    }

    #[test]
    fn test_missing_and_blank_fields_fail_required() {
        let req = request(json!({"email": "   "}));
        let errors = check_fields(&req, LOGIN_RULES);
        assert_eq!(
            errors,
            vec!["Email is required.", "Password is required."]
        );
    }

    #[test]
    fn test_type_checks_skip_blank_optional_fields() {
        let rules = &[FieldRule::optional("name", "Name", Some(FieldKind::Str))];
        let req = request(json!({"name": ""}));
        assert!(check_fields(&req, rules).is_empty());
    }

    #[test]
    fn test_string_rule_rejects_numbers() {
        let rules = &[FieldRule::required("name", "Name", Some(FieldKind::Str))];
        let req = request(json!({"name": 42}));
        assert_eq!(check_fields(&req, rules), vec!["The Name must be a string."]);
    }

    #[test]
    fn test_numeric_rule_accepts_numeric_strings() {
        let rules = &[FieldRule::required("value", "Value", Some(FieldKind::Numeric))];
        assert!(check_fields(&request(json!({"value": "12.5"})), rules).is_empty());
        assert!(check_fields(&request(json!({"value": 12.5})), rules).is_empty());
        assert_eq!(
            check_fields(&request(json!({"value": "twelve"})), rules),
            vec!["The Value must be a number."]
        );
    }

    #[test]
    fn test_email_edge_cases() {
        let rules = &[FieldRule::required("email", "Email", Some(FieldKind::Email))];
        for bad in ["@b.com", "a@b", "a b@c.com", "a@.com", "a@b.com."] {
            let errors = check_fields(&request(json!({ "email": bad })), rules);
            assert_eq!(errors.len(), 1, "expected {bad:?} to be rejected");
        }
        assert!(check_fields(&request(json!({"email": "a.b@c.co.uk"})), rules).is_empty());
    }
}
