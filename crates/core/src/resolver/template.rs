//! Statement templates and placeholder rendering.
//!
//! Templates carry statement text with named `:PLACEHOLDER` markers and a
//! declaration for every placeholder they reference. Binding a template
//! against a request context is a pure function: explicit request argument
//! first, declared default second, error when neither is present.

use serde_json::Value;

use super::error::TemplateResolutionError;
use super::types::RequestContext;
use crate::statement::{BoundStatement, VariableMap};

/// Declares how one placeholder resolves.
///
/// `argument` is a dotted path into the request context (see
/// [`RequestContext::lookup`]); `default` is substituted verbatim when the
/// argument is absent. A spec without a default marks a required,
/// documented caller argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub argument: String,
    pub default: Option<Value>,
}

impl ParamSpec {
    /// A required caller argument; missing it is a client input error.
    pub fn required(argument: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            default: None,
        }
    }

    /// An optional argument with a declared default.
    pub fn with_default(argument: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            argument: argument.into(),
            default: Some(default.into()),
        }
    }
}

/// One statement of a resolver binding: text plus placeholder declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTemplate {
    text: String,
    params: Vec<(String, ParamSpec)>,
}

impl StatementTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Declares a placeholder binding. `placeholder` is the bare name
    /// without the `:` prefix.
    pub fn param(mut self, placeholder: impl Into<String>, spec: ParamSpec) -> Self {
        self.params.push((placeholder.into(), spec));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &[(String, ParamSpec)] {
        &self.params
    }

    /// Placeholder names referenced by the statement text, in order of
    /// first appearance.
    pub fn placeholders_in_text(&self) -> Vec<String> {
        let mut found = Vec::new();
        for token in scan(&self.text) {
            if let Token::Placeholder(name) = token {
                if !found.iter().any(|f| f == name) {
                    found.push(name.to_string());
                }
            }
        }
        found
    }

    /// Resolves every placeholder against the request context.
    ///
    /// Resolution order per placeholder: explicit request argument, then
    /// declared default, then failure naming the missing key. A placeholder
    /// present in the text but absent from the declarations is a template
    /// defect and fails as well; the registry catches those at build time.
    pub fn bind(&self, ctx: &RequestContext) -> Result<BoundStatement, TemplateResolutionError> {
        let mut variables = VariableMap::new();

        for (placeholder, spec) in &self.params {
            let value = match ctx.lookup(&spec.argument) {
                Some(value) => value,
                None => match &spec.default {
                    Some(default) => default.clone(),
                    None => {
                        return Err(TemplateResolutionError::MissingArgument(
                            placeholder.clone(),
                        ))
                    }
                },
            };
            variables.insert(placeholder.clone(), value);
        }

        for placeholder in self.placeholders_in_text() {
            if !variables.contains_key(&placeholder) {
                return Err(TemplateResolutionError::UndeclaredPlaceholder(placeholder));
            }
        }

        Ok(BoundStatement::new(self.text.clone(), variables))
    }
}

/// Produces the fully substituted statement text for backends that accept
/// only raw statements (no native named-parameter binding).
///
/// Substitution is token-wise: a `:NAME` marker is replaced only when
/// `NAME` matches a variable exactly, so `:USER` never rewrites part of
/// `:USERNAME`. String values are quoted with embedded quotes doubled.
pub fn render_text(statement: &BoundStatement) -> String {
    let mut out = String::with_capacity(statement.text.len());
    for token in scan(&statement.text) {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Placeholder(name) => match statement.variables.get(name) {
                Some(value) => out.push_str(&sql_literal(value)),
                None => {
                    out.push(':');
                    out.push_str(name);
                }
            },
        }
    }
    out
}

fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        // Compound values travel as quoted JSON text.
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

enum Token<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Splits statement text into literal runs and `:NAME` placeholder tokens.
/// A placeholder starts with `:` followed by an ASCII letter or underscore
/// and extends over alphanumerics and underscores.
fn scan(text: &str) -> impl Iterator<Item = Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b':'
            && i + 1 < bytes.len()
            && (bytes[i + 1].is_ascii_alphabetic() || bytes[i + 1] == b'_')
        {
            let mut end = i + 1;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            if literal_start < i {
                tokens.push(Token::Literal(&text[literal_start..i]));
            }
            tokens.push(Token::Placeholder(&text[i + 1..end]));
            literal_start = end;
            i = end;
        } else {
            i += 1;
        }
    }
    if literal_start < bytes.len() {
        tokens.push(Token::Literal(&text[literal_start..]));
    }

    tokens.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serde_json::Map;

    fn context_with(arguments: Value) -> RequestContext {
        RequestContext::new(
            arguments.as_object().cloned().unwrap_or_else(Map::new),
            None,
            None,
        )
    }

    fn list_template() -> StatementTemplate {
        StatementTemplate::new(
            "Select id From in_app_notification \
             Where receiver_username = :USERNAME \
             Order By created_time Desc Limit :LIMIT Offset :OFFSET",
        )
        .param("USERNAME", ParamSpec::required("username"))
        .param("LIMIT", ParamSpec::with_default("limit", 10))
        .param("OFFSET", ParamSpec::with_default("offset", 0))
    }

    #[test]
    fn test_explicit_argument_wins_over_default() {
        let bound = list_template()
            .bind(&context_with(json!({"username": "alice", "limit": 5})))
            .unwrap();

        assert_eq!(bound.variables["USERNAME"], json!("alice"));
        assert_eq!(bound.variables["LIMIT"], json!(5));
        assert_eq!(bound.variables["OFFSET"], json!(0));
    }

    #[test]
    fn test_missing_optional_arguments_use_declared_defaults() {
        let bound = list_template()
            .bind(&context_with(json!({"username": "alice"})))
            .unwrap();

        assert_eq!(bound.variables["LIMIT"], json!(10));
        assert_eq!(bound.variables["OFFSET"], json!(0));
    }

    #[test]
    fn test_missing_required_argument_fails_naming_the_key() {
        let err = list_template()
            .bind(&context_with(json!({"limit": 5})))
            .unwrap_err();

        assert_eq!(
            err,
            TemplateResolutionError::MissingArgument("USERNAME".to_string())
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_undeclared_placeholder_in_text_fails() {
        let template = StatementTemplate::new("Select :FIELD From t")
            .param("OTHER", ParamSpec::with_default("other", 1));
        let err = template.bind(&context_with(json!({}))).unwrap_err();

        assert_eq!(
            err,
            TemplateResolutionError::UndeclaredPlaceholder("FIELD".to_string())
        );
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_placeholders_in_text_order_and_dedup() {
        let template = StatementTemplate::new(
            "Update t Set a = :A, b = :B Where id = :ID And a <> :A",
        );
        assert_eq!(template.placeholders_in_text(), vec!["A", "B", "ID"]);
    }

    #[test]
    fn test_render_text_substitutes_all_values() {
        let bound = list_template()
            .bind(&context_with(
                json!({"username": "alice", "limit": 5, "offset": 0}),
            ))
            .unwrap();

        assert_eq!(
            render_text(&bound),
            "Select id From in_app_notification \
             Where receiver_username = 'alice' \
             Order By created_time Desc Limit 5 Offset 0"
        );
    }

    #[test]
    fn test_no_cross_substitution_between_similar_names() {
        let template = StatementTemplate::new("Select :USER, :USERNAME From t")
            .param("USER", ParamSpec::required("user"))
            .param("USERNAME", ParamSpec::required("username"));
        let bound = template
            .bind(&context_with(json!({"user": "u", "username": "long"})))
            .unwrap();

        assert_eq!(render_text(&bound), "Select 'u', 'long' From t");
    }

    #[test]
    fn test_render_text_quotes_embedded_quotes() {
        let template =
            StatementTemplate::new("Select :NAME").param("NAME", ParamSpec::required("name"));
        let bound = template
            .bind(&context_with(json!({"name": "O'Brien"})))
            .unwrap();

        assert_eq!(render_text(&bound), "Select 'O''Brien'");
    }

    #[test]
    fn test_render_text_null_and_bool_literals() {
        let template = StatementTemplate::new("Select :A, :B")
            .param("A", ParamSpec::with_default("a", Value::Null))
            .param("B", ParamSpec::with_default("b", true));
        let bound = template.bind(&context_with(json!({}))).unwrap();

        assert_eq!(render_text(&bound), "Select NULL, true");
    }
}
