//! HTML views for the registry's browser-facing pages.
//!
//! Views are generated by string construction and selected by template
//! identifier; the context is a JSON mapping produced by serializing the
//! records. A failed render is an error for that request, never a crash.

use crate::error::{RegistryError, Result};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the named view over a JSON context mapping.
    pub fn render(&self, template: &str, context: &Value) -> Result<String> {
        match template {
            "get" => render_get(context),
            "index" => render_index(context),
            other => Err(RegistryError::RenderFailure {
                template: other.to_string(),
                cause: "unknown template".to_string(),
            }),
        }
    }
}

/// Single-schema view: the full record under the `schema` key.
fn render_get(context: &Value) -> Result<String> {
    let schema = &context["schema"];
    let event_type = context_str(schema, "event_type", "get")?;
    let source = context_str(schema, "source", "get")?;
    let created_at = context_str(schema, "created_at", "get")?;
    let schema_body = context_str(schema, "schema_body", "get")?;

    let mut html = String::new();
    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title} - Event Schema Registry</title>
</head>
<body>
    <h1>{title}</h1>
    <dl>
        <dt>Source</dt><dd>{source}</dd>
        <dt>Created</dt><dd>{created_at}</dd>
    </dl>
"#,
        title = escape_html(event_type),
        source = escape_html(source),
        created_at = escape_html(created_at),
    ));
    html.push_str(&format!(
        "    <pre>{}</pre>\n</body>\n</html>\n",
        escape_html(schema_body)
    ));

    Ok(html)
}

/// Index view: the ordered public records under the `schemas` key.
fn render_index(context: &Value) -> Result<String> {
    let schemas = context["schemas"]
        .as_array()
        .ok_or_else(|| missing_context("index", "schemas"))?;

    let mut html = String::new();
    html.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Event Schema Registry</title>
</head>
<body>
    <h1>Event Schemas</h1>
"#,
    );

    if schemas.is_empty() {
        html.push_str("    <p>No public schemas.</p>\n");
    } else {
        html.push_str(
            "    <table>\n        <tr><th>Type</th><th>Source</th><th>Created</th></tr>\n",
        );
        for schema in schemas {
            let event_type = context_str(schema, "event_type", "index")?;
            let source = context_str(schema, "source", "index")?;
            let created_at = context_str(schema, "created_at", "index")?;
            html.push_str(&format!(
                "        <tr><td><a href=\"/schema/{link}\">{link}</a></td><td>{source}</td><td>{created_at}</td></tr>\n",
                link = escape_html(event_type),
                source = escape_html(source),
                created_at = escape_html(created_at),
            ));
        }
        html.push_str("    </table>\n");
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn context_str<'a>(value: &'a Value, field: &str, template: &str) -> Result<&'a str> {
    value[field]
        .as_str()
        .ok_or_else(|| missing_context(template, field))
}

fn missing_context(template: &str, field: &str) -> RegistryError {
    RegistryError::RenderFailure {
        template: template.to_string(),
        cause: format!("context is missing field '{}'", field),
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
