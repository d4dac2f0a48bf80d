//! Ordered field-list writer for single proxy entries.
//!
//! Each proxy kind describes itself as a fixed list of [`Field`]s; a field
//! whose value is absent produces no line at all.

use crate::utils::yaml_single_quote;

/// One `key: value` line (or nested block) of a proxy entry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Field<'a> {
    /// Single-quoted string scalar
    Str(&'a str, Option<&'a str>),
    /// Scalar written verbatim
    Plain(&'a str, &'a str),
    Int(&'a str, u32),
    Bool(&'a str, Option<bool>),
    /// Nested list of quoted strings, skipped when empty
    List(&'a str, &'a [String]),
    /// Nested mapping, skipped when no child renders
    Group(&'a str, Vec<Field<'a>>),
}

impl<'a> Field<'a> {
    pub(crate) fn str(key: &'a str, value: &'a str) -> Self {
        Field::Str(key, Some(value))
    }

    pub(crate) fn opt_str(key: &'a str, value: &'a Option<String>) -> Self {
        Field::Str(key, value.as_deref())
    }

    /// `key: true` only when the flag is set.
    pub(crate) fn flag(key: &'a str, value: bool) -> Self {
        Field::Bool(key, value.then_some(true))
    }

    fn is_present(&self) -> bool {
        match self {
            Field::Str(_, value) => value.is_some(),
            Field::Plain(..) | Field::Int(..) => true,
            Field::Bool(_, value) => value.is_some(),
            Field::List(_, items) => !items.is_empty(),
            Field::Group(_, children) => children.iter().any(Field::is_present),
        }
    }

    fn write(&self, indent: usize, out: &mut Vec<String>) {
        if !self.is_present() {
            return;
        }
        let pad = " ".repeat(indent);
        match self {
            Field::Str(key, Some(value)) => {
                out.push(format!("{}{}: {}", pad, key, yaml_single_quote(value)))
            }
            Field::Plain(key, value) => out.push(format!("{}{}: {}", pad, key, value)),
            Field::Int(key, value) => out.push(format!("{}{}: {}", pad, key, value)),
            Field::Bool(key, Some(value)) => out.push(format!("{}{}: {}", pad, key, value)),
            Field::List(key, items) => {
                out.push(format!("{}{}:", pad, key));
                for item in items.iter() {
                    out.push(format!("{}  - {}", pad, yaml_single_quote(item)));
                }
            }
            Field::Group(key, children) => {
                out.push(format!("{}{}:", pad, key));
                for child in children {
                    child.write(indent + 2, out);
                }
            }
            Field::Str(_, None) | Field::Bool(_, None) => {}
        }
    }
}

/// Render a field list as one YAML sequence item (`- first: ...`).
pub(crate) fn render_item(fields: &[Field<'_>]) -> String {
    let mut lines = Vec::with_capacity(fields.len());
    for field in fields {
        field.write(2, &mut lines);
    }
    if let Some(first) = lines.first_mut() {
        first.replace_range(..2, "- ");
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_emit_nothing() {
        let none: Option<String> = None;
        let fields = vec![
            Field::str("name", "a"),
            Field::opt_str("sni", &none),
            Field::Bool("skip-cert-verify", None),
            Field::flag("tls", false),
            Field::List("alpn", &[]),
            Field::Group("ws-opts", vec![Field::Str("path", None)]),
            Field::Int("port", 443),
        ];
        assert_eq!(render_item(&fields), "- name: 'a'\n  port: 443");
    }

    #[test]
    fn test_nested_list_and_group() {
        let alpn = vec!["h2".to_string(), "http/1.1".to_string()];
        let fields = vec![
            Field::Plain("type", "vless"),
            Field::List("alpn", &alpn),
            Field::Group(
                "ws-opts",
                vec![
                    Field::str("path", "/ws"),
                    Field::Group("headers", vec![Field::str("Host", "it's.example")]),
                ],
            ),
        ];
        assert_eq!(
            render_item(&fields),
            "- type: vless\n  alpn:\n    - 'h2'\n    - 'http/1.1'\n  ws-opts:\n    path: '/ws'\n    headers:\n      Host: 'it''s.example'"
        );
    }

    #[test]
    fn test_empty_field_list() {
        assert_eq!(render_item(&[]), "");
    }
}
