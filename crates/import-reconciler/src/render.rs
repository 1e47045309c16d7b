//! Import statement text.

/// Bindings of one declaration, in the order they are written
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Bindings<'a> {
    pub default: Option<&'a str>,
    pub namespace: Option<&'a str>,
    pub named: Vec<&'a str>,
}

/// Everything but the bindings
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tail<'a> {
    pub module_literal: &'a str,
    pub attributes: Option<&'a str>,
    pub terminator: &'a str,
    pub bracket_spacing: bool,
}

/// `import <default>, * as <ns> | { <named> } from <module> [attributes]<terminator>`,
/// omitting absent segments. With no bindings at all this is a side-effect
/// import.
pub(crate) fn render_statement(bindings: &Bindings<'_>, tail: Tail<'_>) -> String {
    let mut clauses = Vec::with_capacity(2);
    if let Some(default) = bindings.default {
        clauses.push(default.to_string());
    }
    if let Some(ns) = bindings.namespace {
        clauses.push(format!("* as {ns}"));
    } else if !bindings.named.is_empty() {
        let list = bindings.named.join(", ");
        if tail.bracket_spacing {
            clauses.push(format!("{{ {list} }}"));
        } else {
            clauses.push(format!("{{{list}}}"));
        }
    }

    let mut out = String::from("import ");
    if !clauses.is_empty() {
        out.push_str(&clauses.join(", "));
        out.push_str(" from ");
    }
    out.push_str(tail.module_literal);
    if let Some(attributes) = tail.attributes {
        out.push(' ');
        out.push_str(attributes);
    }
    out.push_str(tail.terminator);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tail(module_literal: &str) -> Tail<'_> {
        Tail {
            module_literal,
            attributes: None,
            terminator: ";",
            bracket_spacing: true,
        }
    }

    #[test]
    fn side_effect() {
        assert_eq!(
            render_statement(&Bindings::default(), tail("'polyfill'")),
            "import 'polyfill';"
        );
    }

    #[test]
    fn default_and_named() {
        let bindings = Bindings {
            default: Some("React"),
            named: vec!["useState", "useEffect"],
            ..Default::default()
        };
        assert_eq!(
            render_statement(&bindings, tail("'react'")),
            "import React, { useState, useEffect } from 'react';"
        );
    }

    #[test]
    fn namespace_wins_over_named() {
        let bindings = Bindings {
            default: Some("D"),
            namespace: Some("ns"),
            named: vec!["ignored"],
        };
        assert_eq!(
            render_statement(&bindings, tail("\"mod\"")),
            "import D, * as ns from \"mod\";"
        );
    }

    #[test]
    fn tight_brackets_attributes_and_no_semicolon() {
        let bindings = Bindings {
            named: vec!["a"],
            ..Default::default()
        };
        let tail = Tail {
            module_literal: "'./data.json'",
            attributes: Some("with { type: 'json' }"),
            terminator: "",
            bracket_spacing: false,
        };
        assert_eq!(
            render_statement(&bindings, tail),
            "import {a} from './data.json' with { type: 'json' }"
        );
    }
}
