use crate::dialect::SourceDialect;
use crate::error::{ImportError, Result};
use std::ops::Range;
use tree_sitter::{Node, Parser};

/// A top-level `import` declaration found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingImport {
    /// Module specifier without its quotes
    pub module: String,
    /// Module specifier as written, quotes included
    pub module_literal: String,
    pub default_binding: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<ImportedName>,
    /// Byte range of the whole declaration, trailing whitespace excluded
    pub range: Range<usize>,
    /// `import type ...`
    pub type_only: bool,
    pub has_semicolon: bool,
    /// `with { ... }` / `assert { ... }` clause as written
    pub attributes: Option<String>,
}

impl ExistingImport {
    /// Is `name` imported by this declaration, under any alias?
    pub fn imports_name(&self, name: &str) -> bool {
        self.named.iter().any(|n| n.imported == name)
    }
}

/// One `{ ... }` specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    /// Exported name on the module side
    pub imported: String,
    /// Specifier as written (`Button as B`, `type Props`)
    pub text: String,
}

/// Reads the top-level import declarations of a file
pub struct ImportExtractor {
    parser: Parser,
    dialect: SourceDialect,
}

impl ImportExtractor {
    pub fn new(dialect: SourceDialect) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&dialect.tree_sitter_language())
            .map_err(|e| ImportError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(Self { parser, dialect })
    }

    pub fn dialect(&self) -> SourceDialect {
        self.dialect
    }

    /// Import declarations in source order.
    ///
    /// A file that cannot be parsed has no imports; a declaration that
    /// contains a syntax error is skipped.
    pub fn extract(&mut self, text: &str) -> Vec<ExistingImport> {
        let Some(tree) = self.parser.parse(text, None) else {
            log::debug!("{} parser produced no tree; assuming no imports", self.dialect);
            return Vec::new();
        };

        let root = tree.root_node();
        let mut cursor = root.walk();
        let mut imports = Vec::new();
        for child in root.children(&mut cursor) {
            if child.kind() != "import_statement" {
                continue;
            }
            if child.has_error() {
                log::debug!(
                    "Skipping import with syntax errors at byte {}",
                    child.start_byte()
                );
                continue;
            }
            if let Some(import) = read_import(text, child) {
                imports.push(import);
            }
        }
        imports
    }
}

fn read_import(text: &str, node: Node) -> Option<ExistingImport> {
    let mut import = ExistingImport {
        module: String::new(),
        module_literal: String::new(),
        default_binding: None,
        namespace: None,
        named: Vec::new(),
        range: trimmed_range(text, node),
        type_only: false,
        has_semicolon: false,
        attributes: None,
    };

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            // `import x = require('y')` binds through CommonJS
            "import_require_clause" => return None,
            "type" | "typeof" if !child.is_named() => import.type_only = true,
            "import_clause" => read_clause(text, child, &mut import),
            "string" => read_source(text, child, &mut import),
            "from_clause" => {
                if let Some(source) = child.child_by_field_name("source") {
                    read_source(text, source, &mut import);
                }
            }
            "import_attribute" => import.attributes = Some(node_text(text, child).to_string()),
            ";" => import.has_semicolon = true,
            _ => {}
        }
    }

    (!import.module_literal.is_empty()).then_some(import)
}

fn read_source(text: &str, literal: Node, import: &mut ExistingImport) {
    let literal = node_text(text, literal);
    import.module = unquote(literal).to_string();
    import.module_literal = literal.to_string();
}

fn read_clause(text: &str, clause: Node, import: &mut ExistingImport) {
    let mut cursor = clause.walk();
    for child in clause.children(&mut cursor) {
        match child.kind() {
            "identifier" => import.default_binding = Some(node_text(text, child).to_string()),
            "namespace_import" => {
                let mut inner = child.walk();
                let local = child
                    .named_children(&mut inner)
                    .find(|n| n.kind() == "identifier");
                if let Some(local) = local {
                    import.namespace = Some(node_text(text, local).to_string());
                }
            }
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let Some(name) = spec.child_by_field_name("name") else {
                        continue;
                    };
                    import.named.push(ImportedName {
                        imported: unquote(node_text(text, name)).to_string(),
                        text: node_text(text, spec).to_string(),
                    });
                }
            }
            _ => {}
        }
    }
}

fn node_text<'a>(text: &'a str, node: Node) -> &'a str {
    text.get(node.byte_range()).unwrap_or_default()
}

fn trimmed_range(text: &str, node: Node) -> Range<usize> {
    let range = node.byte_range();
    let kept = node_text(text, node).trim_end().len();
    range.start..range.start + kept
}

fn unquote(literal: &str) -> &str {
    let bytes = literal.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(b'\'' | b'"'), Some(b'\'' | b'"')) if literal.len() >= 2 => {
            &literal[1..literal.len() - 1]
        }
        _ => literal,
    }
}

/// Where a new declaration goes: the start of the line after the last
/// import, or the top of the file when there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertionPoint {
    pub offset: usize,
    /// The last import ends the file without a line break
    pub needs_newline: bool,
}

pub(crate) fn insertion_point(text: &str, imports: &[ExistingImport]) -> InsertionPoint {
    let Some(last) = imports.last() else {
        return InsertionPoint {
            offset: 0,
            needs_newline: false,
        };
    };
    match text.get(last.range.end..).and_then(|rest| rest.find('\n')) {
        Some(idx) => InsertionPoint {
            offset: last.range.end + idx + 1,
            needs_newline: false,
        },
        None => InsertionPoint {
            offset: text.len(),
            needs_newline: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(dialect: SourceDialect, text: &str) -> Vec<ExistingImport> {
        ImportExtractor::new(dialect).expect("grammar").extract(text)
    }

    #[test]
    fn reads_every_clause_shape() {
        let text = "import React, { useState as useS, useEffect } from 'react';\n\
                    import * as path from \"path\";\n\
                    import './polyfill'\n";
        let imports = extract(SourceDialect::JavaScript, text);
        assert_eq!(imports.len(), 3);

        let react = &imports[0];
        assert_eq!(react.module, "react");
        assert_eq!(react.module_literal, "'react'");
        assert_eq!(react.default_binding.as_deref(), Some("React"));
        assert_eq!(
            react.named,
            vec![
                ImportedName {
                    imported: "useState".to_string(),
                    text: "useState as useS".to_string(),
                },
                ImportedName {
                    imported: "useEffect".to_string(),
                    text: "useEffect".to_string(),
                },
            ]
        );
        assert!(react.has_semicolon);
        assert_eq!(&text[react.range.clone()], "import React, { useState as useS, useEffect } from 'react';");

        assert_eq!(imports[1].namespace.as_deref(), Some("path"));
        assert_eq!(imports[1].module_literal, "\"path\"");

        let side_effect = &imports[2];
        assert_eq!(side_effect.module, "./polyfill");
        assert!(!side_effect.has_semicolon);
        assert!(side_effect.named.is_empty());
        assert_eq!(&text[side_effect.range.clone()], "import './polyfill'");
    }

    #[test]
    fn only_top_level_imports_count() {
        let text = "const x = 1;\nfunction f() { return import('lazy'); }\nimport a from 'a';\n";
        let imports = extract(SourceDialect::JavaScript, text);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module, "a");
    }

    #[test]
    fn typescript_type_imports_and_require_clauses() {
        let text = "import type { Props } from './types';\n\
                    import fs = require('fs');\n\
                    import { type Theme, useTheme } from 'theme';\n";
        let imports = extract(SourceDialect::TypeScript, text);
        assert_eq!(imports.len(), 2);
        assert!(imports[0].type_only);
        assert_eq!(imports[1].module, "theme");
        assert!(!imports[1].type_only);
        assert!(imports[1].imports_name("Theme"));
        assert_eq!(imports[1].named[0].text, "type Theme");
    }

    #[test]
    fn unparseable_text_has_no_imports() {
        let imports = extract(SourceDialect::JavaScript, "import { from ;;; }}}");
        assert!(imports.is_empty());
    }

    #[test]
    fn insertion_point_follows_last_import() {
        let text = "import a from 'a';\nimport b from 'b'; // trailing\n\nconst x = a + b;\n";
        let imports = extract(SourceDialect::JavaScript, text);
        let point = insertion_point(text, &imports);
        assert_eq!(&text[..point.offset], "import a from 'a';\nimport b from 'b'; // trailing\n");
        assert!(!point.needs_newline);
    }

    #[test]
    fn insertion_point_at_end_without_newline() {
        let text = "import a from 'a';";
        let imports = extract(SourceDialect::JavaScript, text);
        let point = insertion_point(text, &imports);
        assert_eq!(point.offset, text.len());
        assert!(point.needs_newline);
    }

    #[test]
    fn insertion_point_without_imports_is_top() {
        let point = insertion_point("const x = 1;\n", &[]);
        assert_eq!(point.offset, 0);
        assert!(!point.needs_newline);
    }
}
