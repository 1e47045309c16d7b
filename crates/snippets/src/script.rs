//! Reading exported values from `.chunkflow.config.js` without running it.
//!
//! A script config is data that happens to be written in JavaScript. The
//! [`StaticScriptEvaluator`] walks the module's syntax tree and evaluates only
//! literal expressions: objects, arrays, strings, template strings without
//! substitutions, numbers, booleans, `null`, string concatenation, spreads and
//! references to top-level `const`/`let`/`var` bindings. Anything that would
//! need execution (calls, `require`, computed keys) is rejected.

use crate::error::{Result, SnippetError};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use tree_sitter::{Node, Parser};

const MAX_BINDING_DEPTH: usize = 32;

/// Values a script module exposes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptExports {
    /// `export default ...` or `module.exports = ...`
    pub default: Option<Value>,
    /// `export const x = ...`, `export { x }`, `exports.x = ...`
    pub named: Map<String, Value>,
}

impl ScriptExports {
    /// The `snippets` value, taken from the default export when it carries an
    /// array there, otherwise from a named `snippets` export.
    pub fn snippets_value(&self) -> Option<&Value> {
        let from_default = self
            .default
            .as_ref()
            .and_then(|value| value.get("snippets"))
            .filter(|value| value.is_array());
        from_default.or_else(|| self.named.get("snippets"))
    }
}

/// Capability that turns script source into exported data.
pub trait ScriptEvaluator: Send + Sync {
    fn evaluate(&self, source: &str) -> Result<ScriptExports>;
}

/// Literal-only evaluator backed by tree-sitter-javascript
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticScriptEvaluator;

impl ScriptEvaluator for StaticScriptEvaluator {
    fn evaluate(&self, source: &str) -> Result<ScriptExports> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| SnippetError::tree_sitter(format!("Failed to set language: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SnippetError::parse("Failed to parse script config"))?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(SnippetError::parse("script config contains syntax errors"));
        }

        let mut reader = ModuleReader {
            source,
            bindings: HashMap::new(),
        };
        reader.collect_bindings(root);
        reader.collect_exports(root)
    }
}

struct ModuleReader<'a> {
    source: &'a str,
    bindings: HashMap<&'a str, Node<'a>>,
}

impl<'a> ModuleReader<'a> {
    fn text(&self, node: Node<'a>) -> &'a str {
        &self.source[node.start_byte()..node.end_byte()]
    }

    fn collect_bindings(&mut self, root: Node<'a>) {
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let declaration = match child.kind() {
                "lexical_declaration" | "variable_declaration" => Some(child),
                "export_statement" => child
                    .child_by_field_name("declaration")
                    .filter(|d| matches!(d.kind(), "lexical_declaration" | "variable_declaration")),
                _ => None,
            };
            if let Some(declaration) = declaration {
                for (name, value) in self.declarators(declaration) {
                    self.bindings.insert(name, value);
                }
            }
        }
    }

    fn declarators(&self, declaration: Node<'a>) -> Vec<(&'a str, Node<'a>)> {
        let mut out = Vec::new();
        let mut cursor = declaration.walk();
        for declarator in declaration.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let name = declarator
                .child_by_field_name("name")
                .filter(|n| n.kind() == "identifier");
            let value = declarator.child_by_field_name("value");
            if let (Some(name), Some(value)) = (name, value) {
                out.push((self.text(name), value));
            }
        }
        out
    }

    fn collect_exports(&self, root: Node<'a>) -> Result<ScriptExports> {
        let mut exports = ScriptExports::default();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "export_statement" => self.read_export_statement(child, &mut exports)?,
                "expression_statement" => self.read_commonjs_assignment(child, &mut exports)?,
                _ => {}
            }
        }
        Ok(exports)
    }

    fn read_export_statement(&self, node: Node<'a>, exports: &mut ScriptExports) -> Result<()> {
        if let Some(value) = node.child_by_field_name("value") {
            exports.default = Some(self.eval(value, 0)?);
            return Ok(());
        }

        if let Some(declaration) = node.child_by_field_name("declaration") {
            for (name, value) in self.declarators(declaration) {
                self.record_named(exports, name, value)?;
            }
            return Ok(());
        }

        let mut cursor = node.walk();
        for clause in node.named_children(&mut cursor) {
            if clause.kind() != "export_clause" {
                continue;
            }
            let mut spec_cursor = clause.walk();
            for spec in clause.named_children(&mut spec_cursor) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let Some(local) = spec.child_by_field_name("name") else {
                    continue;
                };
                let exported = spec
                    .child_by_field_name("alias")
                    .map_or_else(|| self.text(local), |alias| self.text(alias));
                let Some(&value) = self.bindings.get(self.text(local)) else {
                    log::debug!("export of unknown binding '{}'", self.text(local));
                    continue;
                };
                if exported == "default" {
                    exports.default = Some(self.eval(value, 1)?);
                } else {
                    self.record_named(exports, exported, value)?;
                }
            }
        }
        Ok(())
    }

    fn record_named(&self, exports: &mut ScriptExports, name: &str, value: Node<'a>) -> Result<()> {
        match self.eval(value, 0) {
            Ok(evaluated) => {
                exports.named.insert(name.to_string(), evaluated);
                Ok(())
            }
            Err(err) if name == "snippets" => Err(err),
            Err(err) => {
                log::debug!("skipping export '{name}': {err}");
                Ok(())
            }
        }
    }

    /// `module.exports = ...`, `module.exports.x = ...`, `exports.x = ...`
    fn read_commonjs_assignment(&self, node: Node<'a>, exports: &mut ScriptExports) -> Result<()> {
        let Some(assignment) = node
            .named_child(0)
            .filter(|n| n.kind() == "assignment_expression")
        else {
            return Ok(());
        };
        let (Some(left), Some(right)) = (
            assignment.child_by_field_name("left"),
            assignment.child_by_field_name("right"),
        ) else {
            return Ok(());
        };

        let target: String = self.text(left).chars().filter(|c| !c.is_whitespace()).collect();
        if target == "module.exports" {
            exports.default = Some(self.eval(right, 0)?);
        } else if let Some(name) = target
            .strip_prefix("module.exports.")
            .or_else(|| target.strip_prefix("exports."))
        {
            if is_identifier(name) {
                self.record_named(exports, name, right)?;
            }
        }
        Ok(())
    }

    fn eval(&self, node: Node<'a>, depth: usize) -> Result<Value> {
        if depth > MAX_BINDING_DEPTH {
            return Err(self.unsupported(node));
        }
        match node.kind() {
            "object" => self.eval_object(node, depth),
            "array" => self.eval_array(node, depth),
            "string" => decode_js_string(delimited(self.text(node))).map(Value::String),
            "template_string" => {
                if has_substitution(node) {
                    return Err(self.unsupported(node));
                }
                decode_js_string(delimited(self.text(node))).map(Value::String)
            }
            "number" => parse_js_number(self.text(node)).map(Value::Number),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" | "undefined" => Ok(Value::Null),
            "identifier" => {
                let name = self.text(node);
                if name == "undefined" {
                    return Ok(Value::Null);
                }
                match self.bindings.get(name) {
                    Some(&bound) => self.eval(bound, depth + 1),
                    None => Err(self.unsupported(node)),
                }
            }
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => self.eval(inner, depth),
                None => Err(self.unsupported(node)),
            },
            "unary_expression" => self.eval_unary(node, depth),
            "binary_expression" => self.eval_concat(node, depth),
            _ => Err(self.unsupported(node)),
        }
    }

    fn eval_object(&self, node: Node<'a>, depth: usize) -> Result<Value> {
        let mut map = Map::new();
        let mut cursor = node.walk();
        for member in node.named_children(&mut cursor) {
            match member.kind() {
                "pair" => {
                    let (Some(key), Some(value)) = (
                        member.child_by_field_name("key"),
                        member.child_by_field_name("value"),
                    ) else {
                        return Err(self.unsupported(member));
                    };
                    let key = self.property_key(key)?;
                    map.insert(key, self.eval(value, depth)?);
                }
                "shorthand_property_identifier" => {
                    let name = self.text(member);
                    let Some(&bound) = self.bindings.get(name) else {
                        return Err(self.unsupported(member));
                    };
                    map.insert(name.to_string(), self.eval(bound, depth + 1)?);
                }
                "spread_element" => match self.eval_spread(member, depth)? {
                    Value::Object(spread) => map.extend(spread),
                    _ => return Err(self.unsupported(member)),
                },
                "comment" => {}
                _ => return Err(self.unsupported(member)),
            }
        }
        Ok(Value::Object(map))
    }

    fn eval_array(&self, node: Node<'a>, depth: usize) -> Result<Value> {
        let mut items = Vec::new();
        let mut cursor = node.walk();
        for element in node.named_children(&mut cursor) {
            match element.kind() {
                "spread_element" => match self.eval_spread(element, depth)? {
                    Value::Array(spread) => items.extend(spread),
                    _ => return Err(self.unsupported(element)),
                },
                "comment" => {}
                _ => items.push(self.eval(element, depth)?),
            }
        }
        Ok(Value::Array(items))
    }

    fn eval_spread(&self, node: Node<'a>, depth: usize) -> Result<Value> {
        match node.named_child(0) {
            Some(inner) => self.eval(inner, depth),
            None => Err(self.unsupported(node)),
        }
    }

    fn eval_unary(&self, node: Node<'a>, depth: usize) -> Result<Value> {
        let operator = node.child_by_field_name("operator").map(|op| self.text(op));
        let argument = node.child_by_field_name("argument");
        match (operator, argument) {
            (Some(op @ ("-" | "+")), Some(argument)) => match self.eval(argument, depth)? {
                Value::Number(number) if op == "+" => Ok(Value::Number(number)),
                Value::Number(number) => negate(&number)
                    .map(Value::Number)
                    .ok_or_else(|| self.unsupported(node)),
                _ => Err(self.unsupported(node)),
            },
            _ => Err(self.unsupported(node)),
        }
    }

    /// `"a" + "b"`; the only binary operator a data file needs.
    fn eval_concat(&self, node: Node<'a>, depth: usize) -> Result<Value> {
        let operator = node.child_by_field_name("operator").map(|op| self.text(op));
        let (Some("+"), Some(left), Some(right)) = (
            operator,
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return Err(self.unsupported(node));
        };
        match (self.eval(left, depth)?, self.eval(right, depth)?) {
            (Value::String(mut l), Value::String(r)) => {
                l.push_str(&r);
                Ok(Value::String(l))
            }
            _ => Err(self.unsupported(node)),
        }
    }

    fn property_key(&self, key: Node<'a>) -> Result<String> {
        match key.kind() {
            "property_identifier" | "identifier" | "number" => Ok(self.text(key).to_string()),
            "string" => decode_js_string(delimited(self.text(key))),
            _ => Err(self.unsupported(key)),
        }
    }

    fn unsupported(&self, node: Node<'a>) -> SnippetError {
        SnippetError::unsupported(node.kind(), node.start_position().row + 1)
    }
}

/// Body of a literal without its opening and closing quote or backtick
fn delimited(raw: &str) -> &str {
    raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default()
}

fn has_substitution(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "template_substitution");
    found
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn negate(number: &Number) -> Option<Number> {
    if let Some(int) = number.as_i64() {
        return Some(Number::from(-int));
    }
    number.as_f64().and_then(|f| Number::from_f64(-f))
}

fn parse_js_number(raw: &str) -> Result<Number> {
    let cleaned = raw.replace('_', "");
    let lower = cleaned.to_ascii_lowercase();
    let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| lower.strip_prefix(prefix).map(|digits| (digits, radix)));
    if let Some((digits, radix)) = radix {
        return i64::from_str_radix(digits, radix)
            .map(Number::from)
            .map_err(|_| SnippetError::invalid_literal(raw));
    }
    if let Ok(int) = cleaned.parse::<i64>() {
        return Ok(Number::from(int));
    }
    cleaned
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| SnippetError::invalid_literal(raw))
}

/// Decode the body of a quoted or backtick JavaScript string.
fn decode_js_string(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(escaped) = chars.next() else {
            return Err(SnippetError::invalid_literal("dangling escape"));
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\r' => {
                // line continuation, optionally CRLF
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                out.push(code_point(&hex)?);
            }
            'u' => {
                let unit = if chars.peek() == Some(&'{') {
                    chars.next();
                    let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                    u32::from_str_radix(&hex, 16)
                        .map_err(|_| SnippetError::invalid_literal(format!("\\u{{{hex}}}")))?
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    u32::from_str_radix(&hex, 16)
                        .map_err(|_| SnippetError::invalid_literal(format!("\\u{hex}")))?
                };
                out.push(decode_utf16_unit(unit, &mut chars)?);
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn code_point(hex: &str) -> Result<char> {
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| SnippetError::invalid_literal(format!("\\x{hex}")))
}

/// Combine a high surrogate with a following `\uDCxx` escape.
fn decode_utf16_unit(
    unit: u32,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<char> {
    if !(0xD800..0xDC00).contains(&unit) {
        return char::from_u32(unit)
            .ok_or_else(|| SnippetError::invalid_literal(format!("code point {unit:#x}")));
    }
    let mut lookahead = chars.clone();
    if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
        let hex: String = lookahead.by_ref().take(4).collect();
        if let Ok(low) = u32::from_str_radix(&hex, 16) {
            if (0xDC00..0xE000).contains(&low) {
                *chars = lookahead;
                let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                if let Some(ch) = char::from_u32(combined) {
                    return Ok(ch);
                }
            }
        }
    }
    Err(SnippetError::invalid_literal(format!(
        "unpaired surrogate {unit:#x}"
    )))
}
