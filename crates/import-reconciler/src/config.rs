use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Formatting used for import statements the reconciler writes from scratch.
///
/// Rebuilt statements keep the module literal and semicolon of the statement
/// they replace, so only `bracket_spacing` applies to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Quote character around the module specifier
    pub quote: QuoteStyle,

    /// Terminate new statements with `;`
    pub semicolons: bool,

    /// `{ a, b }` rather than `{a, b}`
    pub bracket_spacing: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            quote: QuoteStyle::Single,
            semicolons: true,
            bracket_spacing: true,
        }
    }
}

impl ReconcilerConfig {
    /// Single quotes, no semicolons
    pub fn standard() -> Self {
        Self {
            semicolons: false,
            ..Default::default()
        }
    }

    /// Double quotes, semicolons
    pub fn double_quoted() -> Self {
        Self {
            quote: QuoteStyle::Double,
            ..Default::default()
        }
    }

    pub(crate) fn terminator(&self) -> &'static str {
        if self.semicolons {
            ";"
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }

    /// Quote `value` as a string literal, escaping as needed
    pub fn literal(self, value: &str) -> String {
        let quote = self.as_char();
        let mut out = String::with_capacity(value.len() + 2);
        out.push(quote);
        for ch in value.chars() {
            if ch == quote || ch == '\\' {
                out.push('\\');
            }
            out.push(ch);
        }
        out.push(quote);
        out
    }
}

impl fmt::Display for QuoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteStyle::Single => f.write_str("single"),
            QuoteStyle::Double => f.write_str("double"),
        }
    }
}

impl FromStr for QuoteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "'" => Ok(QuoteStyle::Single),
            "double" | "\"" => Ok(QuoteStyle::Double),
            other => Err(format!("unknown quote style '{other}' (expected single or double)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_escapes_the_active_quote() {
        assert_eq!(QuoteStyle::Single.literal("ui"), "'ui'");
        assert_eq!(QuoteStyle::Double.literal("ui"), "\"ui\"");
        assert_eq!(QuoteStyle::Single.literal("it's"), "'it\\'s'");
        assert_eq!(QuoteStyle::Double.literal("it's"), "\"it's\"");
    }

    #[test]
    fn quote_style_parses() {
        assert_eq!("single".parse::<QuoteStyle>(), Ok(QuoteStyle::Single));
        assert_eq!("Double".parse::<QuoteStyle>(), Ok(QuoteStyle::Double));
        assert!("backtick".parse::<QuoteStyle>().is_err());
    }

    #[test]
    fn presets() {
        assert_eq!(ReconcilerConfig::standard().terminator(), "");
        assert_eq!(ReconcilerConfig::double_quoted().quote, QuoteStyle::Double);
        assert!(ReconcilerConfig::default().semicolons);
    }
}
