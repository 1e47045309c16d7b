use crate::config::ReconcilerConfig;
use crate::dialect::SourceDialect;
use crate::edits::{EditSet, TextEdit};
use crate::error::Result;
use crate::extract::{insertion_point, ExistingImport, ImportExtractor};
use crate::render::{render_statement, Bindings, Tail};
use chunkflow_protocol::RequiredImport;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A required import the reconciler would not merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportConflict {
    pub package_name: String,
    pub reason: String,
}

/// Outcome of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub edits: EditSet,
    pub conflicts: Vec<ImportConflict>,
}

impl Reconciliation {
    /// Nothing to change and nothing refused
    pub fn is_noop(&self) -> bool {
        self.edits.is_empty() && self.conflicts.is_empty()
    }
}

/// Makes the imports a snippet needs available in a file.
///
/// Stateless: every call parses the text again.
#[derive(Debug, Clone)]
pub struct Reconciler {
    dialect: SourceDialect,
    config: ReconcilerConfig,
}

enum Step {
    Keep,
    Insert(String),
    Replace { target: usize, text: String },
    Refuse(String),
}

impl Reconciler {
    pub fn new(dialect: SourceDialect, config: ReconcilerConfig) -> Self {
        Self { dialect, config }
    }

    /// Reconciler for the dialect implied by `path`
    pub fn for_path(path: impl AsRef<Path>, config: ReconcilerConfig) -> Result<Self> {
        Ok(Self::new(SourceDialect::for_path(path)?, config))
    }

    pub fn dialect(&self) -> SourceDialect {
        self.dialect
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Edits that make every import in `required` available in `text`.
    ///
    /// Requirements on the same package are merged first. New declarations
    /// go below the last existing import; declarations that need more
    /// bindings are replaced whole. A requirement that cannot be expressed
    /// without renaming an existing binding is reported in
    /// [`Reconciliation::conflicts`] and leaves the text alone.
    pub fn reconcile(&self, text: &str, required: &[RequiredImport]) -> Result<Reconciliation> {
        let existing = ImportExtractor::new(self.dialect)?.extract(text);
        let point = insertion_point(text, &existing);
        let mut newline_pending = point.needs_newline;

        let mut edits = Vec::new();
        let mut conflicts = Vec::new();
        for request in coalesce(required) {
            match self.plan(&request, &existing) {
                Step::Keep => {
                    log::debug!("'{}' is already imported", request.package_name);
                }
                Step::Insert(statement) => {
                    let prefix = if std::mem::take(&mut newline_pending) { "\n" } else { "" };
                    edits.push(TextEdit::Insert {
                        offset: point.offset,
                        text: format!("{prefix}{statement}\n"),
                    });
                }
                Step::Replace { target, text } => {
                    let range = &existing[target].range;
                    edits.push(TextEdit::Replace {
                        start: range.start,
                        end: range.end,
                        text,
                    });
                }
                Step::Refuse(reason) => {
                    log::warn!("Not importing '{}': {reason}", request.package_name);
                    conflicts.push(ImportConflict {
                        package_name: request.package_name.clone(),
                        reason,
                    });
                }
            }
        }

        log::debug!(
            "Reconciled {} required imports against {} existing: {} edits, {} conflicts",
            required.len(),
            existing.len(),
            edits.len(),
            conflicts.len()
        );
        Ok(Reconciliation {
            edits: EditSet::new(text, edits),
            conflicts,
        })
    }

    fn plan(&self, request: &RequiredImport, existing: &[ExistingImport]) -> Step {
        if request.package_name.is_empty() {
            return Step::Refuse("empty package name".to_string());
        }
        if request.import_namespace.is_some() {
            if !request.named_exports.is_empty() {
                return Step::Refuse(
                    "a namespace import cannot be combined with named exports".to_string(),
                );
            }
            if request.default_import.is_some() {
                return Step::Refuse(
                    "a namespace import cannot be combined with a default import".to_string(),
                );
            }
        }

        let candidates: Vec<usize> = existing
            .iter()
            .enumerate()
            .filter(|(_, decl)| !decl.type_only && decl.module == request.package_name)
            .map(|(idx, _)| idx)
            .collect();

        if candidates.is_empty() {
            return Step::Insert(self.new_statement(request));
        }
        if request.is_side_effect_only() {
            return Step::Keep;
        }
        match request.import_namespace.as_deref() {
            Some(ns) => self.plan_namespace(ns, existing, &candidates),
            None => self.plan_named(request, existing, &candidates),
        }
    }

    fn plan_named(
        &self,
        request: &RequiredImport,
        existing: &[ExistingImport],
        candidates: &[usize],
    ) -> Step {
        let decls: Vec<&ExistingImport> = candidates.iter().map(|&idx| &existing[idx]).collect();

        let needed_default = request
            .default_import
            .as_deref()
            .filter(|wanted| !decls.iter().any(|d| d.default_binding.as_deref() == Some(*wanted)));
        let needed_named: Vec<&str> = request
            .named_exports
            .iter()
            .map(String::as_str)
            .filter(|name| !decls.iter().any(|d| d.imports_name(name)))
            .collect();

        if needed_default.is_none() && needed_named.is_empty() {
            return Step::Keep;
        }

        let target = candidates
            .iter()
            .copied()
            .find(|&idx| existing[idx].namespace.is_none())
            .unwrap_or(candidates[0]);
        let decl = &existing[target];

        if let Some(ns) = decl.namespace.as_deref() {
            if !needed_named.is_empty() {
                return Step::Refuse(format!(
                    "{} is imported as namespace '{ns}'; cannot add {{ {} }}",
                    decl.module_literal,
                    needed_named.join(", ")
                ));
            }
            let bindings = Bindings {
                default: needed_default,
                namespace: Some(ns),
                named: Vec::new(),
            };
            return Step::Replace {
                target,
                text: render_statement(&bindings, self.rebuilt_tail(decl)),
            };
        }

        if let (Some(old), Some(new)) = (decl.default_binding.as_deref(), needed_default) {
            log::debug!("Replacing default binding '{old}' with '{new}' for {}", decl.module_literal);
        }
        let mut named: Vec<&str> = decl.named.iter().map(|n| n.text.as_str()).collect();
        named.extend(needed_named);
        let bindings = Bindings {
            default: needed_default.or(decl.default_binding.as_deref()),
            namespace: None,
            named,
        };
        Step::Replace {
            target,
            text: render_statement(&bindings, self.rebuilt_tail(decl)),
        }
    }

    /// Only an existing default may share the declaration with the
    /// namespace; requests carrying their own default are refused in `plan`.
    fn plan_namespace(
        &self,
        ns: &str,
        existing: &[ExistingImport],
        candidates: &[usize],
    ) -> Step {
        if candidates
            .iter()
            .any(|&idx| existing[idx].namespace.as_deref() == Some(ns))
        {
            return Step::Keep;
        }

        let target = candidates[0];
        let decl = &existing[target];
        if let Some(other) = decl.namespace.as_deref() {
            return Step::Refuse(format!(
                "{} is already imported as namespace '{other}', not '{ns}'",
                decl.module_literal
            ));
        }
        if !decl.named.is_empty() {
            return Step::Refuse(format!(
                "{} has named imports; cannot add namespace '{ns}'",
                decl.module_literal
            ));
        }

        let bindings = Bindings {
            default: decl.default_binding.as_deref(),
            namespace: Some(ns),
            named: Vec::new(),
        };
        Step::Replace {
            target,
            text: render_statement(&bindings, self.rebuilt_tail(decl)),
        }
    }

    fn new_statement(&self, request: &RequiredImport) -> String {
        let literal = self.config.quote.literal(&request.package_name);
        let bindings = Bindings {
            default: request.default_import.as_deref(),
            namespace: request.import_namespace.as_deref(),
            named: request.named_exports.iter().map(String::as_str).collect(),
        };
        render_statement(
            &bindings,
            Tail {
                module_literal: &literal,
                attributes: None,
                terminator: self.config.terminator(),
                bracket_spacing: self.config.bracket_spacing,
            },
        )
    }

    fn rebuilt_tail<'a>(&self, decl: &'a ExistingImport) -> Tail<'a> {
        Tail {
            module_literal: &decl.module_literal,
            attributes: decl.attributes.as_deref(),
            terminator: if decl.has_semicolon { ";" } else { "" },
            bracket_spacing: self.config.bracket_spacing,
        }
    }
}

/// One request per package, in first-appearance order. Named exports are
/// unioned; the first default and the first namespace win.
pub(crate) fn coalesce(required: &[RequiredImport]) -> Vec<RequiredImport> {
    let mut merged: Vec<RequiredImport> = Vec::new();
    for request in required {
        match merged
            .iter_mut()
            .find(|m| m.package_name == request.package_name)
        {
            Some(existing) => {
                for name in &request.named_exports {
                    if !existing.named_exports.contains(name) {
                        existing.named_exports.push(name.clone());
                    }
                }
                if existing.default_import.is_none() {
                    existing.default_import = request.default_import.clone();
                }
                if existing.import_namespace.is_none() {
                    existing.import_namespace = request.import_namespace.clone();
                }
            }
            None => {
                let mut first = request.clone();
                let mut seen = Vec::with_capacity(first.named_exports.len());
                first.named_exports.retain(|name| {
                    let fresh = !seen.contains(name);
                    if fresh {
                        seen.push(name.clone());
                    }
                    fresh
                });
                merged.push(first);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn coalesce_merges_per_package_in_order() {
        let merged = coalesce(&[
            RequiredImport::named("ui", ["Button", "Button"]),
            RequiredImport::default_binding("react", "React"),
            RequiredImport::named("ui", ["Icon", "Button"]).with_default("Ui"),
            RequiredImport::default_binding("react", "Preact"),
        ]);
        assert_eq!(
            merged,
            vec![
                RequiredImport::named("ui", ["Button", "Icon"]).with_default("Ui"),
                RequiredImport::default_binding("react", "React"),
            ]
        );
    }
}
