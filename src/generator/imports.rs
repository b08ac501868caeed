//! Import collection for generated mocks.

use crate::core::{Import, InterfaceElement, Interface, Parameter, ReturnValue, TypeExpression};
use crate::errors::GenerationError;

/// Ordered set of imports, deduplicated by path, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    entries: Vec<Import>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an import unless its path is already present.
    pub fn insert(&mut self, import: Import) -> bool {
        if self.contains(&import.path) {
            return false;
        }
        self.entries.push(import);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|i| i.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.entries.iter()
    }

    /// Collects the packages referenced by qualified type names across all
    /// methods of `iface`, skipping the paths in `exclude`.
    ///
    /// Each qualifier must name an import of the declaring file, or be
    /// `local`, the declaring package itself. The alias is carried over only
    /// when the file imported the package under a name other than its
    /// default.
    pub fn collect(
        iface: &Interface,
        exclude: &[&str],
        local: Option<&str>,
    ) -> Result<Self, (String, GenerationError)> {
        let mut set = ImportSet::new();
        for method in &iface.methods {
            let mut qualifiers = Vec::new();
            collect_list_qualifiers(&method.params, &method.results, &mut qualifiers);
            for qualifier in qualifiers {
                let found = iface.import_for(&qualifier);
                if found.is_none() && local == Some(qualifier.as_str()) {
                    continue;
                }
                let import = found.ok_or_else(|| {
                    (
                        method.name.clone(),
                        GenerationError::UnknownQualifier {
                            qualifier: qualifier.clone(),
                        },
                    )
                })?;
                if exclude.contains(&import.path.as_str()) {
                    continue;
                }
                let alias = import
                    .alias
                    .as_ref()
                    .filter(|alias| **alias != crate::core::default_package_name(&import.path))
                    .cloned();
                set.insert(Import::new(alias, import.path.clone()));
            }
        }
        Ok(set)
    }
}

/// Package qualifiers referenced anywhere in a parameter and result list, in
/// order of appearance.
pub fn collect_list_qualifiers(params: &[Parameter], results: &[ReturnValue], out: &mut Vec<String>) {
    for param in params {
        collect_qualifiers(&param.ty, out);
    }
    for result in results {
        collect_qualifiers(&result.ty, out);
    }
}

fn collect_qualifiers(expr: &TypeExpression, out: &mut Vec<String>) {
    match expr {
        TypeExpression::Named {
            qualifier: Some(qualifier),
            ..
        } => {
            if !out.contains(qualifier) {
                out.push(qualifier.clone());
            }
        }
        TypeExpression::Named { qualifier: None, .. } | TypeExpression::Elided => {}
        TypeExpression::Pointer(inner) | TypeExpression::Slice(inner) => {
            collect_qualifiers(inner, out)
        }
        TypeExpression::Array { elem, .. } | TypeExpression::Channel { elem, .. } => {
            collect_qualifiers(elem, out)
        }
        TypeExpression::Map { key, value } => {
            collect_qualifiers(key, out);
            collect_qualifiers(value, out);
        }
        TypeExpression::Function { params, results } => {
            collect_list_qualifiers(params, results, out)
        }
        TypeExpression::Interface(elements) => {
            for element in elements {
                match element {
                    InterfaceElement::Method(method) => {
                        collect_list_qualifiers(&method.params, &method.results, out)
                    }
                    InterfaceElement::Embedded(ty) => collect_qualifiers(ty, out),
                }
            }
        }
        TypeExpression::Struct(fields) => {
            for field in fields {
                collect_qualifiers(&field.ty, out);
            }
        }
    }
}
