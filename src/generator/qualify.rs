//! Qualification of package-local type names.
//!
//! A mock written outside the declaring package refers to that package's
//! types through its import, so `*Err` in package `test` becomes `*test.Err`.
//! Predeclared identifiers stay as they are.

use crate::core::{Interface, InterfaceElement, Method, Parameter, ReturnValue, TypeExpression};

const PREDECLARED: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

pub fn is_predeclared(name: &str) -> bool {
    PREDECLARED.contains(&name)
}

/// Copy of `iface` with every package-local type name qualified by the
/// interface's package name.
pub fn qualify_local_types(iface: &Interface) -> Interface {
    let package = iface.package_name.as_str();
    let mut qualified = iface.clone();
    for method in &mut qualified.methods {
        qualify_method(method, package);
    }
    qualified
}

fn qualify_method(method: &mut Method, package: &str) {
    qualify_lists(&mut method.params, &mut method.results, package);
}

fn qualify_lists(params: &mut [Parameter], results: &mut [ReturnValue], package: &str) {
    for param in params {
        qualify(&mut param.ty, package);
    }
    for result in results {
        qualify(&mut result.ty, package);
    }
}

fn qualify(expr: &mut TypeExpression, package: &str) {
    match expr {
        TypeExpression::Named { qualifier, name } => {
            if qualifier.is_none() && !is_predeclared(name) && !package.is_empty() {
                *qualifier = Some(package.to_string());
            }
        }
        TypeExpression::Pointer(inner) | TypeExpression::Slice(inner) => qualify(inner, package),
        TypeExpression::Array { elem, .. } | TypeExpression::Channel { elem, .. } => {
            qualify(elem, package)
        }
        TypeExpression::Map { key, value } => {
            qualify(key, package);
            qualify(value, package);
        }
        TypeExpression::Function { params, results } => qualify_lists(params, results, package),
        TypeExpression::Interface(elements) => {
            for element in elements {
                match element {
                    InterfaceElement::Method(method) => qualify_method(method, package),
                    InterfaceElement::Embedded(ty) => qualify(ty, package),
                }
            }
        }
        TypeExpression::Struct(fields) => {
            for field in fields {
                qualify(&mut field.ty, package);
            }
        }
        TypeExpression::Elided => {}
    }
}
