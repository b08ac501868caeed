//! Identifier synthesis and method validation.

use std::collections::HashSet;

use crate::config::GeneratorConfig;
use crate::core::{Interface, Method};
use crate::errors::GenerationError;
use crate::generator::imports::collect_list_qualifiers;

/// Identifiers the forwarding implementation declares in the method body.
const BODY_LOCALS: &[&str] = &["ret", "rf", "ok"];

/// Receiver name of every generated method.
pub const RECEIVER: &str = "m";

/// Name of the generated mock type.
///
/// Inside the declaring package the mock must not collide with the interface
/// it implements: unexported `requester` becomes `mockRequester` and
/// exported `Requester` becomes `MockRequester`.
pub fn mock_name(iface: &Interface, config: &GeneratorConfig) -> String {
    if !config.in_package {
        return iface.name.clone();
    }
    if iface.is_exported() {
        format!("Mock{}", iface.name)
    } else {
        format!("mock{}", upper_first(&iface.name))
    }
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Argument names for a method's parameters: the declared name, or
/// `_a<index>` for anonymous and blank (`_`) parameters.
pub fn argument_names(method: &Method) -> Vec<String> {
    method
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| match param.name.as_deref() {
            Some(name) if name != "_" => name.to_string(),
            _ => format!("_a{}", index),
        })
        .collect()
}

/// Checks that the generated code for `method` can declare its parameters
/// without clashing with the receiver, the body locals, or each other.
pub fn validate_method(method: &Method) -> Result<(), GenerationError> {
    let names = argument_names(method);
    let has_body = !method.results.is_empty();

    let mut qualifiers = Vec::new();
    collect_list_qualifiers(&method.params, &method.results, &mut qualifiers);

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(GenerationError::DuplicateParameter { name: name.clone() });
        }
        let reserved = name == RECEIVER
            || (has_body
                && (BODY_LOCALS.contains(&name.as_str())
                    || is_result_local(name)
                    || qualifiers.contains(name)));
        if reserved {
            return Err(GenerationError::ReservedName { name: name.clone() });
        }
    }
    Ok(())
}

/// `r0`, `r1`, ... hold the results in the forwarding body.
fn is_result_local(name: &str) -> bool {
    name.strip_prefix('r')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
