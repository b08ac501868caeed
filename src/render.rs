//! Re-emits type expressions as Go source text.
//!
//! Rendering is structural and order-preserving: every [`TypeExpression`]
//! variant maps to exactly one textual form, so a type extracted from source
//! renders back to the text it was written as (modulo whitespace and
//! parameter names inside function types, which are dropped).
//!
//! Elided types are resolved against the nearest preceding entry of the same
//! parameter or result list. That state lives in a [`ParameterGroup`] created
//! per list, never across lists or methods.

use crate::core::{
    ChanDir, InterfaceElement, Method, Parameter, ReturnValue, StructField, TypeExpression,
};
use crate::errors::GenerationError;

type Result<T> = std::result::Result<T, GenerationError>;

/// Renders a type in a standalone position.
///
/// Elided types have no meaning outside a list and are rejected.
pub fn render(expr: &TypeExpression) -> Result<String> {
    let mut out = String::new();
    write_type(&mut out, expr)?;
    Ok(out)
}

/// Tracks the last explicit type seen in one parameter or result list.
#[derive(Debug, Default)]
pub struct ParameterGroup<'a> {
    last: Option<&'a TypeExpression>,
}

impl<'a> ParameterGroup<'a> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Returns the concrete type for a list entry, substituting the previous
    /// entry's type for an elided one.
    pub fn resolve(&mut self, ty: &'a TypeExpression) -> Result<&'a TypeExpression> {
        match ty {
            TypeExpression::Elided => self.last.ok_or(GenerationError::DanglingElision),
            explicit => {
                self.last = Some(explicit);
                Ok(explicit)
            }
        }
    }
}

/// A parameter with its elided type resolved and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedParam {
    /// Element type text, without the `...` marker.
    pub ty: String,
    pub variadic: bool,
}

impl RenderedParam {
    /// Type text as it appears in a declaration (`...T` when variadic).
    pub fn declared(&self) -> String {
        if self.variadic {
            format!("...{}", self.ty)
        } else {
            self.ty.clone()
        }
    }
}

/// A result with its elided type resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult<'a> {
    pub ty: String,
    pub resolved: &'a TypeExpression,
}

/// Renders every parameter type of one list, in order.
pub fn render_params(params: &[Parameter]) -> Result<Vec<RenderedParam>> {
    let mut group = ParameterGroup::new();
    let last = params.len().saturating_sub(1);
    params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            if param.variadic && index != last {
                return Err(GenerationError::MisplacedVariadic {
                    parameter: param
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("#{}", index)),
                });
            }
            let resolved = group.resolve(&param.ty)?;
            Ok(RenderedParam {
                ty: render(resolved)?,
                variadic: param.variadic,
            })
        })
        .collect()
}

/// Renders every result type of one list, in order.
pub fn render_results(results: &[ReturnValue]) -> Result<Vec<RenderedResult<'_>>> {
    let mut group = ParameterGroup::new();
    results
        .iter()
        .map(|result| {
            let resolved = group.resolve(&result.ty)?;
            Ok(RenderedResult {
                ty: render(resolved)?,
                resolved,
            })
        })
        .collect()
}

/// Joins result types the way a signature writes them: nothing for zero,
/// bare for one, parenthesized for more.
pub fn join_results(types: &[String]) -> String {
    match types {
        [] => String::new(),
        [single] => single.clone(),
        many => format!("({})", many.join(", ")),
    }
}

/// `func(<param types>) <result types>` for a parameter and result list.
pub fn render_function(params: &[Parameter], results: &[ReturnValue]) -> Result<String> {
    let mut out = String::new();
    write_function(&mut out, "func", params, results)?;
    Ok(out)
}

fn write_function(
    out: &mut String,
    head: &str,
    params: &[Parameter],
    results: &[ReturnValue],
) -> Result<()> {
    let params: Vec<String> = render_params(params)?
        .iter()
        .map(RenderedParam::declared)
        .collect();
    let results: Vec<String> = render_results(results)?
        .into_iter()
        .map(|r| r.ty)
        .collect();

    out.push_str(head);
    out.push('(');
    out.push_str(&params.join(", "));
    out.push(')');
    if !results.is_empty() {
        out.push(' ');
        out.push_str(&join_results(&results));
    }
    Ok(())
}

fn write_type(out: &mut String, expr: &TypeExpression) -> Result<()> {
    match expr {
        TypeExpression::Named { qualifier, name } => {
            if name.is_empty() {
                return Err(GenerationError::EmptyIdentifier);
            }
            if let Some(qualifier) = qualifier {
                if qualifier.is_empty() {
                    return Err(GenerationError::EmptyIdentifier);
                }
                out.push_str(qualifier);
                out.push('.');
            }
            out.push_str(name);
        }
        TypeExpression::Pointer(inner) => {
            out.push('*');
            write_type(out, inner)?;
        }
        TypeExpression::Slice(inner) => {
            out.push_str("[]");
            write_type(out, inner)?;
        }
        TypeExpression::Array { len, elem } => {
            if len.trim().is_empty() {
                return Err(GenerationError::EmptyArrayLength);
            }
            out.push('[');
            out.push_str(len);
            out.push(']');
            write_type(out, elem)?;
        }
        TypeExpression::Map { key, value } => {
            out.push_str("map[");
            write_type(out, key)?;
            out.push(']');
            write_type(out, value)?;
        }
        TypeExpression::Channel { dir, elem } => {
            out.push_str(dir.keyword());
            out.push(' ');
            // `chan <-chan T` would parse as `chan<- (chan T)`.
            let ambiguous = *dir == ChanDir::Both
                && matches!(
                    elem.as_ref(),
                    TypeExpression::Channel {
                        dir: ChanDir::Recv,
                        ..
                    }
                );
            if ambiguous {
                out.push('(');
                write_type(out, elem)?;
                out.push(')');
            } else {
                write_type(out, elem)?;
            }
        }
        TypeExpression::Function { params, results } => {
            write_function(out, "func", params, results)?;
        }
        TypeExpression::Interface(elements) => write_interface(out, elements)?,
        TypeExpression::Struct(fields) => write_struct(out, fields)?,
        TypeExpression::Elided => return Err(GenerationError::ElisionOutsideGroup),
    }
    Ok(())
}

fn write_interface(out: &mut String, elements: &[InterfaceElement]) -> Result<()> {
    if elements.is_empty() {
        out.push_str("interface{}");
        return Ok(());
    }
    let rendered = elements
        .iter()
        .map(|element| match element {
            InterfaceElement::Method(Method {
                name,
                params,
                results,
            }) => {
                let mut text = String::new();
                write_function(&mut text, name, params, results)?;
                Ok(text)
            }
            InterfaceElement::Embedded(ty) => render(ty),
        })
        .collect::<Result<Vec<_>>>()?;
    out.push_str("interface{ ");
    out.push_str(&rendered.join("; "));
    out.push_str(" }");
    Ok(())
}

fn write_struct(out: &mut String, fields: &[StructField]) -> Result<()> {
    if fields.is_empty() {
        out.push_str("struct{}");
        return Ok(());
    }
    let rendered = fields
        .iter()
        .map(|field| {
            let mut text = String::new();
            if !field.names.is_empty() {
                text.push_str(&field.names.join(", "));
                text.push(' ');
            }
            write_type(&mut text, &field.ty)?;
            if let Some(tag) = &field.tag {
                text.push(' ');
                text.push_str(tag);
            }
            Ok(text)
        })
        .collect::<Result<Vec<_>>>()?;
    out.push_str("struct{ ");
    out.push_str(&rendered.join("; "));
    out.push_str(" }");
    Ok(())
}
