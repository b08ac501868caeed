//! Declaration-level parser for Go source files.
//!
//! The parser reads the package clause, the imports, and every `type`
//! declaration. Interface types are parsed in full; every other
//! declaration (functions with their bodies, variables, constants, non-interface
//! types) is skipped by bracket balancing without being understood.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::lexer::{line_column, tokenize, Tok, Token};
use crate::core::{
    ChanDir, Import, InterfaceElement, Method, Parameter, ReturnValue, StructField, TypeExpression,
};
use crate::errors::ExtractError;
use crate::render::render;

type PResult<T> = Result<T, ExtractError>;

/// Everything extracted from one file before embeds are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub package_name: String,
    pub imports: Vec<Import>,
    pub interfaces: Vec<ParsedInterface>,
}

/// An interface declaration as written, with embeds not yet expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInterface {
    pub name: String,
    pub elements: Vec<InterfaceElement>,
}

/// Interface method set after embedding, plus embeds that could not be
/// expanded from this file alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSet {
    pub methods: Vec<Method>,
    pub unresolved: Vec<String>,
}

pub fn parse(path: &Path, source: &str) -> PResult<ParsedFile> {
    let tokens = tokenize(source).map_err(|e| {
        let (line, column) = line_column(source, e.offset);
        ExtractError::new(path, line, column, format!("invalid character sequence '{}'", e.text))
    })?;
    Parser {
        source,
        path,
        tokens,
        pos: 0,
    }
    .file()
}

struct Parser<'s> {
    source: &'s str,
    path: &'s Path,
    tokens: Vec<Token>,
    pos: usize,
}

/// One entry of a parameter list before grouping is resolved.
enum Entry {
    /// `name T` or `name ...T`
    Named {
        name: String,
        ty: TypeExpression,
        variadic: bool,
    },
    /// A lone type, or a name whose type follows later in its group.
    Bare {
        ty: TypeExpression,
        variadic: bool,
        offset: usize,
    },
}

impl<'s> Parser<'s> {
    fn peek(&self) -> Option<Tok> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<Tok> {
        self.tokens.get(self.pos + n).map(|t| t.tok)
    }

    fn at(&self, tok: Tok) -> bool {
        self.peek() == Some(tok)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len(), |t| t.span.start)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, tok: Tok) -> bool {
        if self.at(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Tok) -> PResult<Token> {
        match self.peek() {
            Some(found) if found == tok => self.bump().ok_or_else(|| self.error("unexpected end of file")),
            Some(found) => Err(self.error(format!("expected {}, found {}", tok, found))),
            None => Err(self.error(format!("expected {}, found end of file", tok))),
        }
    }

    fn text(&self, token: &Token) -> &'s str {
        &self.source[token.span.clone()]
    }

    fn ident(&mut self) -> PResult<String> {
        let token = self.expect(Tok::Ident)?;
        Ok(self.text(&token).to_string())
    }

    fn error(&self, message: impl Into<String>) -> ExtractError {
        self.error_at(self.offset(), message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> ExtractError {
        let (line, column) = line_column(self.source, offset);
        ExtractError::new(self.path, line, column, message)
    }

    fn skip_semis(&mut self) {
        while self.eat(Tok::Semi) {}
    }

    fn expect_semi(&mut self) -> PResult<()> {
        if self.peek().is_none() || self.eat(Tok::Semi) {
            Ok(())
        } else {
            let found = self.peek().map_or_else(String::new, |t| t.to_string());
            Err(self.error(format!("expected ';' or newline, found {}", found)))
        }
    }

    /// Skips tokens up to the next `;` or unmatched closing bracket at
    /// nesting depth zero, leaving that token in place.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok {
                Tok::LParen | Tok::LBrack | Tok::LBrace => depth += 1,
                Tok::RParen | Tok::RBrack | Tok::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                Tok::Semi if depth == 0 => return,
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn file(mut self) -> PResult<ParsedFile> {
        self.skip_semis();
        self.expect(Tok::KwPackage)?;
        let package_name = self.ident()?;
        self.expect_semi()?;

        let mut imports = Vec::new();
        let mut interfaces = Vec::new();
        loop {
            self.skip_semis();
            match self.peek() {
                None => break,
                Some(Tok::KwImport) => {
                    self.pos += 1;
                    self.spec_group(|p| {
                        imports.push(p.import_spec()?);
                        Ok(())
                    })?;
                }
                Some(Tok::KwType) => {
                    self.pos += 1;
                    self.spec_group(|p| p.type_spec(&mut interfaces))?;
                }
                Some(_) => self.skip_declaration()?,
            }
        }

        Ok(ParsedFile {
            package_name,
            imports,
            interfaces,
        })
    }

    /// Parses either a single spec or a parenthesized group of specs.
    fn spec_group<F>(&mut self, mut spec: F) -> PResult<()>
    where
        F: FnMut(&mut Self) -> PResult<()>,
    {
        if self.eat(Tok::LParen) {
            loop {
                self.skip_semis();
                if self.eat(Tok::RParen) {
                    break;
                }
                spec(self)?;
                if !self.at(Tok::RParen) {
                    self.expect_semi()?;
                }
            }
        } else {
            spec(self)?;
        }
        self.expect_semi()
    }

    fn skip_declaration(&mut self) -> PResult<()> {
        let offset = self.offset();
        if let Some(token) = self.bump() {
            if matches!(token.tok, Tok::RParen | Tok::RBrack | Tok::RBrace) {
                return Err(self.error_at(offset, format!("unexpected {}", token.tok)));
            }
        }
        self.skip_balanced();
        self.expect_semi()
    }

    fn import_spec(&mut self) -> PResult<Import> {
        let alias = match self.peek() {
            Some(Tok::Ident) => Some(self.ident()?),
            Some(Tok::Dot) => {
                self.pos += 1;
                Some(".".to_string())
            }
            _ => None,
        };
        let token = match self.peek() {
            Some(Tok::String) | Some(Tok::RawString) => self.bump(),
            _ => None,
        }
        .ok_or_else(|| self.error("expected import path"))?;
        let quoted = self.text(&token);
        let path = &quoted[1..quoted.len() - 1];
        Ok(Import::new(alias, path))
    }

    fn type_spec(&mut self, out: &mut Vec<ParsedInterface>) -> PResult<()> {
        let name = self.ident()?;

        if self.at(Tok::LBrack) && self.is_type_parameter_list() {
            debug!(name = %name, "Skipping generic type declaration");
            self.skip_balanced();
            return Ok(());
        }
        self.eat(Tok::Assign);

        if !self.at(Tok::KwInterface) {
            self.skip_balanced();
            return Ok(());
        }
        let (elements, constraint) = self.interface_body()?;
        if constraint {
            debug!(name = %name, "Skipping constraint interface");
        } else {
            out.push(ParsedInterface { name, elements });
        }
        Ok(())
    }

    /// `[` after a type name opens type parameters when it is followed by a
    /// name and then a constraint; `[N]T` is an array.
    fn is_type_parameter_list(&self) -> bool {
        self.peek_at(1) == Some(Tok::Ident)
            && matches!(
                self.peek_at(2),
                Some(
                    Tok::Ident
                        | Tok::Comma
                        | Tok::Tilde
                        | Tok::KwInterface
                        | Tok::KwFunc
                        | Tok::KwMap
                        | Tok::KwChan
                        | Tok::KwStruct
                        | Tok::LBrack
                )
            )
    }

    /// Parses `interface { ... }`. The flag is set when the interface holds
    /// type-set terms and can only be used as a constraint.
    fn interface_body(&mut self) -> PResult<(Vec<InterfaceElement>, bool)> {
        self.expect(Tok::KwInterface)?;
        self.expect(Tok::LBrace)?;

        let mut elements = Vec::new();
        let mut constraint = false;
        loop {
            self.skip_semis();
            if self.eat(Tok::RBrace) {
                break;
            }
            if self.at(Tok::Ident) && self.peek_at(1) == Some(Tok::LParen) {
                let name = self.ident()?;
                let (params, results) = self.signature()?;
                elements.push(InterfaceElement::Method(Method::new(name, params, results)));
            } else if self.at(Tok::Tilde) {
                constraint = true;
                self.skip_balanced();
            } else {
                let ty = self.parse_type()?;
                if self.at(Tok::Pipe) {
                    constraint = true;
                    self.skip_balanced();
                } else {
                    elements.push(InterfaceElement::Embedded(ty));
                }
            }
            if !self.at(Tok::RBrace) {
                self.expect_semi()?;
            }
        }
        Ok((elements, constraint))
    }

    fn signature(&mut self) -> PResult<(Vec<Parameter>, Vec<ReturnValue>)> {
        let params = self
            .parameter_list()?
            .into_iter()
            .map(|(name, ty, variadic)| Parameter { name, ty, variadic })
            .collect();

        let results = if self.at(Tok::LParen) {
            let offset = self.offset();
            self.parameter_list()?
                .into_iter()
                .map(|(name, ty, variadic)| {
                    if variadic {
                        Err(self.error_at(offset, "variadic result is not allowed"))
                    } else {
                        Ok(ReturnValue { name, ty })
                    }
                })
                .collect::<PResult<Vec<_>>>()?
        } else if self.starts_type() {
            vec![ReturnValue::anonymous(self.parse_type()?)]
        } else {
            Vec::new()
        };
        Ok((params, results))
    }

    fn starts_type(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Tok::Ident
                    | Tok::Star
                    | Tok::LBrack
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::Arrow
                    | Tok::KwFunc
                    | Tok::KwInterface
                    | Tok::KwStruct
            )
        )
    }

    /// Parses `( ... )` into `(name, type, variadic)` triples.
    ///
    /// In a grouped declaration such as `a, b int` the first name carries
    /// the type and the later names are [`TypeExpression::Elided`].
    fn parameter_list(&mut self) -> PResult<Vec<(Option<String>, TypeExpression, bool)>> {
        self.expect(Tok::LParen)?;
        let mut entries = Vec::new();
        while !self.eat(Tok::RParen) {
            entries.push(self.parameter_entry()?);
            if !self.at(Tok::RParen) {
                self.expect(Tok::Comma)?;
            }
        }

        if !entries.iter().any(|e| matches!(e, Entry::Named { .. })) {
            return Ok(entries
                .into_iter()
                .map(|entry| match entry {
                    Entry::Bare { ty, variadic, .. } | Entry::Named { ty, variadic, .. } => {
                        (None, ty, variadic)
                    }
                })
                .collect());
        }

        let mut out = Vec::with_capacity(entries.len());
        let mut pending: Vec<String> = Vec::new();
        for entry in entries {
            match entry {
                Entry::Bare { ty, variadic, offset } => match ty {
                    TypeExpression::Named {
                        qualifier: None,
                        name,
                    } if !variadic => pending.push(name),
                    _ => return Err(self.error_at(offset, "mixed named and unnamed parameters")),
                },
                Entry::Named { name, ty, variadic } => {
                    let mut group = pending.drain(..).chain(std::iter::once(name));
                    if let Some(first) = group.next() {
                        out.push((Some(first), ty, variadic));
                    }
                    out.extend(group.map(|n| (Some(n), TypeExpression::Elided, false)));
                }
            }
        }
        if !pending.is_empty() {
            return Err(self.error("mixed named and unnamed parameters"));
        }
        Ok(out)
    }

    fn parameter_entry(&mut self) -> PResult<Entry> {
        let offset = self.offset();
        let named = self.at(Tok::Ident)
            && !matches!(
                self.peek_at(1),
                Some(Tok::Comma | Tok::RParen | Tok::Dot)
            );
        if named {
            let name = self.ident()?;
            let variadic = self.eat(Tok::Ellipsis);
            let ty = self.parse_type()?;
            Ok(Entry::Named { name, ty, variadic })
        } else {
            let variadic = self.eat(Tok::Ellipsis);
            let ty = self.parse_type()?;
            Ok(Entry::Bare {
                ty,
                variadic,
                offset,
            })
        }
    }

    fn parse_type(&mut self) -> PResult<TypeExpression> {
        match self.peek() {
            Some(Tok::Ident) => {
                let ty = self.type_name()?;
                if self.at(Tok::LBrack) {
                    return Err(self.error("generic type arguments are not supported"));
                }
                Ok(ty)
            }
            Some(Tok::Star) => {
                self.pos += 1;
                Ok(TypeExpression::pointer(self.parse_type()?))
            }
            Some(Tok::LBrack) => {
                self.pos += 1;
                if self.eat(Tok::RBrack) {
                    return Ok(TypeExpression::slice(self.parse_type()?));
                }
                let len = self.array_length()?;
                Ok(TypeExpression::array(len, self.parse_type()?))
            }
            Some(Tok::KwMap) => {
                self.pos += 1;
                self.expect(Tok::LBrack)?;
                let key = self.parse_type()?;
                self.expect(Tok::RBrack)?;
                Ok(TypeExpression::map(key, self.parse_type()?))
            }
            Some(Tok::KwChan) => {
                self.pos += 1;
                let dir = if self.eat(Tok::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpression::channel(dir, self.parse_type()?))
            }
            Some(Tok::Arrow) => {
                self.pos += 1;
                self.expect(Tok::KwChan)?;
                Ok(TypeExpression::channel(ChanDir::Recv, self.parse_type()?))
            }
            Some(Tok::KwFunc) => {
                self.pos += 1;
                let (params, results) = self.signature()?;
                Ok(TypeExpression::function(params, results))
            }
            Some(Tok::KwInterface) => {
                let offset = self.offset();
                let (elements, constraint) = self.interface_body()?;
                if constraint {
                    return Err(self.error_at(offset, "constraint interface used as a type"));
                }
                Ok(TypeExpression::Interface(elements))
            }
            Some(Tok::KwStruct) => self.struct_body(),
            Some(Tok::LParen) => {
                self.pos += 1;
                let inner = self.parse_type()?;
                self.expect(Tok::RParen)?;
                Ok(inner)
            }
            Some(found) => Err(self.error(format!("expected type, found {}", found))),
            None => Err(self.error("expected type, found end of file")),
        }
    }

    /// `name` or `pkg.Name`.
    fn type_name(&mut self) -> PResult<TypeExpression> {
        let first = self.ident()?;
        if self.eat(Tok::Dot) {
            let name = self.ident()?;
            Ok(TypeExpression::qualified(first, name))
        } else {
            Ok(TypeExpression::named(first))
        }
    }

    /// The source text of an array length, up to and including the `]`.
    fn array_length(&mut self) -> PResult<String> {
        let start = self.offset();
        let mut end = start;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Some(Tok::RBrack) if depth == 0 => break,
                Some(Tok::LParen | Tok::LBrack | Tok::LBrace) => depth += 1,
                Some(Tok::RParen | Tok::RBrack | Tok::RBrace) => depth = depth.saturating_sub(1),
                Some(_) => {}
                None => return Err(self.error("unterminated array length")),
            }
            if let Some(token) = self.bump() {
                end = token.span.end;
            }
        }
        self.expect(Tok::RBrack)?;

        let len = self.source[start..end].trim();
        if len == "..." {
            return Err(self.error_at(start, "array length '...' is not allowed in a type"));
        }
        Ok(len.to_string())
    }

    fn struct_body(&mut self) -> PResult<TypeExpression> {
        self.expect(Tok::KwStruct)?;
        self.expect(Tok::LBrace)?;

        let mut fields = Vec::new();
        loop {
            self.skip_semis();
            if self.eat(Tok::RBrace) {
                break;
            }
            fields.push(self.struct_field()?);
            if !self.at(Tok::RBrace) {
                self.expect_semi()?;
            }
        }
        Ok(TypeExpression::Struct(fields))
    }

    fn struct_field(&mut self) -> PResult<StructField> {
        let embedded_name = self.at(Tok::Ident)
            && matches!(
                self.peek_at(1),
                Some(Tok::Dot | Tok::Semi | Tok::RBrace | Tok::String | Tok::RawString)
            );

        let (names, ty) = if self.eat(Tok::Star) {
            (Vec::new(), TypeExpression::pointer(self.type_name()?))
        } else if embedded_name {
            (Vec::new(), self.type_name()?)
        } else {
            let mut names = vec![self.ident()?];
            while self.eat(Tok::Comma) {
                names.push(self.ident()?);
            }
            (names, self.parse_type()?)
        };

        let tag = match self.peek() {
            Some(Tok::String | Tok::RawString) => self.bump().map(|t| self.text(&t).to_string()),
            _ => None,
        };
        Ok(StructField { names, ty, tag })
    }
}

/// Expands the embeds of every interface in a file.
///
/// Interfaces declared in the same file are inlined (first declaration of a
/// method name wins, cycles are cut), `error` contributes `Error() string`,
/// and anything else is reported as unresolved.
pub fn resolve_method_sets(interfaces: &[ParsedInterface]) -> Vec<MethodSet> {
    let registry: HashMap<&str, &[InterfaceElement]> = interfaces
        .iter()
        .map(|i| (i.name.as_str(), i.elements.as_slice()))
        .collect();

    interfaces
        .iter()
        .map(|iface| {
            let mut set = MethodSet::default();
            let mut visiting = vec![iface.name.as_str()];
            collect_methods(&iface.elements, &registry, &mut visiting, &mut set);
            set
        })
        .collect()
}

fn collect_methods<'a>(
    elements: &'a [InterfaceElement],
    registry: &HashMap<&'a str, &'a [InterfaceElement]>,
    visiting: &mut Vec<&'a str>,
    set: &mut MethodSet,
) {
    for element in elements {
        match element {
            InterfaceElement::Method(method) => add_method(set, method.clone()),
            InterfaceElement::Embedded(TypeExpression::Named {
                qualifier: None,
                name,
            }) if registry.contains_key(name.as_str()) => {
                if visiting.contains(&name.as_str()) {
                    continue;
                }
                if let Some(embedded) = registry.get(name.as_str()) {
                    visiting.push(name.as_str());
                    collect_methods(embedded, registry, visiting, set);
                    visiting.pop();
                }
            }
            InterfaceElement::Embedded(ty) if ty.is_error() => add_method(
                set,
                Method::new(
                    "Error",
                    vec![],
                    vec![ReturnValue::anonymous(TypeExpression::named("string"))],
                ),
            ),
            InterfaceElement::Embedded(TypeExpression::Interface(inner)) => {
                collect_methods(inner, registry, visiting, set)
            }
            InterfaceElement::Embedded(ty) => {
                let name = render(ty).unwrap_or_else(|e| e.to_string());
                if !set.unresolved.contains(&name) {
                    set.unresolved.push(name);
                }
            }
        }
    }
}

fn add_method(set: &mut MethodSet, method: Method) {
    if !set.methods.iter().any(|m| m.name == method.name) {
        set.methods.push(method);
    }
}
