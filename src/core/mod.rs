//! Structured model of Go interface declarations.
//!
//! The extractor produces these records and both the renderer and the
//! generator consume them read-only. Every type position is a
//! [`TypeExpression`] tree written exactly as it appears in source; no
//! cross-file type identity is resolved.

use std::path::PathBuf;

/// Direction marker of a channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

impl ChanDir {
    pub fn keyword(&self) -> &'static str {
        match self {
            ChanDir::Both => "chan",
            ChanDir::Send => "chan<-",
            ChanDir::Recv => "<-chan",
        }
    }
}

/// A type as written at one occurrence site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpression {
    /// `name` or `qualifier.name`.
    Named {
        qualifier: Option<String>,
        name: String,
    },
    /// `*T`
    Pointer(Box<TypeExpression>),
    /// `[]T`
    Slice(Box<TypeExpression>),
    /// `[len]T`; `len` is the source text of the length expression.
    Array {
        len: String,
        elem: Box<TypeExpression>,
    },
    /// `map[K]V`
    Map {
        key: Box<TypeExpression>,
        value: Box<TypeExpression>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Channel {
        dir: ChanDir,
        elem: Box<TypeExpression>,
    },
    /// `func(params) results`
    Function {
        params: Vec<Parameter>,
        results: Vec<ReturnValue>,
    },
    /// Inline `interface{ ... }` literal.
    Interface(Vec<InterfaceElement>),
    /// Inline `struct{ ... }` literal.
    Struct(Vec<StructField>),
    /// Same type as the previous entry of the enclosing parameter or
    /// result list (`a, b string` gives `b` an elided type).
    Elided,
}

impl TypeExpression {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpression::Named {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpression::Named {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }

    pub fn pointer(inner: TypeExpression) -> Self {
        TypeExpression::Pointer(Box::new(inner))
    }

    pub fn slice(inner: TypeExpression) -> Self {
        TypeExpression::Slice(Box::new(inner))
    }

    pub fn array(len: impl Into<String>, elem: TypeExpression) -> Self {
        TypeExpression::Array {
            len: len.into(),
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeExpression, value: TypeExpression) -> Self {
        TypeExpression::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn channel(dir: ChanDir, elem: TypeExpression) -> Self {
        TypeExpression::Channel {
            dir,
            elem: Box::new(elem),
        }
    }

    pub fn function(params: Vec<Parameter>, results: Vec<ReturnValue>) -> Self {
        TypeExpression::Function { params, results }
    }

    /// The predeclared `error` interface, which the recorder extracts with
    /// its dedicated accessor.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TypeExpression::Named { qualifier: None, name } if name == "error"
        )
    }

    /// Whether a value of this type may be nil, so that extracting it from
    /// an untyped slot needs a guard before the unchecked conversion.
    ///
    /// Named types are treated as values: the declaration behind the name is
    /// not visible to a syntactic extractor.
    pub fn is_reference_like(&self) -> bool {
        match self {
            TypeExpression::Pointer(_)
            | TypeExpression::Slice(_)
            | TypeExpression::Array { .. }
            | TypeExpression::Map { .. }
            | TypeExpression::Channel { .. }
            | TypeExpression::Function { .. }
            | TypeExpression::Interface(_) => true,
            TypeExpression::Named { .. } | TypeExpression::Struct(_) | TypeExpression::Elided => {
                false
            }
        }
    }
}

/// One entry of a parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Option<String>,
    /// Element type when `variadic` is set (`...T` stores `T`).
    pub ty: TypeExpression,
    pub variadic: bool,
}

impl Parameter {
    pub fn new(name: Option<String>, ty: TypeExpression) -> Self {
        Self {
            name,
            ty,
            variadic: false,
        }
    }

    pub fn named(name: impl Into<String>, ty: TypeExpression) -> Self {
        Self::new(Some(name.into()), ty)
    }

    pub fn anonymous(ty: TypeExpression) -> Self {
        Self::new(None, ty)
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

/// One entry of a result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnValue {
    pub name: Option<String>,
    pub ty: TypeExpression,
}

impl ReturnValue {
    pub fn new(name: Option<String>, ty: TypeExpression) -> Self {
        Self { name, ty }
    }

    pub fn anonymous(ty: TypeExpression) -> Self {
        Self::new(None, ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: Vec<Parameter>,
    pub results: Vec<ReturnValue>,
}

impl Method {
    pub fn new(name: impl Into<String>, params: Vec<Parameter>, results: Vec<ReturnValue>) -> Self {
        Self {
            name: name.into(),
            params,
            results,
        }
    }

    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.variadic)
    }
}

/// Element of an interface literal body, kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElement {
    Method(Method),
    Embedded(TypeExpression),
}

/// Field of a struct literal. `names` is empty for an embedded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub names: Vec<String>,
    pub ty: TypeExpression,
    pub tag: Option<String>,
}

/// An import declaration of the file an interface was found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Import {
    /// Explicit local name, including `_` and `.`.
    pub alias: Option<String>,
    pub path: String,
}

impl Import {
    pub fn new(alias: Option<String>, path: impl Into<String>) -> Self {
        Self {
            alias,
            path: path.into(),
        }
    }

    /// The identifier this import is referenced by in the file, if any.
    pub fn local_name(&self) -> Option<String> {
        match self.alias.as_deref() {
            Some("_") | Some(".") => None,
            Some(alias) => Some(alias.to_string()),
            None => Some(default_package_name(&self.path)),
        }
    }
}

/// Package name conventionally declared by the package at `path`.
///
/// `example.com/lib/v2` is `lib`, `gopkg.in/yaml.v3` is `yaml`,
/// `github.com/x/go-redis` is `redis`.
pub fn default_package_name(path: &str) -> String {
    let mut elements: Vec<&str> = path.split('/').filter(|e| !e.is_empty()).collect();
    if elements.len() > 1 && elements.last().is_some_and(|e| is_major_version(e)) {
        elements.pop();
    }
    let mut name = elements.last().copied().unwrap_or(path);
    if let Some((base, version)) = name.rsplit_once('.') {
        if is_major_version(version) {
            name = base;
        }
    }
    let name = name.strip_prefix("go-").unwrap_or(name);
    let name = name
        .strip_suffix("-go")
        .or_else(|| name.strip_suffix(".go"))
        .unwrap_or(name);
    name.to_string()
}

fn is_major_version(element: &str) -> bool {
    element
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// A discovered interface declaration; one record yields one mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub path: PathBuf,
    /// Package clause of the declaring file.
    pub package_name: String,
    /// Import path of the declaring package, when it could be resolved.
    pub import_path: Option<String>,
    /// Imports of the declaring file, used to qualify referenced packages.
    pub imports: Vec<Import>,
    pub methods: Vec<Method>,
    /// Embedded interfaces whose methods could not be flattened.
    pub unresolved_embeds: Vec<String>,
}

impl Interface {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            package_name: String::new(),
            import_path: None,
            imports: Vec::new(),
            methods: Vec::new(),
            unresolved_embeds: Vec::new(),
        }
    }

    pub fn with_package(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    pub fn with_import_path(mut self, import_path: impl Into<String>) -> Self {
        self.import_path = Some(import_path.into());
        self
    }

    pub fn with_imports(mut self, imports: Vec<Import>) -> Self {
        self.imports = imports;
        self
    }

    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    /// Finds the import a qualifier refers to in the declaring file.
    pub fn import_for(&self, qualifier: &str) -> Option<&Import> {
        self.imports
            .iter()
            .find(|import| import.local_name().as_deref() == Some(qualifier))
    }
}

/// Go exports identifiers that start with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
