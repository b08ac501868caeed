//! Mock source generation.
//!
//! A [`Generator`] turns one [`Interface`] into the source of a mock type
//! backed by testify's `mock.Mock` recorder. For every method it writes five
//! blocks, in declaration order:
//!
//! 1. `Name_<Method>()` returning the method name,
//! 2. `MockOn_<Method>(...)` taking every argument as `interface{}` so that
//!    matchers such as `mock.Anything` can be passed,
//! 3. `MockOnTyped_<Method>(...)` with the real parameter types,
//! 4. `MockOnAny_<Method>()` registering `mock.Anything` for every argument,
//! 5. the forwarding implementation of the method itself.
//!
//! Output is built in memory and is byte-identical for the same interface
//! and configuration.

pub mod imports;
pub mod naming;
pub mod qualify;

pub use imports::ImportSet;
pub use naming::{argument_names, mock_name, validate_method};
pub use qualify::qualify_local_types;

use std::borrow::Cow;

use crate::config::GeneratorConfig;
use crate::core::{Interface, Method};
use crate::errors::{GenerationError, GenerationFailure};
use crate::render::{join_results, render_params, render_results, RenderedParam};

/// Import path of the mocking framework every mock depends on.
pub const MOCK_IMPORT: &str = "github.com/stretchr/testify/mock";

/// Wildcard matcher placeholder of the mocking framework.
const ANYTHING: &str = "mock.Anything";

pub struct Generator<'a> {
    iface: Cow<'a, Interface>,
    config: &'a GeneratorConfig,
    buf: String,
}

impl<'a> Generator<'a> {
    /// Out of package, local type names are qualified with the package
    /// name before anything is written.
    pub fn new(iface: &'a Interface, config: &'a GeneratorConfig) -> Self {
        let iface = if config.in_package {
            Cow::Borrowed(iface)
        } else {
            Cow::Owned(qualify_local_types(iface))
        };
        Self {
            iface,
            config,
            buf: String::new(),
        }
    }

    pub fn mock_name(&self) -> String {
        mock_name(&self.iface, self.config)
    }

    /// Writes the configured note as a comment block.
    ///
    /// The note is split on newlines and on the escaped sequence `\n`, which
    /// is how a multi-line note arrives from a shell flag.
    pub fn generate_prologue_note(&mut self) {
        let config = self.config;
        let Some(note) = config.note.as_deref().filter(|n| !n.is_empty()) else {
            return;
        };
        for line in note.split('\n').flat_map(|l| l.split("\\n")) {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                self.buf.push_str("//\n");
            } else {
                self.printf(format_args!("// {}\n", line));
            }
        }
        self.buf.push('\n');
    }

    /// Writes the package clause and imports.
    ///
    /// Out of package, the declaring package is imported so the mock can
    /// refer to it; in package that import would be a self-reference and is
    /// left out.
    pub fn generate_prologue(&mut self) -> Result<(), GenerationFailure> {
        let self_import = self.iface.import_path.clone();
        let package_name = self.iface.package_name.clone();

        let mut exclude = vec![MOCK_IMPORT];
        exclude.extend(self_import.as_deref());
        let local = (!self.config.in_package).then_some(package_name.as_str());
        let imports = ImportSet::collect(&self.iface, &exclude, local)
            .map_err(|(method, error)| self.failure(error).in_method(method))?;

        if self.config.in_package {
            self.printf(format_args!("package {}\n\n", package_name));
        } else {
            self.printf(format_args!("package {}\n\n", self.config.package_name));
            if let Some(path) = self_import {
                self.printf(format_args!("import \"{}\"\n", path));
            }
        }
        self.printf(format_args!("import \"{}\"\n", MOCK_IMPORT));
        self.buf.push('\n');

        for import in imports.iter() {
            match &import.alias {
                Some(alias) => self.printf(format_args!("import {} \"{}\"\n", alias, import.path)),
                None => self.printf(format_args!("import \"{}\"\n", import.path)),
            }
        }
        if !imports.is_empty() {
            self.buf.push('\n');
        }
        Ok(())
    }

    /// Writes the mock struct and the five blocks of every method.
    pub fn generate(&mut self) -> Result<(), GenerationFailure> {
        if let Some(name) = self.iface.unresolved_embeds.first() {
            return Err(self.failure(GenerationError::UnresolvedEmbed { name: name.clone() }));
        }

        let mock = self.mock_name();
        self.printf(format_args!("type {} struct {{\n\tmock.Mock\n}}\n\n", mock));

        for method in &self.iface.methods {
            let block = MethodBlock::new(&mock, method)
                .and_then(|block| block.render())
                .map_err(|error| self.failure(error).in_method(&method.name))?;
            self.buf.push_str(&block);
        }
        Ok(())
    }

    pub fn buffer(&self) -> &str {
        &self.buf
    }

    pub fn into_output(self) -> String {
        self.buf
    }

    fn printf(&mut self, args: std::fmt::Arguments<'_>) {
        use std::fmt::Write;
        // Writing into a String cannot fail.
        let _ = self.buf.write_fmt(args);
    }

    fn failure(&self, error: GenerationError) -> GenerationFailure {
        GenerationFailure::new(&self.iface.name, &self.iface.path, error)
    }
}

/// Generates the complete mock source for `iface`: note, prologue, struct
/// and methods.
pub fn emit(iface: &Interface, config: &GeneratorConfig) -> Result<String, GenerationFailure> {
    let mut generator = Generator::new(iface, config);
    generator.generate_prologue_note();
    generator.generate_prologue()?;
    generator.generate()?;
    Ok(generator.into_output())
}

/// Everything needed to write the five blocks of one method.
struct MethodBlock<'a> {
    mock: &'a str,
    method: &'a Method,
    names: Vec<String>,
    params: Vec<RenderedParam>,
}

impl<'a> MethodBlock<'a> {
    fn new(mock: &'a str, method: &'a Method) -> Result<Self, GenerationError> {
        validate_method(method)?;
        Ok(Self {
            mock,
            method,
            names: argument_names(method),
            params: render_params(&method.params)?,
        })
    }

    fn render(&self) -> Result<String, GenerationError> {
        let mut out = String::new();
        self.name_accessor(&mut out);
        self.loose_matcher(&mut out);
        self.typed_matcher(&mut out);
        self.any_matcher(&mut out);
        self.implementation(&mut out)?;
        Ok(out)
    }

    fn header(&self, prefix: &str, params: &str, returns: &str) -> String {
        format!(
            "func ({} *{}) {}{}({}) {}",
            naming::RECEIVER,
            self.mock,
            prefix,
            self.method.name,
            params,
            returns
        )
    }

    /// `"Get", a, b` as passed to the recorder's registration.
    fn on_arguments(&self, args: &[String]) -> String {
        std::iter::once(format!("\"{}\"", self.method.name))
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn typed_params(&self) -> String {
        self.names
            .iter()
            .zip(&self.params)
            .map(|(name, param)| format!("{} {}", name, param.declared()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn name_accessor(&self, out: &mut String) {
        out.push_str(&self.header("Name_", "", "string {\n"));
        out.push_str(&format!("\treturn \"{}\"\n}}\n", self.method.name));
    }

    fn loose_matcher(&self, out: &mut String) {
        let params = self
            .names
            .iter()
            .map(|name| format!("{} interface{{}}", name))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&self.header("MockOn_", &params, "*mock.Call {\n"));
        out.push_str(&format!(
            "\treturn m.Mock.On({})\n}}\n",
            self.on_arguments(&self.names)
        ));
    }

    fn typed_matcher(&self, out: &mut String) {
        out.push_str(&self.header("MockOnTyped_", &self.typed_params(), "*mock.Call {\n"));
        out.push_str(&format!(
            "\treturn m.Mock.On({})\n}}\n",
            self.on_arguments(&self.names)
        ));
    }

    fn any_matcher(&self, out: &mut String) {
        let wildcards = vec![ANYTHING.to_string(); self.names.len()];
        out.push_str(&self.header("MockOnAny_", "", "*mock.Call {\n"));
        out.push_str(&format!(
            "\treturn m.Mock.On({})\n}}\n",
            self.on_arguments(&wildcards)
        ));
    }

    fn implementation(&self, out: &mut String) -> Result<(), GenerationError> {
        let results = render_results(&self.method.results)?;
        let result_types: Vec<String> = results.iter().map(|r| r.ty.clone()).collect();

        let returns = if result_types.is_empty() {
            "{\n".to_string()
        } else {
            format!("{} {{\n", join_results(&result_types))
        };
        out.push_str(&self.header("", &self.typed_params(), &returns));

        // The recorder receives a variadic argument as the slice itself.
        let called = self.names.join(", ");
        if results.is_empty() {
            out.push_str(&format!("\tm.Called({})\n}}\n", called));
            return Ok(());
        }
        out.push_str(&format!("\tret := m.Called({})\n\n", called));

        let override_params = self
            .params
            .iter()
            .map(RenderedParam::declared)
            .collect::<Vec<_>>()
            .join(", ");
        let forwarded = self
            .names
            .iter()
            .zip(&self.params)
            .map(|(name, param)| {
                if param.variadic {
                    format!("{}...", name)
                } else {
                    name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut locals = Vec::with_capacity(results.len());
        for (index, result) in results.iter().enumerate() {
            let local = format!("r{}", index);
            out.push_str(&format!("\tvar {} {}\n", local, result.ty));
            out.push_str(&format!(
                "\tif rf, ok := ret.Get({}).(func({}) {}); ok {{\n",
                index, override_params, result.ty
            ));
            out.push_str(&format!("\t\t{} = rf({})\n", local, forwarded));
            out.push_str("\t} else {\n");
            if result.resolved.is_error() {
                out.push_str(&format!("\t\t{} = ret.Error({})\n", local, index));
            } else if result.resolved.is_reference_like() {
                out.push_str(&format!("\t\tif ret.Get({}) != nil {{\n", index));
                out.push_str(&format!(
                    "\t\t\t{} = ret.Get({}).({})\n",
                    local, index, result.ty
                ));
                out.push_str("\t\t}\n");
            } else {
                out.push_str(&format!("\t\t{} = ret.Get({}).({})\n", local, index, result.ty));
            }
            out.push_str("\t}\n\n");
            locals.push(local);
        }

        out.push_str(&format!("\treturn {}\n}}\n", locals.join(", ")));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChanDir, Import, Parameter, ReturnValue, TypeExpression as T};
    use pretty_assertions::assert_eq;

    fn requester(methods: Vec<Method>) -> Interface {
        Interface::new("Requester", "fixtures/requester.go")
            .with_package("fixtures")
            .with_import_path("github.com/acme/project/fixtures")
            .with_methods(methods)
    }

    fn generate(iface: &Interface, config: &GeneratorConfig) -> String {
        let mut generator = Generator::new(iface, config);
        generator.generate().unwrap();
        generator.into_output()
    }

    #[test]
    fn test_zero_parameters_zero_results() {
        let iface = requester(vec![Method::new("Get", vec![], vec![])]);
        let out = generate(&iface, &GeneratorConfig::new("mocks"));

        let expected = r#"type Requester struct {
	mock.Mock
}

func (m *Requester) Name_Get() string {
	return "Get"
}
func (m *Requester) MockOn_Get() *mock.Call {
	return m.Mock.On("Get")
}
func (m *Requester) MockOnTyped_Get() *mock.Call {
	return m.Mock.On("Get")
}
func (m *Requester) MockOnAny_Get() *mock.Call {
	return m.Mock.On("Get")
}
func (m *Requester) Get() {
	m.Called()
}
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn test_value_result_is_extracted_without_guard() {
        let iface = requester(vec![Method::new(
            "Get",
            vec![],
            vec![ReturnValue::anonymous(T::named("string"))],
        )]);
        let out = generate(&iface, &GeneratorConfig::new("mocks"));

        assert!(out.contains("func (m *Requester) MockOn_Get() *mock.Call {"));
        assert!(out.contains("\t} else {\n\t\tr0 = ret.Get(0).(string)\n\t}\n"));
        assert!(!out.contains("!= nil"));
    }

    #[test]
    fn test_reference_results_are_guarded() {
        let shapes = vec![
            T::pointer(T::named("string")),
            T::slice(T::named("string")),
            T::array("2", T::named("string")),
            T::map(T::named("string"), T::named("int")),
            T::channel(ChanDir::Recv, T::named("bool")),
            T::function(vec![], vec![]),
            T::Interface(vec![]),
        ];
        for shape in shapes {
            let iface = requester(vec![Method::new(
                "Get",
                vec![],
                vec![ReturnValue::anonymous(shape.clone())],
            )]);
            let out = generate(&iface, &GeneratorConfig::new("mocks"));
            assert!(
                out.contains("\t\tif ret.Get(0) != nil {\n"),
                "missing guard for {:?}",
                shape
            );
        }
    }

    #[test]
    fn test_named_elided_result_uses_resolved_type() {
        let iface = requester(vec![Method::new(
            "Pair",
            vec![],
            vec![
                ReturnValue::new(Some("a".into()), T::pointer(T::named("int"))),
                ReturnValue::new(Some("b".into()), T::Elided),
            ],
        )]);
        let out = generate(&iface, &GeneratorConfig::new("mocks"));

        assert!(out.contains("func (m *Requester) Pair() (*int, *int) {"));
        assert!(out.contains("\t\tif ret.Get(1) != nil {\n\t\t\tr1 = ret.Get(1).(*int)\n"));
        assert!(out.contains("\treturn r0, r1\n"));
    }

    #[test]
    fn test_variadic_shapes() {
        let iface = requester(vec![Method::new(
            "Get",
            vec![Parameter::named("paths", T::named("string")).variadic()],
            vec![ReturnValue::anonymous(T::named("error"))],
        )]);
        let out = generate(&iface, &GeneratorConfig::new("mocks"));

        assert!(out.contains("MockOn_Get(paths interface{}) *mock.Call"));
        assert!(out.contains("MockOnTyped_Get(paths ...string) *mock.Call"));
        assert!(out.contains("\tret := m.Called(paths)\n"));
        assert!(out.contains("ret.Get(0).(func(...string) error); ok"));
        assert!(out.contains("\t\tr0 = rf(paths...)\n"));
    }

    #[test]
    fn test_in_package_prefixes_unexported_name() {
        let iface = Interface::new("requester", "fixtures/requester_unexported.go")
            .with_package("fixtures")
            .with_methods(vec![Method::new("Get", vec![], vec![])]);
        let out = generate(&iface, &GeneratorConfig::in_package());

        assert!(out.starts_with("type mockRequester struct {\n"));
        assert!(out.contains("func (m *mockRequester) Get() {\n"));
    }

    #[test]
    fn test_prologue_out_of_package() {
        let iface = requester(vec![]);
        let config = GeneratorConfig::new("mocks");
        let mut generator = Generator::new(&iface, &config);
        generator.generate_prologue().unwrap();

        let expected = "package mocks\n\nimport \"github.com/acme/project/fixtures\"\nimport \"github.com/stretchr/testify/mock\"\n\n";
        assert_eq!(generator.buffer(), expected);
    }

    #[test]
    fn test_prologue_in_package_omits_self_import() {
        let iface = requester(vec![Method::new(
            "Get",
            vec![],
            vec![ReturnValue::anonymous(T::qualified("http", "Response"))],
        )])
        .with_imports(vec![Import::new(None, "net/http")]);
        let config = GeneratorConfig::in_package();
        let mut generator = Generator::new(&iface, &config);
        generator.generate_prologue().unwrap();

        let expected = "package fixtures\n\nimport \"github.com/stretchr/testify/mock\"\n\nimport \"net/http\"\n\n";
        assert_eq!(generator.buffer(), expected);
    }

    #[test]
    fn test_prologue_without_known_import_path() {
        let iface = Interface::new("Requester", "requester.go").with_package("fixtures");
        let config = GeneratorConfig::new("mocks");
        let mut generator = Generator::new(&iface, &config);
        generator.generate_prologue().unwrap();

        assert_eq!(
            generator.buffer(),
            "package mocks\n\nimport \"github.com/stretchr/testify/mock\"\n\n"
        );
    }

    #[test]
    fn test_note_lines_become_comments() {
        let iface = requester(vec![]);
        let config = GeneratorConfig::new("mocks").with_note("generated by make mocks\\nDO NOT EDIT");
        let mut generator = Generator::new(&iface, &config);
        generator.generate_prologue_note();

        assert_eq!(
            generator.buffer(),
            "// generated by make mocks\n// DO NOT EDIT\n\n"
        );
    }

    #[test]
    fn test_empty_note_writes_nothing() {
        let iface = requester(vec![]);
        let config = GeneratorConfig::new("mocks").with_note("");
        let mut generator = Generator::new(&iface, &config);
        generator.generate_prologue_note();
        assert_eq!(generator.buffer(), "");
    }

    #[test]
    fn test_unresolved_embed_fails_interface() {
        let mut iface = requester(vec![]);
        iface.unresolved_embeds.push("io.Reader".into());

        let err = emit(&iface, &GeneratorConfig::new("mocks")).unwrap_err();
        assert_eq!(
            err.error,
            GenerationError::UnresolvedEmbed {
                name: "io.Reader".into()
            }
        );
        assert_eq!(err.method, None);
    }

    #[test]
    fn test_method_failure_is_attributed() {
        let iface = requester(vec![
            Method::new("Ok", vec![], vec![]),
            Method::new("Bad", vec![Parameter::named("x", T::Elided)], vec![]),
        ]);

        let err = emit(&iface, &GeneratorConfig::new("mocks")).unwrap_err();
        assert_eq!(err.interface, "Requester");
        assert_eq!(err.method.as_deref(), Some("Bad"));
        assert_eq!(err.error, GenerationError::DanglingElision);
    }

    #[test]
    fn test_emit_is_idempotent() {
        let iface = requester(vec![Method::new(
            "Get",
            vec![Parameter::named("path", T::named("string"))],
            vec![
                ReturnValue::anonymous(T::named("string")),
                ReturnValue::anonymous(T::named("error")),
            ],
        )]);
        let config = GeneratorConfig::new("mocks").with_note("note");

        let first = emit(&iface, &config).unwrap();
        let second = emit(&iface, &config).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("// note\n\npackage mocks\n"));
    }
}
