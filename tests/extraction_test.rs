use mockery::io::find_go_files;
use mockery::{extract, extract_file, Error, TypeExpression};
use std::path::Path;

fn fixtures_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

#[test]
fn test_every_fixture_extracts() {
    let files = find_go_files(&fixtures_dir(), true).unwrap();
    assert!(files.len() >= 14, "found only {} fixtures", files.len());

    for file in &files {
        let unit = extract_file(file).unwrap_or_else(|e| panic!("{}: {}", file.display(), e));
        assert_eq!(unit.interfaces.len(), 1, "{}", file.display());
    }
}

#[test]
fn test_import_path_follows_module_layout() {
    let unit = extract_file(&fixtures_dir().join("requester.go")).unwrap();
    assert_eq!(
        unit.find("Requester").unwrap().import_path.as_deref(),
        Some("example.com/fixtures")
    );

    let nested = extract_file(&fixtures_dir().join("test").join("custom_error.go")).unwrap();
    assert_eq!(nested.package_name, "test");
    assert_eq!(
        nested.find("KeyManager").unwrap().import_path.as_deref(),
        Some("example.com/fixtures/test")
    );
}

#[test]
fn test_struct_and_method_declarations_do_not_leak() {
    let unit = extract_file(&fixtures_dir().join("test").join("custom_error.go")).unwrap();
    let names: Vec<&str> = unit.interfaces.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["KeyManager"]);
}

#[test]
fn test_interfaces_keep_file_order() {
    let source = "package p\n\ntype B interface{ B() }\ntype A interface{ A() }\ntype C interface{ C() }\n";
    let unit = extract(Path::new("order.go"), source).unwrap();
    let names: Vec<&str> = unit.interfaces.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}

#[test]
fn test_embedded_interface_from_same_file() {
    let source = r#"package p

import "io"

type Getter interface {
	Get(key string) ([]byte, error)
}

type Store interface {
	Getter
	io.Closer
	Put(key string, value []byte) error
}
"#;
    let unit = extract(Path::new("store.go"), source).unwrap();
    let store = unit.find("Store").unwrap();
    let methods: Vec<&str> = store.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["Get", "Put"]);
    assert_eq!(store.unresolved_embeds, vec!["io.Closer".to_string()]);
    assert_eq!(
        store.methods[0].results[0].ty,
        TypeExpression::slice(TypeExpression::named("byte"))
    );
}

#[test]
fn test_syntax_error_reports_file_and_line() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.go");
    std::fs::write(&path, "package broken\n\ntype A interface {\n\tGet(path string\n}\n").unwrap();

    match extract_file(&path) {
        Err(Error::Extraction(e)) => {
            assert_eq!(e.path, path);
            assert_eq!(e.line, 4);
        }
        other => panic!("expected extraction error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let result = extract_file(Path::new("does/not/exist.go"));
    assert!(matches!(result, Err(Error::Io(_))));
}
