use mockery::{extract, render, ChanDir, InterfaceElement, Parameter, ReturnValue, TypeExpression};
use proptest::prelude::*;
use std::path::Path;

fn leaf() -> impl Strategy<Value = TypeExpression> {
    prop_oneof![
        prop::sample::select(vec!["int", "string", "error", "bool", "byte", "Item"])
            .prop_map(TypeExpression::named),
        prop::sample::select(vec![("http", "Header"), ("io", "Reader"), ("time", "Duration")])
            .prop_map(|(q, n)| TypeExpression::qualified(q, n)),
    ]
}

fn chan_dir() -> impl Strategy<Value = ChanDir> {
    prop_oneof![Just(ChanDir::Both), Just(ChanDir::Send), Just(ChanDir::Recv)]
}

fn type_expression() -> impl Strategy<Value = TypeExpression> {
    leaf().prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeExpression::pointer),
            inner.clone().prop_map(TypeExpression::slice),
            (1u8..16, inner.clone()).prop_map(|(n, t)| TypeExpression::array(n.to_string(), t)),
            (leaf(), inner.clone()).prop_map(|(k, v)| TypeExpression::map(k, v)),
            (chan_dir(), inner.clone()).prop_map(|(d, t)| TypeExpression::channel(d, t)),
            (
                prop::collection::vec(inner.clone(), 0..3),
                prop::collection::vec(inner, 0..3)
            )
                .prop_map(|(params, results)| TypeExpression::function(
                    params.into_iter().map(Parameter::anonymous).collect(),
                    results.into_iter().map(ReturnValue::anonymous).collect(),
                )),
        ]
    })
}

/// Wraps rendered parameter types in an interface method and parses it back.
fn parse_back(types: &[String]) -> Vec<TypeExpression> {
    let params = types
        .iter()
        .enumerate()
        .map(|(i, ty)| format!("p{} {}", i, ty))
        .collect::<Vec<_>>()
        .join(", ");
    let source = format!("package p\n\ntype Subject interface {{\n\tDo({})\n}}\n", params);
    let unit = extract(Path::new("subject.go"), &source)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e));
    unit.interfaces[0].methods[0]
        .params
        .iter()
        .map(|p| p.ty.clone())
        .collect()
}

proptest! {
    #[test]
    fn prop_rendered_types_parse_back(types in prop::collection::vec(type_expression(), 1..4)) {
        let rendered: Vec<String> = types.iter().map(|t| render(t).unwrap()).collect();
        let parsed = parse_back(&rendered);
        prop_assert_eq!(parsed, types);
    }

    #[test]
    fn prop_rendering_is_stable(ty in type_expression()) {
        let first = render(&ty).unwrap();
        let reparsed = parse_back(std::slice::from_ref(&first));
        prop_assert_eq!(render(&reparsed[0]).unwrap(), first);
    }

    #[test]
    fn prop_interface_literal_renders_methods(names in prop::collection::vec("[A-Z][a-z]{1,6}", 1..4)) {
        let elements: Vec<InterfaceElement> = names
            .iter()
            .map(|n| InterfaceElement::Method(mockery::Method::new(n.clone(), vec![], vec![])))
            .collect();
        let rendered = render(&TypeExpression::Interface(elements)).unwrap();
        prop_assert!(rendered.starts_with("interface{ "), "rendered = {:?}", rendered);
        for name in &names {
            let call = format!("{}()", name);
            prop_assert!(rendered.contains(&call));
        }
    }
}
