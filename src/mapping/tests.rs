use super::{compile_pattern, normalize_path, BindingKey, HandlerMappingBuilder, ParamIndexMapping};
use crate::component::{ParamMeta, ParamType};

#[test]
fn test_collapses_separator_runs() {
    assert_eq!(normalize_path("/a//b///c"), "/a/b/c");
    assert_eq!(normalize_path("////"), "/");
    assert_eq!(normalize_path("no/slashes/doubled"), "no/slashes/doubled");
}

#[test]
fn test_normalization_is_idempotent() {
    for raw in ["/a//b///c", "//app/add", "/", "", "/x/", "a////b"] {
        let once = normalize_path(raw);
        assert_eq!(normalize_path(&once), once, "not idempotent for {raw:?}");
    }
}

#[test]
fn test_route_path_joins_and_normalizes() {
    assert_eq!(HandlerMappingBuilder::route_path("/app", "/add"), "/app/add");
    assert_eq!(HandlerMappingBuilder::route_path("app", "add"), "/app/add");
    assert_eq!(HandlerMappingBuilder::route_path("", "/add"), "/add");
    assert_eq!(HandlerMappingBuilder::route_path("/app/", "//add"), "/app/add");
}

#[test]
fn test_pattern_requires_full_match() {
    let re = compile_pattern("/app/add").unwrap();
    assert!(re.is_match("/app/add"));
    assert!(!re.is_match("/app/add/more"));
    assert!(!re.is_match("/prefix/app/add"));
}

#[test]
fn test_alternation_stays_anchored() {
    let re = compile_pattern("/a|/b").unwrap();
    assert!(re.is_match("/a"));
    assert!(re.is_match("/b"));
    assert!(!re.is_match("/a/b"));
    assert!(!re.is_match("/ab"));
}

#[test]
fn test_literal_path_metacharacters_act_as_pattern_syntax() {
    let re = compile_pattern("/files/a.txt").unwrap();
    assert!(re.is_match("/files/a.txt"));
    assert!(re.is_match("/files/abtxt"));

    let re = compile_pattern("/items/.*").unwrap();
    assert!(re.is_match("/items/42/detail"));
}

#[test]
fn test_invalid_pattern_source_is_rejected() {
    assert!(compile_pattern("/broken(").is_err());
}

#[test]
fn test_param_index_mapping_binds_names_and_context_types() {
    static PARAMS: &[ParamMeta] = &[
        ParamMeta::request(),
        ParamMeta::response(),
        ParamMeta::param("a", ParamType::Int32),
        ParamMeta::plain(ParamType::Text),
        ParamMeta::param("  ", ParamType::Text),
        ParamMeta::param("b", ParamType::Int32),
    ];
    let mapping = ParamIndexMapping::from_params(PARAMS);

    assert_eq!(mapping.request_index(), Some(0));
    assert_eq!(mapping.response_index(), Some(1));
    assert_eq!(mapping.param("a"), Some(2));
    assert_eq!(mapping.param("b"), Some(5));
    assert_eq!(mapping.len(), 4);

    let mut indices: Vec<usize> = mapping.iter().map(|(_, index)| index).collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2, 5]);
}

#[test]
fn test_repeated_param_name_keeps_last_index() {
    static PARAMS: &[ParamMeta] = &[
        ParamMeta::param("id", ParamType::Text),
        ParamMeta::param("id", ParamType::Int32),
    ];
    let mapping = ParamIndexMapping::from_params(PARAMS);
    assert_eq!(mapping.get(&BindingKey::Param("id".to_string())), Some(1));
    assert_eq!(mapping.len(), 1);
}

#[test]
fn test_param_lookup_borrows_incoming_names() {
    static PARAMS: &[ParamMeta] = &[
        ParamMeta::param("sku", ParamType::Text),
        ParamMeta::request(),
    ];
    let mapping = ParamIndexMapping::from_params(PARAMS);
    let incoming = String::from("sku=abc");
    let (name, _) = incoming.split_once('=').unwrap();

    assert_eq!(mapping.param(name), Some(0));
    assert_eq!(mapping.param("SKU"), None);
    assert_eq!(mapping.get(&BindingKey::Request), Some(1));
    assert_eq!(mapping.get(&BindingKey::Response), None);
    assert!(mapping
        .iter()
        .any(|(key, index)| key == BindingKey::Param("sku".into()) && index == 0));
}
