use mapography::calltree::CallGraph;
use mapography::parser::cosmic::{extract_call_tree, parse_call_tree};
use mapography::parser::{CosmicParser, MapParser};
use mapography::utils::error::ParseError;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

const MAP: &str = include_str!("fixtures/cosmic.map");

fn fixture_graph() -> CallGraph {
    CosmicParser.get_call_tree(MAP).unwrap()
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_call_tree_block_boundaries() {
    let block = extract_call_tree(MAP).unwrap();

    assert!(block.starts_with("\n   1 > __stext: (0)\n"));
    assert!(block.ends_with("  15   | | + _parse_expr --> 13\n"));
    assert!(!block.contains("Symbols"));
}

#[test]
fn test_decoded_lines_are_numbered_in_order() {
    let lines = parse_call_tree(extract_call_tree(MAP).unwrap()).unwrap();

    assert_eq!(lines.len(), 15);
    for (position, line) in lines.iter().enumerate() {
        assert_eq!(line.index, position + 1);
    }
    assert_eq!(lines[6].function, "_process");
    assert_eq!(lines[6].depth, 4);
}

#[test]
fn test_perturbed_index_is_rejected() {
    let block = extract_call_tree(MAP).unwrap().replace("   9   | | + _report", "  19   | | + _report");

    let err = parse_call_tree(&block).unwrap_err();
    assert_eq!(err, ParseError::IndexMismatch { expected: 9, found: 19 });
}

#[test]
fn test_graph_structure() {
    let graph = fixture_graph();

    assert_eq!(graph.len(), 11);
    assert_eq!(graph.roots, set(&["__stext", "_dispatch", "_it_timer"]));
    assert_eq!(graph.get("_main").unwrap().callees, set(&["_init", "_loop"]));
    assert_eq!(
        graph.get("_process").unwrap().callees,
        set(&["_clock_setup", "_process"])
    );
    assert_eq!(graph.get("_it_timer").unwrap().callees, set(&["_process"]));
    assert_eq!(graph.get("_process").unwrap().stack_size, 10);
}

#[test]
fn test_recursive_functions_are_flagged() {
    let graph = fixture_graph();

    let recursive: BTreeSet<String> = graph
        .functions
        .values()
        .filter(|f| f.is_recursive)
        .map(|f| f.name.clone())
        .collect();

    assert_eq!(recursive, set(&["_parse_expr", "_parse_term", "_process"]));
    assert!(graph.functions.values().all(|f| !f.is_indirect));
}

#[test]
fn test_paths_heaviest_first() {
    let paths: Vec<String> = fixture_graph()
        .enumerate_paths()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        paths,
        vec![
            "__stext -> _main -> _loop -> _process -> _clock_setup (28)",
            "_it_timer -> _process -> _clock_setup (26)",
            "__stext -> _main -> _loop -> _report (17)",
            "_dispatch -> _parse_expr -> _parse_term (15)",
            "__stext -> _main -> _init -> _clock_setup (12)",
        ]
    );
}

#[test]
fn test_longest_path_is_max_of_paths() {
    let graph = fixture_graph();
    let paths = graph.enumerate_paths();
    let longest = graph.longest_path();

    let max = paths.iter().map(|p| p.total_stack_size).max().unwrap();
    assert_eq!(longest.total_stack_size, max);
    assert_eq!(longest, paths[0]);
    assert_eq!(graph.enumerate_paths(), paths);
}

#[test]
fn test_render_fixture() {
    let expected = "\
__stext (0)
    _main (6)
        _init (2)
            _clock_setup (4)
        _loop (8)
            _process (10)
                _clock_setup (4)
                _process (10) [recursive]
            _report (3)
_dispatch (4)
    _parse_expr (6)
        _parse_term (5)
            _parse_expr (6) [recursive]
_it_timer (12)
    _process (10)
        _clock_setup (4)
        _process (10) [recursive]";

    assert_eq!(fixture_graph().render(), expected);
}

#[test]
fn test_missing_call_tree() {
    let err = CosmicParser.get_call_tree("no map here").unwrap_err();
    assert_eq!(err, ParseError::NotFound("call tree".to_string()));
}

#[test]
fn test_undeclared_reference_aborts_build() {
    let map = MAP.replace("  12 > _dispatch: (4)", "  12 > _dispatch ...");

    let err = CosmicParser.get_call_tree(&map).unwrap_err();
    assert_eq!(err, ParseError::UndeclaredFunction("_dispatch".to_string()));
}
