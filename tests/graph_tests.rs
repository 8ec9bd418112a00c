use pretty_assertions::assert_eq;
use storage_study::aggregator::aggregate_trace;
use storage_study::graph::{render_dot, summarize_vertices};
use storage_study::utils::config::{ManualEdge, StudyConfig, NEUTRAL_COLOR};

const SCAFFOLD_HEAD: &str = "161,162,163";
const SCAFFOLD_TAIL: &str = "900,901,902,903,904,905,906,907,908,909,910,911";

fn sample(op: &str, frames: &str) -> String {
    format!("[storagestudy] {} [{},{},{}]\n", op, SCAFFOLD_HEAD, frames, SCAFFOLD_TAIL)
}

fn storage_trace() -> String {
    let mut input = String::new();
    input.push_str("[storagestudy] new-ip 1\n");
    input.push_str("[storagestudy] ip-symbol 1 Symbol { name: \"<ekiden_storage::State<D> as Backend>::insert_cache::h0123456789abcdef\", lineno: 534 }\n");
    input.push_str("[storagestudy] new-ip 2\n");
    input.push_str("[storagestudy] ip-symbol 2 Symbol { name: \"ekiden_storage::State::commit::hfedcba9876543210\", lineno: 932 }\n");
    input.push_str("[storagestudy] new-ip 3\n");
    input.push_str("[storagestudy] ip-symbol 3 Symbol { addr: 0x3 }\n");
    input.push_str("[storagestudy] era bulk-storage\n");
    input.push_str(&sample("get", "1,2"));
    input.push_str(&sample("get", "1,2"));
    input.push_str(&sample("set(2)", "1,3"));
    input.push_str("[storagestudy] era shutdown\n");
    input.push_str(&sample("set(100)", "1,3"));
    input
}

#[test]
fn test_render_full_trace() {
    let config = StudyConfig {
        manual_edges: vec![ManualEdge::new("State::insert_cache:534", "State::commit:932")],
        ..StudyConfig::default()
    };
    let context = aggregate_trace(storage_trace().as_bytes(), &config).unwrap();
    let dot = render_dot(&context, &config);

    let expected = concat!(
        "digraph storagestudy {\n",
        "  node [shape=box]\n",
        "  \"0x0000000000000001\" [label=\"State::insert_cache:534\", tooltip=\"2 get / 2 set / 0 tx-put / 0 dh-insert / 0 sh-set / 0 tr-alloc / 0 st-insert / 0 charge-gas\\nSymbol { name: \\\"<ekiden_storage::State<D> as Backend>::insert_cache::h0123456789abcdef\\\", lineno: 534 }\", color=\"#8a6c94\"]\n",
        "  \"0x0000000000000002\" [label=\"State::commit:932\", tooltip=\"2 get / 0 set / 0 tx-put / 0 dh-insert / 0 sh-set / 0 tr-alloc / 0 st-insert / 0 charge-gas\\nSymbol { name: \\\"ekiden_storage::State::commit::hfedcba9876543210\\\", lineno: 932 }\", color=\"#2196f3\"]\n",
        "  \"0x0000000000000003\" [label=\"0x0000000000000003\", tooltip=\"0 get / 2 set / 0 tx-put / 0 dh-insert / 0 sh-set / 0 tr-alloc / 0 st-insert / 0 charge-gas\\nSymbol { addr: 0x3 }\", color=\"#f44336\"]\n",
        "  \"0x0000000000000002\" -> \"0x0000000000000001\" [tooltip=\"2 get / 0 set / 0 tx-put / 0 dh-insert / 0 sh-set / 0 tr-alloc / 0 st-insert / 0 charge-gas\", penwidth=1.259921, color=\"#2196f3\"]\n",
        "  \"0x0000000000000003\" -> \"0x0000000000000001\" [tooltip=\"0 get / 2 set / 0 tx-put / 0 dh-insert / 0 sh-set / 0 tr-alloc / 0 st-insert / 0 charge-gas\", penwidth=1.259921, color=\"#f44336\"]\n",
        "  \"0x0000000000000001\" -> \"0x0000000000000002\" [style=dashed]\n",
        "}\n",
    );
    assert_eq!(dot.text, expected);
    assert!(dot.unresolved.is_empty());
    assert_eq!(dot.labels.resolve("State::commit:932"), Some(2));
}

#[test]
fn test_rendering_twice_is_identical() {
    let config = StudyConfig::default();
    let context = aggregate_trace(storage_trace().as_bytes(), &config).unwrap();
    let first = render_dot(&context, &config);
    let second = render_dot(&context, &config);
    assert_eq!(first.text, second.text);
}

#[test]
fn test_plain_symbol_without_name_field_uses_hex_label() {
    let input = concat!(
        "[storagestudy] new-ip 100\n",
        "[storagestudy] ip-symbol 100 foo::bar::h0123456789abcdef\n",
        "[storagestudy] era bulk-storage\n",
        "[storagestudy] get [100]\n",
    );
    let config = StudyConfig::default().with_frame_stripping(0, 0);
    let context = aggregate_trace(input.as_bytes(), &config).unwrap();
    assert_eq!(context.graph.vertex(100).unwrap().get(0), 1);

    let dot = render_dot(&context, &config);
    assert!(dot
        .text
        .contains("\"0x0000000000000064\" [label=\"0x0000000000000064\""));
}

#[test]
fn test_unknown_manual_label_is_diagnosed() {
    let config = StudyConfig {
        manual_edges: vec![
            ManualEdge::new("State::insert_cache:534", "Nowhere::seen:1"),
            ManualEdge::new("State::commit:932", "State::insert_cache:534"),
        ],
        ..StudyConfig::default()
    };
    let context = aggregate_trace(storage_trace().as_bytes(), &config).unwrap();
    let dot = render_dot(&context, &config);

    assert_eq!(dot.unresolved, vec!["Nowhere::seen:1".to_string()]);
    assert_eq!(dot.text.matches("style=dashed").count(), 1);
    assert!(dot
        .text
        .contains("\"0x0000000000000002\" -> \"0x0000000000000001\" [style=dashed]"));
}

#[test]
fn test_zero_weight_samples_get_neutral_color() {
    let input = format!("[storagestudy] era bulk-storage\n{}", sample("get(0)", "4,5"));
    let config = StudyConfig::default();
    let context = aggregate_trace(input.as_bytes(), &config).unwrap();
    let dot = render_dot(&context, &config);

    assert_eq!(dot.text.matches(NEUTRAL_COLOR).count(), 3);
    assert!(dot.text.contains("penwidth=0.000000"));
}

#[test]
fn test_charge_gas_is_scaled_down() {
    // 256 charge-gas weigh as much as one get
    let input = format!(
        "[storagestudy] era bulk-storage\n{}{}",
        sample("get", "4"),
        sample("charge-gas(256)", "4")
    );
    let config = StudyConfig::default();
    let context = aggregate_trace(input.as_bytes(), &config).unwrap();
    let dot = render_dot(&context, &config);

    // halfway between #2196f3 and #009688
    assert!(dot.text.contains("color=\"#1096bd\""));
}

#[test]
fn test_summary_lists_labels() {
    let config = StudyConfig::default();
    let context = aggregate_trace(storage_trace().as_bytes(), &config).unwrap();
    let text = summarize_vertices(&context, &config, 5);

    assert!(text.contains("State::insert_cache:534"));
    assert!(text.contains("100.0%"));
    assert!(!text.contains("Showing top"));
}
