//! Graphviz DOT rendering of the aggregated call graph.
//!
//! Nodes and edges are filled with a blend of the operation kind colors,
//! weighted by each kind's scaled count. Edge width grows with the cube
//! root of the scaled total so hot paths stand out without drowning the
//! rest of the graph.

use crate::aggregator::{OpCounts, StudyContext};
use crate::symbols::{derive_label, escape_dot, hex_ip, symbol_tooltip, LabelIndex};
use crate::utils::config::{OperationKind, Rgb, StudyConfig, NEUTRAL_COLOR};
use log::{debug, warn};

/// A rendered graph plus what rendering learned along the way
#[derive(Debug, Clone)]
pub struct DotGraph {
    /// Complete DOT document
    pub text: String,

    /// Labels seen while emitting vertices
    pub labels: LabelIndex,

    /// First missing label of every manual edge that was skipped
    pub unresolved: Vec<String>,
}

/// Blend kind colors weighted by scaled counts
///
/// Returns the neutral color when nothing carries weight.
pub fn blend_color(scaled: &[f64], operations: &[OperationKind]) -> String {
    let total: f64 = scaled.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return NEUTRAL_COLOR.to_string();
    }

    let channel = |pick: fn(Rgb) -> u8| {
        let sum: f64 = operations
            .iter()
            .zip(scaled)
            .map(|(op, &weight)| f64::from(pick(op.color)) * weight)
            .sum();
        (sum / total).clamp(0.0, 255.0) as u8
    };

    format!(
        "#{:02x}{:02x}{:02x}",
        channel(Rgb::red),
        channel(Rgb::green),
        channel(Rgb::blue)
    )
}

/// Edge width for a scaled total
pub fn pen_width(scaled_total: f64) -> f64 {
    scaled_total.max(0.0).cbrt()
}

fn scaled_parts(counts: &OpCounts, operations: &[OperationKind]) -> (Vec<f64>, f64) {
    let scaled = counts.scaled(operations);
    let total = scaled.iter().sum();
    (scaled, total)
}

/// Render the whole graph
///
/// **Public** - main entry point for graph output
///
/// Rendering does not touch the context, so rendering twice yields the
/// same text. Manual edges whose labels never showed up are skipped with a
/// warning and listed in [`DotGraph::unresolved`].
pub fn render_dot(context: &StudyContext, config: &StudyConfig) -> DotGraph {
    let operations = &config.operations;
    let mut labels = LabelIndex::new();
    let mut text = String::new();

    text.push_str("digraph storagestudy {\n");
    text.push_str("  node [shape=box]\n");

    for (ip, counts) in context.graph.vertices() {
        let symbols = context.registry.symbols(ip);
        let derived = symbols.iter().find_map(|symbol| derive_label(symbol));
        if let Some(label) = &derived {
            labels.insert_first(label, ip);
        }
        let label = derived.unwrap_or_else(|| hex_ip(ip));
        let (scaled, _) = scaled_parts(counts, operations);

        text.push_str(&format!(
            "  \"{}\" [label=\"{}\", tooltip=\"{}\\n{}\", color=\"{}\"]\n",
            hex_ip(ip),
            escape_dot(&label),
            counts.summarize(operations),
            symbol_tooltip(symbols),
            blend_color(&scaled, operations),
        ));
    }

    for ((caller, callee), counts) in context.graph.edges() {
        let (scaled, total) = scaled_parts(counts, operations);

        text.push_str(&format!(
            "  \"{}\" -> \"{}\" [tooltip=\"{}\", penwidth={:.6}, color=\"{}\"]\n",
            hex_ip(caller),
            hex_ip(callee),
            counts.summarize(operations),
            pen_width(total),
            blend_color(&scaled, operations),
        ));
    }

    let mut unresolved = Vec::new();
    for edge in &config.manual_edges {
        let Some(from) = labels.resolve(&edge.from) else {
            warn!("didn't encounter label {}", edge.from);
            unresolved.push(edge.from.clone());
            continue;
        };
        let Some(to) = labels.resolve(&edge.to) else {
            warn!("didn't encounter label {}", edge.to);
            unresolved.push(edge.to.clone());
            continue;
        };
        text.push_str(&format!(
            "  \"{}\" -> \"{}\" [style=dashed]\n",
            hex_ip(from),
            hex_ip(to)
        ));
    }

    text.push_str("}\n");

    debug!(
        "Rendered {} nodes ({} labels), {} edges, {} of {} manual edges",
        context.graph.vertex_count(),
        labels.label_count(),
        context.graph.edge_count(),
        config.manual_edges.len() - unresolved.len(),
        config.manual_edges.len()
    );

    DotGraph {
        text,
        labels,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::StudyContext;
    use crate::utils::config::ManualEdge;

    fn two_kinds() -> Vec<OperationKind> {
        vec![
            OperationKind::new("get", 0xff0000, 1.0),
            OperationKind::new("set", 0x0000ff, 4.0),
        ]
    }

    #[test]
    fn test_blend_single_kind() {
        assert_eq!(blend_color(&[3.0, 0.0], &two_kinds()), "#ff0000");
    }

    #[test]
    fn test_blend_mixes_channels() {
        // equal scaled weight -> halfway, truncated
        assert_eq!(blend_color(&[1.0, 1.0], &two_kinds()), "#7f007f");
    }

    #[test]
    fn test_blend_zero_weight_is_neutral() {
        assert_eq!(blend_color(&[0.0, 0.0], &two_kinds()), NEUTRAL_COLOR);
        assert_eq!(blend_color(&[], &two_kinds()), NEUTRAL_COLOR);
    }

    #[test]
    fn test_pen_width() {
        assert!((pen_width(8.0) - 2.0).abs() < 1e-12);
        assert_eq!(pen_width(0.0), 0.0);
    }

    #[test]
    fn test_render_small_graph() {
        let config = StudyConfig {
            operations: two_kinds(),
            manual_edges: vec![ManualEdge::new("m::inner:1", "m::outer:2")],
            ..StudyConfig::default()
        };
        let mut context = StudyContext::new(&config);
        context.registry.record_ip(1);
        context.registry.record_symbol(1, "Symbol { name: m::inner, lineno: 1 }").unwrap();
        context.registry.record_ip(2);
        context.registry.record_symbol(2, "Symbol { name: m::outer, lineno: 2 }").unwrap();
        context.graph.add_sample(1, 8, &[1, 2]);

        let dot = render_dot(&context, &config);
        let expected = concat!(
            "digraph storagestudy {\n",
            "  node [shape=box]\n",
            "  \"0x0000000000000001\" [label=\"m::inner:1\", tooltip=\"0 get / 8 set\\nSymbol { name: m::inner, lineno: 1 }\", color=\"#0000ff\"]\n",
            "  \"0x0000000000000002\" [label=\"m::outer:2\", tooltip=\"0 get / 8 set\\nSymbol { name: m::outer, lineno: 2 }\", color=\"#0000ff\"]\n",
            "  \"0x0000000000000002\" -> \"0x0000000000000001\" [tooltip=\"0 get / 8 set\", penwidth=1.259921, color=\"#0000ff\"]\n",
            "  \"0x0000000000000001\" -> \"0x0000000000000002\" [style=dashed]\n",
            "}\n",
        );
        assert_eq!(dot.text, expected);
        assert!(dot.unresolved.is_empty());
    }

    #[test]
    fn test_unresolved_manual_edge_is_skipped() {
        let config = StudyConfig::default();
        let context = StudyContext::new(&config);
        let dot = render_dot(&context, &config);

        assert_eq!(dot.unresolved.len(), config.manual_edges.len());
        assert_eq!(dot.unresolved[0], "State::insert_cache:534");
        assert!(!dot.text.contains("dashed"));
        assert!(dot.text.ends_with("}\n"));
    }
}
