//! Plain-text table of the hottest call sites.

use crate::aggregator::StudyContext;
use crate::symbols::label_for;
use crate::utils::config::StudyConfig;

const LABEL_WIDTH: usize = 42;

/// One row of the summary table
#[derive(Debug, Clone, PartialEq)]
pub struct HotVertex {
    pub ip: u64,
    pub label: String,
    pub scaled_weight: f64,
    /// Name of the kind with the largest scaled share
    pub dominant_kind: String,
    /// Inclusive share of all counted scaled weight
    pub percentage: f64,
}

/// Vertices ranked by scaled weight, heaviest first; ties by IP
pub fn hot_vertices(context: &StudyContext, config: &StudyConfig, top_n: usize) -> Vec<HotVertex> {
    let operations = &config.operations;
    let overall: f64 = context.graph.totals().scaled(operations).iter().sum();

    let mut rows: Vec<HotVertex> = context
        .graph
        .vertices()
        .map(|(ip, counts)| {
            let scaled = counts.scaled(operations);
            let scaled_weight: f64 = scaled.iter().sum();
            let dominant_kind = scaled
                .iter()
                .enumerate()
                .filter(|(_, weight)| **weight > 0.0)
                .fold(None, |best: Option<(usize, f64)>, (kind, &weight)| match best {
                    Some((_, top)) if top >= weight => best,
                    _ => Some((kind, weight)),
                })
                .map(|(kind, _)| operations[kind].name.clone())
                .unwrap_or_else(|| "-".to_string());
            let percentage = if overall > 0.0 {
                scaled_weight / overall * 100.0
            } else {
                0.0
            };

            HotVertex {
                ip,
                label: label_for(ip, context.registry.symbols(ip)),
                scaled_weight,
                dominant_kind,
                percentage,
            }
        })
        .collect();

    // vertices() is ordered by IP and the sort is stable
    rows.sort_by(|a, b| b.scaled_weight.total_cmp(&a.scaled_weight));
    rows.truncate(top_n);
    rows
}

/// Render the summary table for terminal display
pub fn summarize_vertices(context: &StudyContext, config: &StudyConfig, top_n: usize) -> String {
    let rows = hot_vertices(context, config, top_n);
    let mut lines = Vec::new();

    lines.push(format!("  HOTTEST CALL SITES (era `{}`)", config.target_era));
    lines.push("  ┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━━━━━┳━━━━━━━━━━━━┳━━━━━━━━━┓".to_string());
    lines.push(format!(
        "  ┃ {:<42} ┃ {:^12} ┃ {:^10} ┃ {:^7} ┃",
        "Call site (hottest first)", "WEIGHT", "MOSTLY", "%"
    ));
    lines.push("  ┣━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╋━━━━━━━━━━━━━━╋━━━━━━━━━━━━╋━━━━━━━━━┫".to_string());

    for row in &rows {
        lines.push(format!(
            "  ┃ {:<42} ┃ {:>12.1} ┃ {:^10} ┃ {:>6.1}% ┃",
            truncate_label(&row.label),
            row.scaled_weight,
            row.dominant_kind,
            row.percentage
        ));
    }

    lines.push("  ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┻━━━━━━━━━━━━━━┻━━━━━━━━━━━━┻━━━━━━━━━┛".to_string());

    let total = context.graph.vertex_count();
    if total > rows.len() {
        lines.push(String::new());
        lines.push(format!("   (Showing top {} of {} call sites)", rows.len(), total));
    }

    lines.join("\n")
}

// Keep the tail, which holds the most specific path segments
fn truncate_label(label: &str) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() > LABEL_WIDTH {
        let tail: String = chars[chars.len() - (LABEL_WIDTH - 3)..].iter().collect();
        format!("...{}", tail)
    } else {
        label.to_string()
    }
}
