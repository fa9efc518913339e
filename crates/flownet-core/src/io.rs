//! Text formats: whitespace-separated edge lists, node-per-line sets and the
//! tab-separated SIF-like output.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{FlowNetError, Result};
use crate::flow::OutputEdge;
use crate::reconcile::{EdgeReconciler, RawEdge, ReconciledGraph};

/// Split one edge line into a record. Blank lines yield `None`; fields past
/// the fourth are ignored.
fn parse_edge_line(line: usize, raw: &str) -> Result<Option<RawEdge>> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }
    let &[node1, node2, similarity, tag, ..] = fields.as_slice() else {
        return Err(FlowNetError::MalformedEdge {
            line,
            message: format!("expected 4 fields, found {}", fields.len()),
        });
    };

    let similarity: f64 = similarity
        .parse()
        .map_err(|_| FlowNetError::MalformedEdge {
            line,
            message: format!("similarity `{similarity}` is not a number"),
        })?;
    if !(0.0..=1.0).contains(&similarity) {
        return Err(FlowNetError::MalformedEdge {
            line,
            message: format!("similarity {similarity} is outside [0, 1]"),
        });
    }

    Ok(Some(RawEdge {
        line,
        node1: node1.to_string(),
        node2: node2.to_string(),
        similarity,
        tag: tag.to_string(),
    }))
}

fn edge_records(text: &str) -> impl Iterator<Item = Result<RawEdge>> + '_ {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| parse_edge_line(i + 1, raw).transpose())
}

/// Parse `node1 node2 similarity orientation` lines. The orientation tag is
/// left for [`EdgeReconciler::add_record`] to check.
pub fn parse_edges(text: &str) -> Result<Vec<RawEdge>> {
    edge_records(text).collect()
}

/// Parse and reconcile in one pass, so the first bad line in file order is
/// the one reported, whether its fault is the shape, the similarity or the
/// orientation tag.
pub fn reconcile_edges(text: &str) -> Result<ReconciledGraph> {
    let mut reconciler = EdgeReconciler::new();
    for record in edge_records(text) {
        reconciler.add_record(&record?)?;
    }
    Ok(reconciler.finish())
}

pub fn read_graph(path: &Path) -> Result<ReconciledGraph> {
    let text = fs::read_to_string(path).map_err(|e| FlowNetError::io(path, e))?;
    reconcile_edges(&text)
}

/// One node name per line, trimmed; empty lines dropped, duplicates collapse.
pub fn parse_node_set(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_node_set(path: &Path) -> Result<BTreeSet<String>> {
    let text = fs::read_to_string(path).map_err(|e| FlowNetError::io(path, e))?;
    Ok(parse_node_set(&text))
}

pub fn format_sif(edges: &[OutputEdge]) -> String {
    let mut out = String::new();
    for edge in edges {
        out.push_str(&edge.node1);
        out.push('\t');
        out.push_str(&edge.node2);
        out.push('\t');
        out.push_str(edge.orientation.tag());
        out.push('\n');
    }
    out
}

/// Write through a temporary sibling and rename, so a failed write never
/// leaves a truncated file at `path`.
pub fn write_sif(path: &Path, edges: &[OutputEdge]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| FlowNetError::io(parent, e))?;
        }
    }
    let tmp = path.with_extension("sif.tmp");
    let write = || -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(format_sif(edges).as_bytes())?;
        f.sync_all()
    };
    if let Err(e) = write() {
        let _ = fs::remove_file(&tmp);
        return Err(FlowNetError::io(&tmp, e));
    }
    fs::rename(&tmp, path).map_err(|e| FlowNetError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::Orientation;

    #[test]
    fn parses_edges_and_skips_blank_lines() {
        let edges = parse_edges("a b 0.9 U\n\n  c\td 0.5 D extra\n").unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].line, 3);
        assert_eq!(edges[1].node1, "c");
        assert_eq!(edges[1].tag, "D");
    }

    #[test]
    fn short_line_is_malformed() {
        let err = parse_edges("a b 0.9\n").unwrap_err();
        assert!(matches!(err, FlowNetError::MalformedEdge { line: 1, .. }));
    }

    #[test]
    fn similarity_out_of_range_is_malformed() {
        assert!(parse_edges("a b 1.5 D\n").is_err());
        assert!(parse_edges("a b NaN D\n").is_err());
        assert!(parse_edges("a b high D\n").is_err());
    }

    #[test]
    fn first_bad_line_wins_across_error_kinds() {
        let err = reconcile_edges("a b 0.9 X\nc d 5.0 D\n").unwrap_err();
        assert!(matches!(err, FlowNetError::InvalidInputKind { line: 1, ref tag } if tag == "X"));

        let err = reconcile_edges("a b 5.0 D\nc d 0.9 X\n").unwrap_err();
        assert!(matches!(err, FlowNetError::MalformedEdge { line: 1, .. }));

        let err = reconcile_edges("a b 0.9 D\n\nc d\ne f 0.9 X\n").unwrap_err();
        assert!(matches!(err, FlowNetError::MalformedEdge { line: 3, .. }));
    }

    #[test]
    fn reconcile_edges_builds_the_tables() {
        let graph = reconcile_edges("a b 0.9 D\n\nb c 0.8 U\n").unwrap();
        assert_eq!(graph.directed_len(), 1);
        assert_eq!(graph.undirected_len(), 1);
        assert_eq!(graph.directed_cost("a", "b"), Some(10));
    }

    #[test]
    fn node_sets_trim_and_dedup() {
        let set = parse_node_set(" a \nb\n\na\n");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn sif_is_tab_separated() {
        let edges = vec![OutputEdge {
            node1: "a".into(),
            node2: "b".into(),
            orientation: Orientation::Undirected,
            flow: 1,
        }];
        assert_eq!(format_sif(&edges), "a\tb\tU\n");
    }
}
