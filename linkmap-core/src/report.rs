// Export and rendering of a finished crawl

use crate::crawl::{extract_host, extract_url_path};
use indexmap::IndexMap;
use linkmap_scanner::{CrawlResult, ReferenceKind, SiteGraph};
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_EDGE_TABLE: &str = "website_links.csv";
pub const EDGE_TABLE_HEADER: [&str; 3] = ["Source URL", "Target URL", "Tag"];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Csv,
    Json,
    Dot,
    Text,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ReportFormat::Csv),
            "json" => Some(ReportFormat::Json),
            "dot" | "graphviz" => Some(ReportFormat::Dot),
            "text" | "txt" => Some(ReportFormat::Text),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Dot => "dot",
            ReportFormat::Text => "txt",
        }
    }
}

/// Write the edge table: a header row, then one row per edge in export order.
pub fn write_edge_csv<W: Write>(graph: &SiteGraph, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(EDGE_TABLE_HEADER)?;
    for row in graph.export() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

pub fn generate_csv_report(graph: &SiteGraph) -> Result<String> {
    let mut buffer = Vec::new();
    write_edge_csv(graph, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the edge table to `output_dir/file_name`, replacing any previous file.
pub fn write_edge_table(graph: &SiteGraph, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);

    let file = File::create(&path)?;
    write_edge_csv(graph, file)?;

    info!("Wrote {} edge(s) to {}", graph.edge_count(), path.display());
    Ok(path)
}

#[derive(Debug, Serialize)]
struct JsonEdge<'a> {
    target: &'a str,
    tag: ReferenceKind,
}

#[derive(Debug, Serialize)]
struct JsonSource<'a> {
    url: &'a str,
    edges: Vec<JsonEdge<'a>>,
}

pub fn generate_json_report(result: &CrawlResult) -> Result<String> {
    let sources: Vec<JsonSource<'_>> = result
        .graph
        .sources()
        .map(|url| JsonSource {
            url,
            edges: result
                .graph
                .references(url)
                .into_iter()
                .flatten()
                .map(|reference| JsonEdge {
                    target: &reference.url,
                    tag: reference.kind,
                })
                .collect(),
        })
        .collect();

    let json_report = serde_json::json!({
        "generator": "Linkmap",
        "version": env!("CARGO_PKG_VERSION"),
        "seeds": result.seeds,
        "max_depth": result.max_depth,
        "summary": {
            "pages_mapped": result.pages_fetched(),
            "pages_failed": result.pages_failed(),
            "total_edges": result.graph.edge_count(),
        },
        "sources": sources,
        "failed": result.failures,
    });

    Ok(serde_json::to_string_pretty(&json_report)?)
}

/// One node per distinct URL, one edge per recorded reference.
pub fn build_digraph(graph: &SiteGraph) -> DiGraph<String, ReferenceKind> {
    let mut digraph = DiGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

    let mut node_for = |digraph: &mut DiGraph<String, ReferenceKind>, url: &str| -> NodeIndex {
        *nodes
            .entry(url.to_string())
            .or_insert_with(|| digraph.add_node(url.to_string()))
    };

    for source in graph.sources() {
        node_for(&mut digraph, source);
    }
    for edge in graph.edges() {
        let from = node_for(&mut digraph, edge.source);
        let to = node_for(&mut digraph, edge.target);
        digraph.add_edge(from, to, edge.kind);
    }

    digraph
}

/// Graphviz rendering of the site map.
pub fn generate_dot_map(graph: &SiteGraph) -> String {
    let digraph = build_digraph(graph);
    format!("{}", Dot::new(&digraph))
}

/// Text tree of mapped pages grouped by host, with each page's references.
pub fn generate_sitemap_tree(graph: &SiteGraph) -> String {
    if graph.is_empty() {
        return "  (empty)\n".to_string();
    }

    let mut by_host: IndexMap<String, Vec<&str>> = IndexMap::new();
    for source in graph.sources() {
        by_host.entry(extract_host(source)).or_default().push(source);
    }

    let mut tree = String::new();
    for (host, sources) in &by_host {
        tree.push_str(&format!("{}\n", host));

        for (i, source) in sources.iter().enumerate() {
            let last_source = i == sources.len() - 1;
            let (branch, indent) = if last_source {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            tree.push_str(&format!("{}{}\n", branch, extract_url_path(source)));

            let references: Vec<_> = graph.references(source).into_iter().flatten().collect();
            for (j, reference) in references.iter().enumerate() {
                let leaf = if j == references.len() - 1 {
                    "└── "
                } else {
                    "├── "
                };
                tree.push_str(&format!(
                    "{}{}[{}] {}\n",
                    indent,
                    leaf,
                    reference.kind.tag(),
                    reference.url
                ));
            }
        }
    }

    tree
}

/// Render a finished crawl in the requested format.
pub fn render_report(result: &CrawlResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Csv => generate_csv_report(&result.graph),
        ReportFormat::Json => generate_json_report(result),
        ReportFormat::Dot => Ok(generate_dot_map(&result.graph)),
        ReportFormat::Text => Ok(generate_sitemap_tree(&result.graph)),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
