//! Geodesic-distance providers
//!
//! Maximum and average shortest-path length can be computed in process or
//! delegated to an external graph-metrics tool invoked as a subprocess. The
//! provider trait keeps that choice pluggable; the in-process BFS
//! implementation is the fallback when subprocess latency or availability
//! is unacceptable.

use super::{GeodesicStats, MetricsError, MetricsResult};
use crate::algo::GraphView;
use crate::graph::Graph;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Expected header line of the external tool's output file
const TOOL_OUTPUT_HEADER: &str = "Maximum Geodesic Distance\tAverage Geodesic Distance";

/// Strategy for computing geodesic-distance statistics
///
/// Returns `Ok(None)` for an empty graph (the metric is undefined there,
/// not an error).
pub trait GeodesicProvider: Send + Sync {
    fn compute(&self, graph: &Graph) -> MetricsResult<Option<GeodesicStats>>;
}

/// In-process provider: BFS from every vertex
///
/// Distances are measured in edge hops with direction ignored; unreachable
/// pairs do not contribute. O(V * (V + E)).
#[derive(Debug, Default, Clone, Copy)]
pub struct BfsProvider;

impl GeodesicProvider for BfsProvider {
    fn compute(&self, graph: &Graph) -> MetricsResult<Option<GeodesicStats>> {
        let view = GraphView::new(graph);
        if view.vertex_count == 0 {
            return Ok(None);
        }

        let n = view.vertex_count;
        let mut maximum = 0u64;
        let mut total = 0u64;
        let mut pairs = 0u64;
        let mut distance = vec![u64::MAX; n];
        let mut queue = VecDeque::new();

        for source in 0..n {
            distance.iter_mut().for_each(|d| *d = u64::MAX);
            distance[source] = 0;
            queue.clear();
            queue.push_back(source);

            while let Some(current) = queue.pop_front() {
                let next = distance[current] + 1;
                for &neighbor in &view.neighbors[current] {
                    if distance[neighbor] == u64::MAX {
                        distance[neighbor] = next;
                        queue.push_back(neighbor);
                    }
                }
            }

            // Each unordered pair contributes once
            for target in (source + 1)..n {
                if distance[target] != u64::MAX {
                    maximum = maximum.max(distance[target]);
                    total += distance[target];
                    pairs += 1;
                }
            }
        }

        let average = if pairs == 0 {
            0.0
        } else {
            total as f64 / pairs as f64
        };

        Ok(Some(GeodesicStats {
            maximum: maximum as f64,
            average,
        }))
    }
}

/// Subprocess provider: delegates to an external graph-metrics tool
///
/// The graph is serialized to a tab-separated edge list in a scoped
/// temporary directory, the tool is invoked with the input and output paths
/// as its two arguments, and its output file is parsed and then deleted.
/// The invocation is blocking; the configurable timeout (default 5 minutes)
/// bounds the wait, since the tool itself offers none.
pub struct ExternalToolProvider {
    executable: PathBuf,
    timeout: Duration,
}

impl ExternalToolProvider {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        ExternalToolProvider {
            executable: executable.into(),
            timeout: Duration::from_secs(300),
        }
    }

    /// Override the bounded-wait limit for the subprocess
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn write_edge_list(graph: &Graph, path: &Path) -> MetricsResult<()> {
        use std::io::Write;

        let mut file = fs::File::create(path)?;
        for edge in graph.edges() {
            writeln!(file, "{}\t{}", edge.source.as_u64(), edge.target.as_u64())?;
        }
        Ok(())
    }

    fn run_tool(&self, input: &Path, output: &Path) -> MetricsResult<()> {
        debug!(
            "invoking geodesic tool {:?} (timeout {:?})",
            self.executable, self.timeout
        );

        let mut child = Command::new(&self.executable)
            .arg(input)
            .arg(output)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                warn!("geodesic tool exceeded {:?}; killing it", self.timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(MetricsError::ToolTimeout {
                    seconds: self.timeout.as_secs(),
                });
            }
            std::thread::sleep(Duration::from_millis(50));
        };

        if !status.success() {
            return Err(MetricsError::ToolFailed {
                status: status.code(),
            });
        }
        Ok(())
    }

    fn parse_output(path: &Path) -> MetricsResult<GeodesicStats> {
        let contents = fs::read_to_string(path)?;
        let mut lines = contents.lines();

        let header = lines
            .next()
            .ok_or_else(|| MetricsError::MalformedToolOutput("empty output file".to_string()))?;
        if header != TOOL_OUTPUT_HEADER {
            return Err(MetricsError::MalformedToolOutput(format!(
                "unexpected header line: {:?}",
                header
            )));
        }

        let data = lines.next().ok_or_else(|| {
            MetricsError::MalformedToolOutput("missing data line".to_string())
        })?;
        let mut fields = data.split('\t');
        let maximum = parse_field(fields.next(), "maximum geodesic distance")?;
        let average = parse_field(fields.next(), "average geodesic distance")?;

        Ok(GeodesicStats { maximum, average })
    }
}

fn parse_field(field: Option<&str>, what: &str) -> MetricsResult<f64> {
    let raw = field
        .ok_or_else(|| MetricsError::MalformedToolOutput(format!("missing {} field", what)))?;
    raw.trim().parse::<f64>().map_err(|_| {
        MetricsError::MalformedToolOutput(format!("unparsable {} field: {:?}", what, raw))
    })
}

impl GeodesicProvider for ExternalToolProvider {
    fn compute(&self, graph: &Graph) -> MetricsResult<Option<GeodesicStats>> {
        if graph.is_empty() {
            return Ok(None);
        }

        let dir = tempfile::tempdir()?;
        let input = dir.path().join("graph-edges.txt");
        let output = dir.path().join("geodesic-metrics.txt");

        Self::write_edge_list(graph, &input)?;
        self.run_tool(&input, &output)?;

        // Delete the output file even when parsing fails partway; the
        // tempdir drop is the backstop for everything else.
        let parsed = Self::parse_output(&output);
        let _ = fs::remove_file(&output);
        let stats = parsed?;

        debug!(
            "geodesic tool result: maximum {}, average {}",
            stats.maximum, stats.average
        );
        Ok(Some(stats))
    }
}
