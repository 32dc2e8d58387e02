//! Query coverage chart rendered to SVG

use crate::export::write_atomic;
use crate::hit::HitRecord;
use crate::result_set::ResultSet;
use blastui_core::{BlastUiError, BlastUiResult, ExportError};
use plotters::prelude::*;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u32,
    /// Height of each query's panel
    pub panel_height: u32,
    /// Hits drawn per query; the rest are counted in the caption
    pub max_hits_per_query: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            panel_height: 260,
            max_hits_per_query: 40,
        }
    }
}

fn chart_error(err: impl std::fmt::Display) -> BlastUiError {
    ExportError::Encode {
        format: "svg".to_string(),
        message: err.to_string(),
    }
    .into()
}

/// Bar colour from red (low identity) to blue (identical)
fn identity_color(identity: f64) -> RGBColor {
    let t = (identity / 100.0).clamp(0.0, 1.0);
    RGBColor(
        (30.0 + 190.0 * (1.0 - t)) as u8,
        70,
        (30.0 + 190.0 * t) as u8,
    )
}

fn query_length(hits: &[&HitRecord]) -> u32 {
    hits.iter()
        .filter_map(|h| h.query_length)
        .max()
        .or_else(|| hits.iter().map(|h| h.query_span().1).max())
        .unwrap_or(1)
        .max(1)
}

/// One panel per query that has hits; each hit is a bar over the query
/// span it covers.
pub fn render_coverage_svg(results: &ResultSet, options: &ChartOptions) -> BlastUiResult<String> {
    let groups: Vec<(&str, Vec<&HitRecord>)> = results
        .by_query()
        .into_iter()
        .filter(|(_, hits)| !hits.is_empty())
        .collect();
    if groups.is_empty() {
        return Err(ExportError::Empty.into());
    }

    let height = options.panel_height * groups.len() as u32;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;
        let panels = root.split_evenly((groups.len(), 1));

        for (panel, (query, hits)) in panels.iter().zip(&groups) {
            let shown = &hits[..hits.len().min(options.max_hits_per_query)];
            let qlen = f64::from(query_length(hits));
            let caption = if shown.len() < hits.len() {
                format!("{} ({} of {} hits)", query, shown.len(), hits.len())
            } else {
                format!("{} ({} hits)", query, hits.len())
            };

            let mut chart = ChartBuilder::on(panel)
                .caption(caption, ("sans-serif", 18))
                .margin(10)
                .x_label_area_size(35)
                .y_label_area_size(45)
                .build_cartesian_2d(0f64..qlen, 0f64..shown.len() as f64)
                .map_err(chart_error)?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .x_desc("Query position")
                .y_desc("Hit")
                .draw()
                .map_err(chart_error)?;

            chart
                .draw_series(shown.iter().enumerate().map(|(i, hit)| {
                    let (lo, hi) = hit.query_span();
                    let y = i as f64;
                    Rectangle::new(
                        [(f64::from(lo) - 1.0, y + 0.15), (f64::from(hi), y + 0.85)],
                        identity_color(hit.percent_identity).filled(),
                    )
                }))
                .map_err(chart_error)?;
        }

        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

pub fn write_coverage_chart(
    results: &ResultSet,
    path: &Path,
    options: &ChartOptions,
) -> BlastUiResult<()> {
    let svg = render_coverage_svg(results, options)?;
    write_atomic(path, |w| w.write_all(svg.as_bytes()))?;
    tracing::info!("Wrote coverage chart to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::OutputColumns;
    use crate::filter::{Filter, FilterSet};
    use crate::parser::parse_result_set;
    use blastui_test::fixtures;

    fn results() -> ResultSet {
        parse_result_set(
            fixtures::extended_payload().as_bytes(),
            &OutputColumns::default(),
            vec!["query_1".into(), "query_2".into(), "query_3".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_svg_has_panel_per_query_with_hits() {
        let svg = render_coverage_svg(&results(), &ChartOptions::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("query_1 (3 hits)"));
        assert!(svg.contains("query_2 (1 hits)"));
        assert!(!svg.contains("query_3"));
    }

    #[test]
    fn test_chart_reflects_filtered_set() {
        let filtered = results().filtered(&FilterSet::new().with(Filter::global("genomeC")));
        let svg = render_coverage_svg(&filtered, &ChartOptions::default()).unwrap();
        assert!(!svg.contains("query_1"));
        assert!(svg.contains("query_2 (1 hits)"));
    }

    #[test]
    fn test_caption_counts_truncated_hits() {
        let options = ChartOptions {
            max_hits_per_query: 2,
            ..Default::default()
        };
        let svg = render_coverage_svg(&results(), &options).unwrap();
        assert!(svg.contains("query_1 (2 of 3 hits)"));
    }

    #[test]
    fn test_empty_results_rejected() {
        let empty = ResultSet::with_queries(vec!["q".into()], vec![]);
        let err = render_coverage_svg(&empty, &ChartOptions::default()).unwrap_err();
        assert!(matches!(err, BlastUiError::Export(ExportError::Empty)));
    }

    #[test]
    fn test_write_chart_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("coverage.svg");
        write_coverage_chart(&results(), &path, &ChartOptions::default()).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("</svg>"));
    }

    #[test]
    fn test_identity_color_range() {
        let high = identity_color(100.0);
        assert_eq!((high.0, high.1, high.2), (30, 70, 220));
        let low = identity_color(0.0);
        assert_eq!((low.0, low.1, low.2), (220, 70, 30));
    }
}
