//! BLAST results for BlastUI
//!
//! Tabular output is parsed lazily into typed [`HitRecord`]s against an
//! explicit [`OutputColumns`] layout and collected into a [`ResultSet`].
//! From there results can be filtered and sorted, summarised per query,
//! charted, rendered as pairwise alignments, run through analyses and
//! exported to CSV/TSV, XLSX, FASTA, alignment text or JSON.

pub mod alignment;
pub mod analysis;
pub mod chart;
pub mod columns;
pub mod export;
pub mod filter;
pub mod hit;
pub mod parser;
pub mod result_set;
pub mod summary;

pub use alignment::{format_alignment, format_alignments, DEFAULT_ALIGNMENT_WIDTH};
pub use analysis::{AnalysisOutput, AnalysisRegistry, ResultAnalysis};
pub use chart::{render_coverage_svg, write_coverage_chart, ChartOptions};
pub use columns::{Cell, Column, OutputColumns};
pub use export::{export_results, import_results, ExportFormat, ExportOptions, SequenceSource};
pub use filter::{default_sort, Filter, FilterSet, SortKey, TextMatch};
pub use hit::{HitRecord, Strand};
pub use parser::{parse_result_set, TabularParser};
pub use result_set::ResultSet;
pub use summary::{best_hit_per_query, best_hits, summarize, QuerySummary};
