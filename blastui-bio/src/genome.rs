//! Preparing assembled genomes for indexing.
//!
//! Contig headers are rewritten to `<genome>_NODE_<n>` so every hit can be
//! traced back to the genome it came from, even when several assemblies are
//! indexed into one database.

use crate::sequence::Sequence;
use std::path::Path;

pub const NODE_SEPARATOR: &str = "_NODE_";

const FASTA_EXTENSIONS: &[&str] = &["fasta", "fa", "fna", "faa", "ffn", "fas", "fsa"];

#[derive(Debug, Clone)]
pub struct ContigPreparation {
    pub rename_headers: bool,
    /// Contigs shorter than this are dropped (0 = keep all)
    pub min_length: usize,
}

impl Default for ContigPreparation {
    fn default() -> Self {
        Self {
            rename_headers: true,
            min_length: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreparedGenome {
    pub sequences: Vec<Sequence>,
    /// Contigs removed for being empty or shorter than the minimum length
    pub dropped: usize,
}

/// Genome name derived from a FASTA file name: `SRR123.contigs.fasta.gz` → `SRR123.contigs`
pub fn genome_name_from_path<P: AsRef<Path>>(path: P) -> String {
    let file_name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = file_name.as_str();
    if let Some(stripped) = name.strip_suffix(".gz") {
        name = stripped;
    }
    if let Some((stem, ext)) = name.rsplit_once('.') {
        if FASTA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            name = stem;
        }
    }

    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Rename and filter the contigs of one genome
pub fn prepare_contigs(
    genome: &str,
    contigs: Vec<Sequence>,
    options: &ContigPreparation,
) -> PreparedGenome {
    let mut prepared = PreparedGenome::default();

    for (index, contig) in contigs.into_iter().enumerate() {
        if contig.is_empty() || contig.len() < options.min_length {
            prepared.dropped += 1;
            continue;
        }

        if options.rename_headers {
            let original = match &contig.description {
                Some(desc) => format!("{} {}", contig.id, desc),
                None => contig.id.clone(),
            };
            let renamed = Sequence::new(
                format!("{}{}{}", genome, NODE_SEPARATOR, index + 1),
                contig.sequence,
            )
            .with_description(original);
            prepared.sequences.push(renamed);
        } else {
            prepared.sequences.push(contig);
        }
    }

    if prepared.dropped > 0 {
        tracing::warn!(
            "{}: dropped {} contigs shorter than {} residues",
            genome,
            prepared.dropped,
            options.min_length.max(1)
        );
    }

    prepared
}

/// Split a `<genome>_NODE_<n>` subject id into its genome and node parts
pub fn split_genome_node(subject_id: &str) -> Option<(&str, &str)> {
    let pos = subject_id.rfind(NODE_SEPARATOR)?;
    let genome = &subject_id[..pos];
    let node = &subject_id[pos + NODE_SEPARATOR.len()..];
    if genome.is_empty() || node.is_empty() {
        None
    } else {
        Some((genome, node))
    }
}
