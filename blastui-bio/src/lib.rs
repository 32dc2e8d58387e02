//! Bioinformatics utilities for BlastUI

pub mod alphabet;
pub mod formats;
pub mod genome;
pub mod query;
pub mod sequence;

// Re-export commonly used types
pub use alphabet::{check_residues, ResidueReport};
pub use formats::fasta::{parse_fasta, parse_fasta_from_bytes, write_fasta, write_fasta_to_writer};
pub use genome::{
    genome_name_from_path, prepare_contigs, split_genome_node, ContigPreparation, PreparedGenome,
    NODE_SEPARATOR,
};
pub use query::{QueryBatch, SubQuery};
pub use sequence::Sequence;
