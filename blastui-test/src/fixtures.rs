//! Test fixtures and data generators
//!
//! FASTA inputs and BLAST tabular payloads with known values.

use std::fmt::Write;

/// Test sequence with metadata
#[derive(Debug, Clone)]
pub struct TestSequence {
    pub id: String,
    pub description: String,
    pub sequence: String,
}

impl TestSequence {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            sequence: sequence.into(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Convert to FASTA format
    pub fn to_fasta(&self) -> String {
        let mut record = format!(">{}", self.id);
        if !self.description.is_empty() {
            let _ = write!(&mut record, " {}", self.description);
        }
        let _ = writeln!(&mut record);
        for line in self.sequence.as_bytes().chunks(60) {
            record.push_str(&String::from_utf8_lossy(line));
            record.push('\n');
        }
        record
    }
}

/// Create a test FASTA file content
pub fn create_test_fasta(sequences: &[TestSequence]) -> String {
    sequences.iter().map(|s| s.to_fasta()).collect()
}

/// Three short nucleotide contigs, enough to build a test database
pub fn nucleotide_contigs() -> Vec<TestSequence> {
    vec![
        TestSequence::new("contig_1", "ATGCGTACGTTAGCATGCATCGATCGTAGCTAGCTAGGATCGATCGA")
            .with_description("length=47 depth=12.1x"),
        TestSequence::new("contig_2", "GGCATTACGATCGATCGGATCCGATAGCTAGCATCGATCGATCGACTAGCTAGCAT")
            .with_description("length=56 depth=8.4x"),
        TestSequence::new("contig_3", "TTAGGCATCG").with_description("length=10 depth=2.0x"),
    ]
}

/// A handful of protein sequences
pub fn protein_sequences() -> Vec<TestSequence> {
    vec![
        TestSequence::new("sp|P69905|HBA_HUMAN", "MVLSPADKTNVKAAWGKVGAHAGEYGAEALERMFLSFPTTKTYFPHF")
            .with_description("Hemoglobin subunit alpha"),
        TestSequence::new("sp|P68871|HBB_HUMAN", "MVHLTPEEKSAVTALWGKVNVDEVGGEALGRLLVVYPWTQRFFESFGDL")
            .with_description("Hemoglobin subunit beta"),
    ]
}

/// Query FASTA with two nucleotide queries
pub fn nucleotide_queries() -> String {
    create_test_fasta(&[
        TestSequence::new("query_1", "ATGCGTACGTTA"),
        TestSequence::new("query_2", "NNGGCATTACGATCGATCGGATCC"),
    ])
}

/// Extended tabular payload matching the default search columns:
/// `qseqid sseqid pident length mismatch gapopen qstart qend sstart send
/// evalue bitscore qlen slen nident gaps qseq sseq`
pub fn extended_payload() -> String {
    [
        "# BLASTN 2.15.0+",
        "# Query: query_1",
        "# Fields: query acc.ver, subject acc.ver, % identity, alignment length, mismatches, gap opens, q. start, q. end, s. start, s. end, evalue, bit score",
        "query_1\tgenomeA_NODE_1\t100.000\t12\t0\t0\t1\t12\t101\t112\t2.5e-05\t24.3\t12\t500\t12\t0\tATGCGTACGTTA\tATGCGTACGTTA",
        "query_1\tgenomeB_NODE_3\t91.667\t12\t1\t0\t1\t12\t212\t201\t4.1e-03\t20.1\t12\t300\t11\t0\tATGCGTACGTTA\tATGCGAACGTTA",
        "query_1\tgenomeA_NODE_7\t83.333\t12\t1\t1\t1\t11\t40\t51\t0.12\t16.5\t12\t200\t10\t1\tATGCG-ACGTTA\tATGCGTACCTTA",
        "",
        "# Query: query_2",
        "query_2\tgenomeC_NODE_2\t95.000\t20\t1\t0\t3\t22\t1\t20\t1e-08\t38.2\t24\t80\t19\t0\tGGCATTACGATCGATCGGAT\tGGCATTACGATCGTTCGGAT",
        "# BLAST processed 2 queries",
    ]
    .join("\n")
        + "\n"
}

/// Twelve-column payload (`-outfmt 6` defaults)
pub fn standard_payload() -> String {
    [
        "q1\tsubj_1\t99.50\t200\t1\t0\t1\t200\t501\t700\t3e-98\t363",
        "q1\tsubj_2\t87.00\t100\t13\t0\t50\t149\t1\t100\t1.0E-20\t101",
        "q2\tsubj_3\t100.00\t35\t0\t0\t1\t35\t10\t44\t0.0\t65.8",
    ]
    .join("\n")
        + "\n"
}

/// A payload that contains only BLAST comment lines
pub fn zero_hit_payload() -> String {
    "# BLASTN 2.15.0+\n# Query: query_3\n# Database: testdb\n# 0 hits found\n".to_string()
}

/// `count` extended rows, used to push output past pipe buffer sizes
pub fn large_payload(count: usize) -> String {
    let mut payload = String::with_capacity(count * 96);
    for i in 0..count {
        let _ = writeln!(
            payload,
            "query_{}\tgenomeA_NODE_{}\t99.000\t100\t1\t0\t1\t100\t1\t100\t1e-40\t180.5\t100\t1000\t99\t0\t{}\t{}",
            i % 7,
            i,
            "A".repeat(10),
            "A".repeat(10)
        );
    }
    payload
}
