use crate::sequence::Sequence;
use blastui_core::{BlastUiError, BlastUiResult, ValidationError};
use flate2::read::GzDecoder;
use nom::{
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{line_ending, not_line_ending},
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], (&str, Option<&str>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, description) = opt(preceded(
        take_while1(|c: u8| c == b' ' || c == b'\t'),
        map(not_line_ending, |s| std::str::from_utf8(s).unwrap_or("")),
    ))(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, (id, description.map(str::trim_end))))
}

/// Parse sequence lines until next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;
        // Old Mac line endings: a bare '\r'
        let rest = rest.strip_prefix(b"\r").unwrap_or(rest);

        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Parse a single FASTA record
fn parse_record(input: &[u8]) -> IResult<&[u8], Sequence> {
    let (input, (id, description)) = parse_header(input)?;
    let (input, sequence) = parse_sequence(input)?;

    let mut seq = Sequence::new(id, sequence);
    if let Some(desc) = description.filter(|d| !d.is_empty()) {
        seq = seq.with_description(desc);
    }
    Ok((input, seq))
}

/// Parse FASTA from bytes.
///
/// Records with an empty sequence are kept; callers decide whether that is
/// an error.
pub fn parse_fasta_from_bytes(data: &[u8]) -> BlastUiResult<Vec<Sequence>> {
    let mut sequences = Vec::new();
    let mut input = data;

    loop {
        // Skip empty lines and whitespace
        while !input.is_empty() && input[0].is_ascii_whitespace() {
            input = &input[1..];
        }

        if input.is_empty() {
            break;
        }

        if input[0] != b'>' {
            let preview: String = String::from_utf8_lossy(&input[..input.len().min(20)])
                .lines()
                .next()
                .unwrap_or("")
                .to_string();
            return Err(ValidationError::MalformedFasta(format!(
                "expected a '>' header line, found '{}'",
                preview
            ))
            .into());
        }

        match parse_record(input) {
            Ok((remaining, seq)) => {
                if seq.id.is_empty() {
                    return Err(ValidationError::MalformedFasta(
                        "header line without an identifier".to_string(),
                    )
                    .into());
                }
                sequences.push(seq);
                input = remaining;
            }
            Err(e) => {
                return Err(ValidationError::MalformedFasta(format!("{:?}", e)).into());
            }
        }
    }

    Ok(sequences)
}

/// Parse a FASTA file into sequences (supports .gz compression)
pub fn parse_fasta<P: AsRef<Path>>(path: P) -> BlastUiResult<Vec<Sequence>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        BlastUiError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;

    let mut buffer = Vec::new();
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let mut decoder = GzDecoder::new(BufReader::new(file));
        decoder.read_to_end(&mut buffer)?;
    } else {
        BufReader::new(file).read_to_end(&mut buffer)?;
    }

    parse_fasta_from_bytes(&buffer)
}

/// Write sequences to a FASTA file (supports .gz compression)
pub fn write_fasta<P: AsRef<Path>>(
    path: P,
    sequences: &[Sequence],
    line_width: usize,
) -> BlastUiResult<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let path = path.as_ref();
    let file = File::create(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let encoder = GzEncoder::new(file, Compression::default());
        let mut writer = BufWriter::new(encoder);
        write_fasta_to_writer(&mut writer, sequences, line_width)?;
        writer.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        write_fasta_to_writer(&mut writer, sequences, line_width)?;
        writer.flush()?;
    }

    Ok(())
}

/// Write sequences to any writer, wrapping sequence lines at `line_width`
/// (0 = no wrapping)
pub fn write_fasta_to_writer<W: Write>(
    writer: &mut W,
    sequences: &[Sequence],
    line_width: usize,
) -> std::io::Result<()> {
    for seq in sequences {
        writer.write_all(seq.header().as_bytes())?;
        writer.write_all(b"\n")?;

        if line_width == 0 {
            writer.write_all(&seq.sequence)?;
            writer.write_all(b"\n")?;
            continue;
        }
        for chunk in seq.sequence.chunks(line_width) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header() {
        let input = b">sp|P12345|PROTEIN_HUMAN Description here\nACGT";
        let (remaining, (id, desc)) = parse_header(input).unwrap();
        assert_eq!(id, "sp|P12345|PROTEIN_HUMAN");
        assert_eq!(desc, Some("Description here"));
        assert_eq!(remaining, b"ACGT");
    }

    #[test]
    fn test_parse_header_tab_separated() {
        let (_, (id, desc)) = parse_header(b">contig_7\tlength=120\n").unwrap();
        assert_eq!(id, "contig_7");
        assert_eq!(desc, Some("length=120"));
    }

    #[test]
    fn test_parse_header_at_eof() {
        let (remaining, (id, desc)) = parse_header(b">lonely").unwrap();
        assert_eq!(id, "lonely");
        assert_eq!(desc, None);
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_parse_multiple_records() {
        let data = b">seq1 first\nacgt\nACGT\n\n>seq2\r\nMKV*\r\n>seq3\n";
        let seqs = parse_fasta_from_bytes(data).unwrap();
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs[0].id, "seq1");
        assert_eq!(seqs[0].description.as_deref(), Some("first"));
        assert_eq!(seqs[0].sequence, b"ACGTACGT");
        assert_eq!(seqs[1].sequence, b"MKV*");
        assert!(seqs[2].is_empty());
    }

    #[test]
    fn test_bare_carriage_returns() {
        let seqs = parse_fasta_from_bytes(b">a\rACGT\rGG\r>b\rTT").unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].sequence, b"ACGTGG");
        assert_eq!(seqs[1].sequence, b"TT");
    }

    #[test]
    fn test_text_before_first_header_is_rejected() {
        let err = parse_fasta_from_bytes(b"ACGT\n>seq1\nACGT\n").unwrap_err();
        match err {
            BlastUiError::Validation(ValidationError::MalformedFasta(msg)) => {
                assert!(msg.contains("ACGT"))
            }
            other => panic!("Expected MalformedFasta, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_fasta_from_bytes(b"").unwrap().is_empty());
        assert!(parse_fasta_from_bytes(b"\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_write_wraps_lines() {
        let seqs = vec![
            Sequence::new("a", b"ACGTACGTAC".to_vec()).with_description("desc"),
            Sequence::new("b", b"GG".to_vec()),
        ];
        let mut out = Vec::new();
        write_fasta_to_writer(&mut out, &seqs, 4).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">a desc\nACGT\nACGT\nAC\n>b\nGG\n"
        );
    }

    #[test]
    fn test_write_and_read_gzip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("seqs.fasta.gz");
        let seqs = vec![Sequence::new("x", b"ACGTN".to_vec())];

        write_fasta(&path, &seqs, 60).unwrap();
        let read = parse_fasta(&path).unwrap();
        assert_eq!(read, seqs);
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let err = parse_fasta("/nonexistent/query.fasta").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/query.fasta"));
    }
}
