use crate::cli::commands::load_config;
use crate::cli::output::*;
use blastui_bio::QueryBatch;
use blastui_core::{BlastProgram, BlastUiError, MoleculeType, ScoringMatrix};
use blastui_results::{export_results, ExportFormat, ExportOptions};
use blastui_session::{SearchRequest, Session};
use blastui_tools::CancelToken;
use blastui_utils::{create_spinner, format_duration};
use clap::{ArgGroup, Args};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["query", "sequence"])))]
pub struct SearchArgs {
    /// Registered database to search
    #[arg(short, long)]
    pub db: String,

    /// BLAST program
    #[arg(short, long, value_enum, default_value = "blastn")]
    pub program: BlastProgram,

    /// FASTA file with one or more queries
    #[arg(short, long)]
    pub query: Option<PathBuf>,

    /// Query pasted on the command line (bare sequence or FASTA text)
    #[arg(short, long)]
    pub sequence: Option<String>,

    /// Query molecule type (detected when omitted)
    #[arg(short, long, value_enum)]
    pub molecule: Option<MoleculeType>,

    /// E-value cutoff
    #[arg(short, long)]
    pub evalue: Option<f64>,

    #[arg(long)]
    pub max_target_seqs: Option<usize>,

    #[arg(long)]
    pub word_size: Option<u32>,

    /// Scoring matrix (protein-scoring programs only)
    #[arg(long, value_enum)]
    pub matrix: Option<ScoringMatrix>,

    /// Gap opening cost
    #[arg(long, requires = "gap_extend")]
    pub gap_open: Option<u32>,

    /// Gap extension cost
    #[arg(long, requires = "gap_open")]
    pub gap_extend: Option<u32>,

    /// Minimum query coverage per HSP in percent (0 = off)
    #[arg(long)]
    pub qcov_hsp_perc: Option<f64>,

    /// Disable the DUST/SEG low-complexity filter
    #[arg(long)]
    pub no_filter: bool,

    /// Kill the search after this many seconds (0 = never)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Save the results; format from the extension, JSON when unknown
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows to print
    #[arg(long, default_value = "25")]
    pub limit: usize,

    /// Print the results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SearchArgs, threads: usize) -> anyhow::Result<()> {
    let _span = tracing::info_span!("search", db = %args.db, program = %args.program).entered();

    let config = load_config()?;
    let batch = match (&args.query, &args.sequence) {
        (Some(path), _) => QueryBatch::from_fasta_file(path, args.molecule)?,
        (None, Some(text)) => QueryBatch::from_text(text, args.molecule)?,
        (None, None) => anyhow::bail!("either --query or --sequence is required"),
    };
    for message in batch.warnings() {
        warning(message);
    }

    let mut session = Session::new(config.clone())?;
    if let Some(secs) = args.timeout {
        session = session.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }

    let mut params = session.default_params();
    if let Some(evalue) = args.evalue {
        params.evalue = evalue;
    }
    if let Some(max) = args.max_target_seqs {
        params.max_target_seqs = max;
    }
    if let Some(qcov) = args.qcov_hsp_perc {
        params.qcov_hsp_perc = (qcov > 0.0).then_some(qcov);
    }
    if let (Some(open), Some(extend)) = (args.gap_open, args.gap_extend) {
        params.gap_costs = Some((open, extend));
    }
    params.word_size = args.word_size.or(params.word_size);
    params.matrix = args.matrix.or(params.matrix);
    params.low_complexity_filter = !args.no_filter;
    if threads > 0 {
        params.threads = threads;
    }

    let program = args.program;
    let queries = batch.len();
    let request = SearchRequest::new(program, args.db.clone(), batch).with_params(params);

    let token = CancelToken::new();
    let spinner = create_spinner(&format!(
        "Running {} with {} quer{} against '{}'...",
        program,
        queries,
        if queries == 1 { "y" } else { "ies" },
        args.db
    ));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let runtime = tokio::runtime::Runtime::new()?;
    let (session, outcome) = runtime.block_on(async {
        let cancel = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        let bar = spinner.clone();
        tokio::task::spawn_blocking(move || {
            let mut session = session;
            let outcome = session
                .submit(&request, &token, |p| {
                    bar.set_message(format!(
                        "Running {} ({}, {} received)",
                        program,
                        format_duration(p.elapsed),
                        format_size(p.bytes_read)
                    ));
                })
                .map(|_| ());
            let outcome = outcome.map(|()| session.take_results().unwrap_or_default());
            (session, outcome)
        })
        .await
    })?;
    spinner.finish_and_clear();

    let results = match outcome {
        Ok(results) => results,
        Err(BlastUiError::Cancelled) => {
            warning("Search cancelled; partial output was discarded");
            return Err(BlastUiError::Cancelled.into());
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        section_header(&format!("{} hits in '{}'", program, args.db));
        print_hits(&results, DEFAULT_TABLE_COLUMNS, Some(args.limit));
    }

    if let Some(path) = &args.output {
        let format = ExportFormat::from_path(path).unwrap_or(ExportFormat::Json);
        let options = ExportOptions {
            line_width: config.export.fasta_line_width,
            ..ExportOptions::default()
        };
        export_results(&results, path, format, &options)?;
        if !args.json {
            success(&format!("Saved results to {}", path.display()));
        }
    }

    session.close()?;
    Ok(())
}
