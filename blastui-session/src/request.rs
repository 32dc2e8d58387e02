use blastui_bio::QueryBatch;
use blastui_core::BlastProgram;
use blastui_tools::SearchParams;

/// One search: which program, against which database, for which queries
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub program: BlastProgram,
    /// Registered database name
    pub database: String,
    pub batch: QueryBatch,
    pub params: SearchParams,
}

impl SearchRequest {
    pub fn new(program: BlastProgram, database: impl Into<String>, batch: QueryBatch) -> Self {
        Self {
            program,
            database: database.into(),
            batch,
            params: SearchParams::default(),
        }
    }

    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    /// Label used in validation messages: the first query id
    pub fn query_label(&self) -> &str {
        self.batch
            .queries()
            .first()
            .map(|q| q.id.as_str())
            .unwrap_or("query")
    }
}
