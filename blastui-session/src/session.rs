/// Session context: one registry, one workspace, one search in flight
use crate::request::SearchRequest;
use blastui_core::config::Config;
use blastui_core::{
    blastui_databases_dir, blastui_tools_dir, blastui_workspace_dir, BlastUiError, BlastUiResult,
};
use blastui_results::{parse_result_set, OutputColumns, ResultSet};
use blastui_tools::{
    run_search, BlastCommand, CancelToken, DatabaseRegistry, ProcessProgress, ProcessRunner,
    SearchParams, Tool, ToolLocator,
};
use blastui_utils::workspace::{TempWorkspace, WorkspaceConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directories a session works in
#[derive(Debug, Clone)]
pub struct SessionPaths {
    pub databases_dir: PathBuf,
    pub tools_dir: PathBuf,
    pub workspace_dir: PathBuf,
}

impl SessionPaths {
    /// Paths from the environment, with `[database] database_dir` taking
    /// precedence for the registry
    pub fn from_config(config: &Config) -> Self {
        Self {
            databases_dir: config
                .database
                .database_dir
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(blastui_databases_dir),
            tools_dir: blastui_tools_dir(),
            workspace_dir: blastui_workspace_dir(),
        }
    }
}

pub struct Session {
    config: Config,
    registry: DatabaseRegistry,
    locator: ToolLocator,
    workspace: TempWorkspace,
    timeout: Option<Duration>,
    searches: usize,
    last_results: Option<ResultSet>,
}

impl Session {
    pub fn new(config: Config) -> BlastUiResult<Self> {
        let paths = SessionPaths::from_config(&config);
        Self::with_paths(config, paths)
    }

    pub fn with_paths(config: Config, paths: SessionPaths) -> BlastUiResult<Self> {
        let executables_dir = config.blast.executables_dir.as_deref().map(Path::new);
        let locator = ToolLocator::new(&paths.tools_dir, executables_dir);
        let registry = DatabaseRegistry::new(&paths.databases_dir, locator.clone());
        let workspace =
            TempWorkspace::with_config("session", WorkspaceConfig::with_root(&paths.workspace_dir))?;
        let timeout =
            (config.blast.timeout_secs > 0).then(|| Duration::from_secs(config.blast.timeout_secs));

        tracing::info!(
            "Session started (databases: {}, workspace: {})",
            paths.databases_dir.display(),
            workspace.root.display()
        );

        Ok(Self {
            config,
            registry,
            locator,
            workspace,
            timeout,
            searches: 0,
            last_results: None,
        })
    }

    /// Use a different locator for both searches and database indexing
    pub fn with_locator(mut self, locator: ToolLocator) -> Self {
        self.registry = DatabaseRegistry::new(self.registry.root().to_path_buf(), locator.clone());
        self.locator = locator;
        self
    }

    /// `None` lets searches run until they finish
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &DatabaseRegistry {
        &self.registry
    }

    pub fn locator(&self) -> &ToolLocator {
        &self.locator
    }

    pub fn workspace(&self) -> &TempWorkspace {
        &self.workspace
    }

    /// Search parameters seeded from the `[blast]` configuration section
    pub fn default_params(&self) -> SearchParams {
        SearchParams::from_config(&self.config.blast)
    }

    pub fn last_results(&self) -> Option<&ResultSet> {
        self.last_results.as_ref()
    }

    pub fn take_results(&mut self) -> Option<ResultSet> {
        self.last_results.take()
    }

    /// Validate, run, parse and store one search.
    ///
    /// Nothing is launched unless the parameters, the database index and the
    /// molecule types all check out. A failed, timed-out or cancelled search
    /// leaves the previous results in place and its output is never parsed.
    pub fn submit<F>(
        &mut self,
        request: &SearchRequest,
        cancel: &CancelToken,
        progress: F,
    ) -> BlastUiResult<&ResultSet>
    where
        F: FnMut(&ProcessProgress),
    {
        let program = request.program;
        let params = &request.params;

        params.validate(program)?;
        let database = self.registry.validate_indexed(&request.database)?;
        params.validate_search(
            program,
            request.query_label(),
            request.batch.molecule(),
            &database.name,
            database.molecule_type,
        )?;
        let executable = self.locator.locate(Tool::from(program))?;

        self.searches += 1;
        let query_file = self.workspace.query_file(self.searches);
        request.batch.write_fasta(&query_file)?;

        let command = BlastCommand::new(
            executable,
            program,
            &query_file,
            database.index_prefix(),
            params.clone(),
        );
        let runner = ProcessRunner::new(program.name())
            .with_timeout(self.timeout)
            .with_cancel(cancel.clone());

        tracing::info!(
            "Searching {} {} queries against '{}'",
            program,
            request.batch.len(),
            database.name
        );
        let outcome = run_search(&command, &runner, progress);
        self.workspace.remove_file(&query_file);

        let output = match outcome {
            Ok(output) => output,
            Err(BlastUiError::Cancelled) => {
                tracing::info!("Search {} cancelled", self.searches);
                return Err(BlastUiError::Cancelled);
            }
            Err(err) => {
                if let Err(e) = self.workspace.mark_error(&err.to_string()) {
                    tracing::warn!("Failed to record search failure: {}", e);
                }
                return Err(err);
            }
        };

        let mut results = parse_result_set(
            output.stdout.as_slice(),
            &OutputColumns::default(),
            request.batch.ids(),
        )?
        .with_source(program, database.name.as_str());
        let dropped = results.retain_evalue(params.evalue);
        if dropped > 0 {
            tracing::debug!("Dropped {} hits above e-value {}", dropped, params.evalue);
        }

        tracing::info!(
            "Search {} finished in {:.1}s with {} hits",
            self.searches,
            output.elapsed.as_secs_f64(),
            results.len()
        );

        let (queries, hits) = (request.batch.len(), results.len());
        if let Err(e) = self.workspace.update_stats(|s| {
            s.searches_run += 1;
            s.queries_submitted += queries;
            s.hits_parsed += hits;
        }) {
            tracing::warn!("Failed to update workspace stats: {}", e);
        }

        Ok(self.last_results.insert(results))
    }

    /// Write the current results as JSON
    pub fn save_results(&self, path: &Path) -> BlastUiResult<()> {
        let results = self
            .last_results
            .as_ref()
            .ok_or_else(|| BlastUiError::NotFound("results: no search has been run".to_string()))?;
        results.save_json(path)
    }

    /// Replace the current results with ones saved earlier
    pub fn load_results(&mut self, path: &Path) -> BlastUiResult<&ResultSet> {
        let results = ResultSet::load_json(path)?;
        Ok(self.last_results.insert(results))
    }

    /// Finish the session and remove its workspace
    pub fn close(mut self) -> BlastUiResult<()> {
        self.workspace.mark_completed()?;
        self.workspace.cleanup()?;
        Ok(())
    }
}
