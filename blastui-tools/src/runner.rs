//! Supervised execution of external tools.
//!
//! stdout and stderr are drained on their own threads while the calling
//! thread polls the child, so a chatty process can never block on a full pipe
//! and the caller keeps control for progress reporting, timeouts and
//! cancellation. On unix the child leads its own process group, and a kill
//! takes the whole group down, including anything a wrapper script started.
//! A killed process is always reaped before returning.

use blastui_core::{BlastUiError, BlastUiResult, SubprocessError};
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const READ_CHUNK: usize = 64 * 1024;

/// Shared flag used to abort a running process from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Snapshot handed to progress callbacks while a process runs
#[derive(Debug, Clone, Copy)]
pub struct ProcessProgress {
    pub pid: u32,
    pub elapsed: Duration,
    /// Bytes of stdout received so far
    pub bytes_read: u64,
}

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Runs one external command to completion under a timeout and cancel token
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
    poll_interval: Duration,
}

impl ProcessRunner {
    /// `program` is the name used in error messages
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            cancel: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn run(&self, command: Command) -> BlastUiResult<ProcessOutput> {
        self.run_with_progress(command, |_| {})
    }

    /// Run `command`, calling `progress` on every poll.
    ///
    /// Output of a cancelled, timed out or crashed process is dropped.
    pub fn run_with_progress<F>(&self, mut command: Command, mut progress: F) -> BlastUiResult<ProcessOutput>
    where
        F: FnMut(&ProcessProgress),
    {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        tracing::debug!("Executing: {:?}", command);

        let mut child = command.spawn().map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SubprocessError::NotFound(self.program.clone())
            } else {
                SubprocessError::Spawn {
                    program: self.program.clone(),
                    source,
                }
            }
        })?;

        let pid = child.id();
        tracing::debug!("{} started (PID: {})", self.program, pid);

        let bytes_read = Arc::new(AtomicU64::new(0));
        let readers = Readers {
            stdout: child
                .stdout
                .take()
                .map(|stdout| spawn_stdout_reader(stdout, bytes_read.clone())),
            stderr: child
                .stderr
                .take()
                .map(|stderr| spawn_stderr_reader(stderr, self.program.clone())),
        };

        let start = Instant::now();
        let snapshot = |start: &Instant| ProcessProgress {
            pid,
            elapsed: start.elapsed(),
            bytes_read: bytes_read.load(Ordering::Relaxed),
        };

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if self.is_cancelled() {
                        tracing::info!("Cancelling {} (PID: {})", self.program, pid);
                        terminate(&mut child);
                        readers.discard();
                        return Err(BlastUiError::Cancelled);
                    }

                    if let Some(timeout) = self.timeout {
                        if start.elapsed() > timeout {
                            tracing::warn!(
                                "{} exceeded {:?} timeout, killing PID {}",
                                self.program,
                                timeout,
                                pid
                            );
                            terminate(&mut child);
                            readers.discard();
                            return Err(SubprocessError::Timeout {
                                program: self.program.clone(),
                                timeout,
                            }
                            .into());
                        }
                    }

                    progress(&snapshot(&start));
                    std::thread::sleep(self.poll_interval);
                }
                Err(e) => {
                    terminate(&mut child);
                    readers.discard();
                    return Err(SubprocessError::Output {
                        program: self.program.clone(),
                        message: format!("failed to check process status: {}", e),
                    }
                    .into());
                }
            }
        };

        let (stdout, stderr) = readers.collect(&self.program)?;

        // A cancel that raced the exit still wins
        if self.is_cancelled() {
            return Err(BlastUiError::Cancelled);
        }

        progress(&snapshot(&start));
        let elapsed = start.elapsed();

        if !status.success() {
            return Err(exit_failure(&self.program, status, stderr).into());
        }

        tracing::debug!(
            "{} finished in {:.2}s ({} bytes of output)",
            self.program,
            elapsed.as_secs_f64(),
            stdout.len()
        );

        Ok(ProcessOutput {
            stdout,
            stderr,
            elapsed,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }
}

struct Readers {
    stdout: Option<JoinHandle<io::Result<Vec<u8>>>>,
    stderr: Option<JoinHandle<io::Result<Vec<u8>>>>,
}

impl Readers {
    /// Drop the readers without joining them. A process that left the
    /// killed group may still hold the write ends; the threads exit once the
    /// last one closes.
    fn discard(self) {
        drop(self.stdout);
        drop(self.stderr);
    }

    fn collect(self, program: &str) -> BlastUiResult<(Vec<u8>, String)> {
        let stdout = join_reader(self.stdout, program, "stdout")?;
        let stderr = join_reader(self.stderr, program, "stderr")?;
        Ok((stdout, String::from_utf8_lossy(&stderr).into_owned()))
    }
}

fn join_reader(
    handle: Option<JoinHandle<io::Result<Vec<u8>>>>,
    program: &str,
    stream: &str,
) -> BlastUiResult<Vec<u8>> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    match handle.join() {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => Err(SubprocessError::Output {
            program: program.to_string(),
            message: format!("{} read failed: {}", stream, e),
        }
        .into()),
        Err(_) => Err(SubprocessError::Output {
            program: program.to_string(),
            message: format!("{} reader thread panicked", stream),
        }
        .into()),
    }
}

fn spawn_stdout_reader(mut stdout: ChildStdout, counter: Arc<AtomicU64>) -> JoinHandle<io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut payload = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            match stdout.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    payload.extend_from_slice(&chunk[..n]);
                    counter.fetch_add(n as u64, Ordering::Relaxed);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(payload)
    })
}

fn spawn_stderr_reader(stderr: ChildStderr, program: String) -> JoinHandle<io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut reader = BufReader::new(stderr);
        let mut buffer = Vec::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            tracing::trace!("{} [stderr]: {}", program, String::from_utf8_lossy(&line).trim_end());
            buffer.extend_from_slice(&line);
        }
        Ok(buffer)
    })
}

/// Kill the child's process group and reap the child; either step may fail
/// if the process already exited
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        let pgid = child.id() as libc::pid_t;
        // SAFETY: killpg has no memory-safety preconditions
        if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
            child.kill().ok();
        }
    }
    #[cfg(not(unix))]
    child.kill().ok();

    let _ = child.wait();
}

fn exit_failure(program: &str, status: ExitStatus, stderr: String) -> SubprocessError {
    if let Some(code) = status.code() {
        return SubprocessError::NonZeroExit {
            program: program.to_string(),
            code,
            stderr,
        };
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return SubprocessError::Signal {
                program: program.to_string(),
                signal,
                stderr,
            };
        }
    }

    SubprocessError::NonZeroExit {
        program: program.to_string(),
        code: -1,
        stderr,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use blastui_test::{fixtures, FakeBlast};
    use std::path::Path;
    use tempfile::TempDir;

    fn command_for(exe: &Path) -> Command {
        let mut cmd = Command::new(exe);
        cmd.args(["-query", "q.fasta"]);
        cmd
    }

    #[test]
    fn test_run_success_captures_both_streams() {
        let dir = TempDir::new().unwrap();
        let exe = FakeBlast::new("blastn")
            .with_stdout(fixtures::standard_payload())
            .with_stderr("Warning: [blastn] Query_1: low complexity\n")
            .install(dir.path())
            .unwrap();

        let output = ProcessRunner::new("blastn").run(command_for(&exe)).unwrap();
        assert_eq!(output.stdout, fixtures::standard_payload().into_bytes());
        assert!(output.stderr.contains("low complexity"));
    }

    #[test]
    fn test_nonzero_exit_keeps_stderr_verbatim() {
        let dir = TempDir::new().unwrap();
        let diagnostics = "BLAST Database error: No alias or index file found for nucleotide database [db] in search path\n";
        let exe = FakeBlast::new("blastn")
            .with_stdout("partial\trow\n")
            .with_stderr(diagnostics)
            .exit_code(2)
            .install(dir.path())
            .unwrap();

        let err = ProcessRunner::new("blastn").run(command_for(&exe)).unwrap_err();
        match err {
            BlastUiError::Subprocess(SubprocessError::NonZeroExit { code, stderr, .. }) => {
                assert_eq!(code, 2);
                assert_eq!(stderr, diagnostics);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_executable() {
        let err = ProcessRunner::new("blastp")
            .run(Command::new("/nonexistent/dir/blastp"))
            .unwrap_err();
        assert!(matches!(
            err,
            BlastUiError::Subprocess(SubprocessError::NotFound(ref p)) if p == "blastp"
        ));
    }

    #[test]
    fn test_timeout_kills_process() {
        let dir = TempDir::new().unwrap();
        let exe = FakeBlast::new("blastp").hang_for(30).install(dir.path()).unwrap();

        let start = Instant::now();
        let err = ProcessRunner::new("blastp")
            .with_timeout(Some(Duration::from_millis(300)))
            .with_poll_interval(Duration::from_millis(20))
            .run(command_for(&exe))
            .unwrap_err();

        assert!(matches!(
            err,
            BlastUiError::Subprocess(SubprocessError::Timeout { .. })
        ));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_cancel_kills_and_reaps_process() {
        let dir = TempDir::new().unwrap();
        let pid_file = dir.path().join("pid");
        let exe = FakeBlast::new("blastn")
            .with_stdout(fixtures::standard_payload())
            .hang_for(30)
            .record_pid(&pid_file)
            .install(dir.path())
            .unwrap();

        let token = CancelToken::new();
        let trigger = token.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(300));
            trigger.cancel();
        });

        let result = ProcessRunner::new("blastn")
            .with_cancel(token)
            .with_poll_interval(Duration::from_millis(20))
            .run(command_for(&exe));
        canceller.join().unwrap();

        assert!(matches!(result, Err(BlastUiError::Cancelled)));

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let pid = pid.trim();
        assert!(!pid.is_empty());
        #[cfg(target_os = "linux")]
        assert!(
            !Path::new("/proc").join(pid).exists(),
            "process {pid} is still present"
        );
    }

    /// True while `pid` exists and is not a zombie awaiting its new parent
    #[cfg(target_os = "linux")]
    fn is_running(pid: &str) -> bool {
        match std::fs::read_to_string(Path::new("/proc").join(pid).join("stat")) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .and_then(|rest| rest.trim_start().chars().next())
                .is_some_and(|state| state != 'Z'),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    fn assert_gone(pid_file: &Path) {
        let pid = std::fs::read_to_string(pid_file).unwrap();
        let pid = pid.trim();
        let deadline = Instant::now() + Duration::from_secs(2);
        while is_running(pid) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(!is_running(pid), "child {pid} outlived its wrapper");
    }

    #[test]
    fn test_cancel_kills_children_of_wrapper_script() {
        let dir = TempDir::new().unwrap();
        let child_pid = dir.path().join("child.pid");
        let exe = FakeBlast::new("blastn")
            .with_stdout("query_1\tNODE_1\n")
            .hang_for(8)
            .as_wrapper()
            .record_child_pid(&child_pid)
            .install(dir.path())
            .unwrap();

        let token = CancelToken::new();
        let trigger = token.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            trigger.cancel();
        });

        let start = Instant::now();
        let result = ProcessRunner::new("blastn")
            .with_cancel(token)
            .with_poll_interval(Duration::from_millis(20))
            .run(command_for(&exe));
        canceller.join().unwrap();

        assert!(matches!(result, Err(BlastUiError::Cancelled)), "{result:?}");
        assert!(start.elapsed() < Duration::from_secs(2), "cancel took {:?}", start.elapsed());
        #[cfg(target_os = "linux")]
        assert_gone(&child_pid);
    }

    #[test]
    fn test_timeout_kills_children_of_wrapper_script() {
        let dir = TempDir::new().unwrap();
        let child_pid = dir.path().join("child.pid");
        let exe = FakeBlast::new("blastn")
            .hang_for(8)
            .as_wrapper()
            .record_child_pid(&child_pid)
            .install(dir.path())
            .unwrap();

        let start = Instant::now();
        let err = ProcessRunner::new("blastn")
            .with_timeout(Some(Duration::from_millis(300)))
            .with_poll_interval(Duration::from_millis(20))
            .run(command_for(&exe))
            .unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(2), "timeout took {:?}", start.elapsed());
        match err {
            BlastUiError::Subprocess(SubprocessError::Timeout { timeout, .. }) => {
                assert_eq!(timeout, Duration::from_millis(300));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        #[cfg(target_os = "linux")]
        assert_gone(&child_pid);
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        let dir = TempDir::new().unwrap();
        let payload = fixtures::large_payload(40_000);
        let noise = "Warning: noisy diagnostics\n".repeat(10_000);
        let exe = FakeBlast::new("blastn")
            .with_stdout(payload.clone())
            .with_stderr(noise.clone())
            .install(dir.path())
            .unwrap();

        let mut last_seen = 0;
        let output = ProcessRunner::new("blastn")
            .with_timeout(Some(Duration::from_secs(60)))
            .run_with_progress(command_for(&exe), |p| last_seen = p.bytes_read)
            .unwrap();

        assert_eq!(output.stdout.len(), payload.len());
        assert_eq!(output.stderr.len(), noise.len());
        assert_eq!(last_seen, payload.len() as u64);
    }

    #[test]
    fn test_repeated_runs_are_byte_identical() {
        let dir = TempDir::new().unwrap();
        let exe = FakeBlast::new("blastn")
            .with_stdout(fixtures::extended_payload())
            .install(dir.path())
            .unwrap();

        let runner = ProcessRunner::new("blastn");
        let first = runner.run(command_for(&exe)).unwrap();
        let second = runner.run(command_for(&exe)).unwrap();
        assert_eq!(first.stdout, second.stdout);
    }

    #[test]
    fn test_signal_is_reported() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("tblastx");
        std::fs::write(&script, "#!/bin/sh\necho 'about to crash' >&2\nkill -9 $$\n").unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        std::os::unix::fs::PermissionsExt::set_mode(&mut perms, 0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let err = ProcessRunner::new("tblastx").run(Command::new(&script)).unwrap_err();
        match err {
            BlastUiError::Subprocess(SubprocessError::Signal { signal, stderr, .. }) => {
                assert_eq!(signal, 9);
                assert!(stderr.contains("about to crash"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
