use super::{shell_quote, version_stanza, write_executable};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Builder for a fake search executable (`blastn`, `blastp`, ...)
#[derive(Debug, Clone)]
pub struct FakeBlast {
    name: String,
    stdout: String,
    stderr: String,
    exit_code: i32,
    sleep_secs: Option<u32>,
    wrapper: bool,
    pid_file: Option<PathBuf>,
    child_pid_file: Option<PathBuf>,
    args_file: Option<PathBuf>,
}

impl FakeBlast {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            sleep_secs: None,
            wrapper: false,
            pid_file: None,
            child_pid_file: None,
            args_file: None,
        }
    }

    /// Payload written to stdout
    pub fn with_stdout(mut self, payload: impl Into<String>) -> Self {
        self.stdout = payload.into();
        self
    }

    /// Diagnostics written to stderr
    pub fn with_stderr(mut self, text: impl Into<String>) -> Self {
        self.stderr = text.into();
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// After writing its output, block for `secs` instead of exiting.
    ///
    /// The script `exec`s into `sleep` unless [`FakeBlast::as_wrapper`] is
    /// set.
    pub fn hang_for(mut self, secs: u32) -> Self {
        self.sleep_secs = Some(secs);
        self
    }

    /// Hang in a background child that shares the script's stdout and
    /// stderr, then `wait` for it, the way conda shims and module wrappers
    /// run the real tool
    pub fn as_wrapper(mut self) -> Self {
        self.wrapper = true;
        self
    }

    /// Record the pid of the background child started by a wrapper
    pub fn record_child_pid(mut self, path: impl Into<PathBuf>) -> Self {
        self.child_pid_file = Some(path.into());
        self
    }

    /// Record the process id in `path`
    pub fn record_pid(mut self, path: impl Into<PathBuf>) -> Self {
        self.pid_file = Some(path.into());
        self
    }

    /// Record the command-line arguments (one per line) in `path`
    pub fn record_args(mut self, path: impl Into<PathBuf>) -> Self {
        self.args_file = Some(path.into());
        self
    }

    /// Write the script (and its canned output files) into `dir`
    pub fn install(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let stdout_file = dir.join(format!("{}.stdout", self.name));
        let stderr_file = dir.join(format!("{}.stderr", self.name));
        std::fs::write(&stdout_file, &self.stdout)?;
        std::fs::write(&stderr_file, &self.stderr)?;

        let mut script = String::from("#!/bin/sh\n");
        script.push_str(&version_stanza(&self.name));
        if let Some(args) = &self.args_file {
            script.push_str(&format!(
                "for arg in \"$@\"; do echo \"$arg\"; done > {}\n",
                shell_quote(args)
            ));
        }
        if let Some(pid) = &self.pid_file {
            script.push_str(&format!("echo $$ > {}\n", shell_quote(pid)));
        }
        script.push_str(&format!("cat {}\n", shell_quote(&stdout_file)));
        script.push_str(&format!("cat {} >&2\n", shell_quote(&stderr_file)));
        match self.sleep_secs {
            Some(secs) if self.wrapper => {
                script.push_str(&format!("sleep {} &\n", secs));
                if let Some(child_pid) = &self.child_pid_file {
                    script.push_str(&format!("echo $! > {}\n", shell_quote(child_pid)));
                }
                script.push_str("wait\n");
                script.push_str(&format!("exit {}\n", self.exit_code));
            }
            Some(secs) => script.push_str(&format!("exec sleep {}\n", secs)),
            None => script.push_str(&format!("exit {}\n", self.exit_code)),
        }

        write_executable(dir, &self.name, &script)
    }
}
