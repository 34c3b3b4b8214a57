//! Git subprocess collaborators
//!
//! One broad `git log --name-status` stream feeds the untargeted scanner;
//! per-path `git log -1` point queries serve the targeted workers. The
//! broad stream is routinely dropped mid-output when the scanner stops
//! early, so its exit status only means something after a clean EOF.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use gix_hash::ObjectId;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};

use super::resolver::ResolveError;

/// Issues the underlying version-control queries.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Start one broad "history of this subtree" query from `head`,
    /// newest first, with changed-path lines per commit.
    async fn run_history_scan(
        &self,
        repo: &Path,
        head: &ObjectId,
        tree_path: &str,
    ) -> Result<HistoryScan, ResolveError>;

    /// Most recent commit touching exactly `path`, starting from `head`.
    async fn run_point_query(
        &self,
        repo: &Path,
        head: &ObjectId,
        path: &str,
    ) -> Result<ObjectId, ResolveError>;
}

/// A live history-scan stream.
///
/// Wraps the producing process so the consumer can either drain it to EOF
/// (`finish`, where a failed process is a real error) or stop early
/// (`abort`, where the resulting broken pipe and exit status are benign).
pub struct HistoryScan {
    reader: BufReader<Box<dyn AsyncRead + Send + Unpin>>,
    child: Option<Child>,
}

impl HistoryScan {
    fn from_child(mut child: Child) -> Result<Self, ResolveError> {
        let stdout = child.stdout.take().ok_or_else(|| {
            ResolveError::CommandFailed("history scan stdout not captured".to_string())
        })?;
        let stdout: Box<dyn AsyncRead + Send + Unpin> = Box::new(stdout);
        Ok(Self {
            reader: BufReader::new(stdout),
            child: Some(child),
        })
    }

    /// Stream from an in-memory reader with no process behind it.
    /// Used by tests and benchmarks to replay synthetic histories.
    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(reader);
        Self {
            reader: BufReader::new(reader),
            child: None,
        }
    }

    /// Next line without its trailing newline; `None` at EOF.
    pub(crate) async fn next_line(&mut self) -> Result<Option<String>, ResolveError> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Reap the producer after a clean EOF. A non-zero exit here is a
    /// genuine subprocess failure.
    pub(crate) async fn finish(mut self) -> Result<(), ResolveError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let mut stderr_buf = String::new();
        if let Some(mut stderr) = child.stderr.take() {
            let _ = stderr.read_to_string(&mut stderr_buf).await;
        }
        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(ResolveError::CommandFailed(format!(
                "history scan exited with {}: {}",
                status,
                stderr_buf.trim()
            )))
        }
    }

    /// Stop reading before EOF on purpose. The producer is killed and its
    /// exit status discarded: a broken pipe here is the expected outcome
    /// of the early-stop heuristic, not a crash.
    pub(crate) async fn abort(mut self) -> Result<(), ResolveError> {
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }
        Ok(())
    }
}

/// Runs the real `git` binary.
#[derive(Debug, Default, Clone)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

/// A leading ':' would be read as pathspec magic; escape it.
fn pathspec(path: &str) -> String {
    if path.starts_with(':') {
        format!("\\{}", path)
    } else {
        path.to_string()
    }
}

#[async_trait]
impl CommandRunner for GitCli {
    async fn run_history_scan(
        &self,
        repo: &Path,
        head: &ObjectId,
        tree_path: &str,
    ) -> Result<HistoryScan, ResolveError> {
        let mut cmd = Command::new("git");
        cmd.arg("log")
            .arg(head.to_hex().to_string())
            .arg("--format=%H %ct %s")
            .arg("--name-status");
        let tree_path = tree_path.trim_matches('/');
        if !tree_path.is_empty() {
            cmd.arg("--").arg(pathspec(tree_path));
        }
        let child = cmd
            .current_dir(repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        HistoryScan::from_child(child)
    }

    async fn run_point_query(
        &self,
        repo: &Path,
        head: &ObjectId,
        path: &str,
    ) -> Result<ObjectId, ResolveError> {
        let output = Command::new("git")
            .arg("log")
            .arg("-1")
            .arg("--format=%H")
            .arg(head.to_hex().to_string())
            .arg("--")
            .arg(pathspec(path))
            .current_dir(repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ResolveError::CommandFailed(format!(
                "point query for {:?} exited with {}: {}",
                path,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let id_hex = stdout.trim();
        if id_hex.is_empty() {
            return Err(ResolveError::InvalidObjectId(format!(
                "point query for {:?} returned no commit",
                path
            )));
        }
        ObjectId::from_hex(id_hex.as_bytes())
            .map_err(|_| ResolveError::InvalidObjectId(id_hex.to_string()))
    }
}
