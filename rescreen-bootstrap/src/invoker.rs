//! Invocation of the external `crispr_screen` tool.
//!
//! The tool is reached through the [`ScreenTool`] capability so that the
//! scheduler can be driven by a stand-in that writes canned result tables.
//! [`CommandTool`] is the production implementation and shells out.

use std::fmt::{self, Display};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use rescreen_core::consts::{DEFAULT_TOOL, DEFAULT_TOOL_SUBCOMMAND, DEFAULT_TOOL_THREADS};
use rescreen_core::utils::gene_results_path;
use rescreen_core::{RescreenError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMethod {
    Geopagg,
    Rra,
    Inc,
}

impl AggregationMethod {
    pub const SUPPORTED: [&'static str; 3] = ["geopagg", "rra", "inc"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::Geopagg => "geopagg",
            AggregationMethod::Rra => "rra",
            AggregationMethod::Inc => "inc",
        }
    }
}

impl FromStr for AggregationMethod {
    type Err = RescreenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "geopagg" => Ok(AggregationMethod::Geopagg),
            "rra" => Ok(AggregationMethod::Rra),
            "inc" => Ok(AggregationMethod::Inc),
            _ => Err(RescreenError::Config(format!(
                "Aggregation method {} is not supported. Choose from {:?}.",
                s,
                AggregationMethod::SUPPORTED
            ))),
        }
    }
}

impl Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// Everything a finished tool process left behind.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.status == Some(0)
    }
}

///
/// Capability interface over the external screen tool.
///
pub trait ScreenTool: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Fail with [`RescreenError::ToolNotFound`] if the tool cannot be run.
    fn check_available(&self) -> Result<()>;

    /// Run the tool to completion with the given arguments.
    fn run(&self, args: &[String]) -> Result<ToolOutput>;

    /// Query the installed version (`--version`).
    fn version(&self) -> Result<String> {
        let output = self.run(&["--version".to_string()])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

///
/// Find an executable by name on `$PATH`, or accept an explicit path.
///
pub fn resolve_executable(program: &str) -> Option<PathBuf> {
    let program = program.trim();
    if program.is_empty() {
        return None;
    }
    if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        let candidate = PathBuf::from(program);
        return is_executable_file(&candidate).then_some(candidate);
    }
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable_file(candidate))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

///
/// Production [`ScreenTool`]: spawns the executable as a blocking child
/// process, optionally killing it after a timeout.
///
#[derive(Debug, Clone)]
pub struct CommandTool {
    program: String,
    timeout: Option<Duration>,
}

impl Default for CommandTool {
    fn default() -> Self {
        CommandTool::new(DEFAULT_TOOL)
    }
}

impl CommandTool {
    pub fn new(program: impl Into<String>) -> Self {
        CommandTool {
            program: program.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut pipe) = pipe {
                let _ = pipe.read_to_end(&mut buf);
            }
            buf
        })
    }
}

impl ScreenTool for CommandTool {
    fn name(&self) -> &str {
        &self.program
    }

    fn check_available(&self) -> Result<()> {
        match resolve_executable(&self.program) {
            Some(_) => Ok(()),
            None => Err(RescreenError::ToolNotFound {
                tool: self.program.clone(),
            }),
        }
    }

    fn run(&self, args: &[String]) -> Result<ToolOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // own process group, so a timeout also reaches anything the tool spawned
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => RescreenError::ToolNotFound {
                tool: self.program.clone(),
            },
            _ => RescreenError::Io(e),
        })?;

        // drain both pipes while waiting so a chatty tool never blocks on a full pipe
        let stdout = Self::drain(child.stdout.take());
        let stderr = Self::drain(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if let Some(timeout) = self.timeout {
                if started.elapsed() >= timeout {
                    kill_process_group(&mut child);
                    let status = child.wait()?;
                    // a descendant that left the group may still hold the pipes;
                    // leave the drain threads behind rather than wait on it
                    return Ok(ToolOutput {
                        status: status.code(),
                        timed_out: true,
                        ..Default::default()
                    });
                }
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok(ToolOutput {
            status: status.code(),
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
            timed_out: false,
        })
    }
}

#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    let pgid = child.id() as i32;
    // SAFETY: signals the group created by `process_group(0)` at spawn; the
    // child has not been reaped yet, so its id cannot have been reused.
    unsafe {
        libc::kill(-pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

///
/// How one screen invocation ended.
///
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenOutcome {
    Completed { results: PathBuf },
    Failed { status: Option<i32>, stderr: String },
    TimedOut,
    /// The tool exited cleanly but never wrote its result table.
    MissingOutput { expected: PathBuf },
}

impl ScreenOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ScreenOutcome::Completed { .. })
    }
}

impl Display for ScreenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScreenOutcome::Completed { results } => write!(f, "completed: {}", results.display()),
            ScreenOutcome::Failed { status, stderr } => {
                let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty());
                match (status, last_line) {
                    (Some(code), Some(line)) => write!(f, "exit status {}: {}", code, line.trim()),
                    (Some(code), None) => write!(f, "exit status {}", code),
                    (None, Some(line)) => write!(f, "terminated by signal: {}", line.trim()),
                    (None, None) => write!(f, "terminated by signal"),
                }
            }
            ScreenOutcome::TimedOut => write!(f, "timed out"),
            ScreenOutcome::MissingOutput { expected } => {
                write!(f, "no result table written to {}", expected.display())
            }
        }
    }
}

///
/// Builds and runs one `crispr_screen test` call. Holds every argument that
/// is constant across a run; only the output prefix and test libraries vary.
///
pub struct ScreenInvoker<T: ScreenTool> {
    tool: T,
    count_matrix: PathBuf,
    reference: Vec<String>,
    method: AggregationMethod,
    use_product: bool,
    min_base_mean: Option<u64>,
    tool_threads: usize,
}

impl<T: ScreenTool> ScreenInvoker<T> {
    pub fn new(
        tool: T,
        count_matrix: PathBuf,
        reference: Vec<String>,
        method: AggregationMethod,
    ) -> Self {
        ScreenInvoker {
            tool,
            count_matrix,
            reference,
            method,
            use_product: false,
            min_base_mean: None,
            tool_threads: DEFAULT_TOOL_THREADS,
        }
    }

    pub fn with_use_product(mut self, use_product: bool) -> Self {
        self.use_product = use_product;
        self
    }

    pub fn with_min_base_mean(mut self, min_base_mean: Option<u64>) -> Self {
        self.min_base_mean = min_base_mean;
        self
    }

    pub fn with_tool_threads(mut self, tool_threads: usize) -> Self {
        self.tool_threads = tool_threads.max(1);
        self
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    ///
    /// The argument vector for one invocation:
    /// `test -i <matrix> -o <prefix> -c <refs..> -t <tests..> -g <method> -T <n> [--use-product] [--min-base-mean <n>]`
    ///
    pub fn build_args(&self, output_prefix: &Path, test_libraries: &[String]) -> Vec<String> {
        let mut args = vec![
            DEFAULT_TOOL_SUBCOMMAND.to_string(),
            "-i".to_string(),
            self.count_matrix.to_string_lossy().into_owned(),
            "-o".to_string(),
            output_prefix.to_string_lossy().into_owned(),
            "-c".to_string(),
        ];
        args.extend(self.reference.iter().cloned());
        args.push("-t".to_string());
        args.extend(test_libraries.iter().cloned());
        args.push("-g".to_string());
        args.push(self.method.to_string());
        args.push("-T".to_string());
        args.push(self.tool_threads.to_string());
        if self.use_product {
            args.push("--use-product".to_string());
        }
        if let Some(min_base_mean) = self.min_base_mean {
            args.push("--min-base-mean".to_string());
            args.push(min_base_mean.to_string());
        }
        args
    }

    ///
    /// Run the tool once and classify the result. Errors are reserved for
    /// failures to run the tool at all; a non-zero exit is an outcome.
    ///
    pub fn invoke(&self, output_prefix: &Path, test_libraries: &[String]) -> Result<ScreenOutcome> {
        let args = self.build_args(output_prefix, test_libraries);
        debug!("{} {}", self.tool.name(), args.join(" "));

        let output = self.tool.run(&args)?;
        if !output.stderr.is_empty() {
            debug!(
                "{} stderr: {}",
                output_prefix.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        if output.timed_out {
            return Ok(ScreenOutcome::TimedOut);
        }
        if !output.success() {
            return Ok(ScreenOutcome::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let results = gene_results_path(output_prefix);
        match results.is_file() {
            true => Ok(ScreenOutcome::Completed { results }),
            false => Ok(ScreenOutcome::MissingOutput { expected: results }),
        }
    }
}
