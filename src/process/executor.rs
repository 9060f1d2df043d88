//! Low-level command execution with an optional deadline

use std::io::{ErrorKind, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;
use wait_timeout::ChildExt;

use super::error::RunError;
use super::result::InvocationResult;
use super::spec::{CommandLine, InvocationSpec};

/// Timeout for collecting output from child process pipes
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Synthetic exit code for a timed-out process that had written to stderr
pub const TIMEOUT_STDERR_EXIT_CODE: i32 = -1;

/// Synthetic exit code for a timed-out process with a silent stderr
pub const TIMEOUT_SILENT_EXIT_CODE: i32 = 0;

/// Exit code reported when the deadline elapses.
///
/// A timeout is not an error: a process that had begun succeeding silently
/// looks like a clean exit, one that complained on stderr looks like a
/// failure.
pub fn timeout_exit_code(stderr: &str) -> i32 {
    if stderr.is_empty() {
        TIMEOUT_SILENT_EXIT_CODE
    } else {
        TIMEOUT_STDERR_EXIT_CODE
    }
}

/// Launch the command described by `spec` and collect its result.
///
/// Classification is left to the caller (see [`run`](super::run)); this only
/// fails when the command cannot be launched or waited on.
pub fn execute(spec: &InvocationSpec) -> Result<InvocationResult, RunError> {
    let start = Instant::now();
    let command = spec.display();

    let mut child = spawn(spec, &command)?;

    // Drain both pipes while waiting, otherwise a chatty child blocks on a
    // full pipe buffer and never exits.
    let stdout = StreamCapture::start(child.stdout.take());
    let stderr = StreamCapture::start(child.stderr.take());

    let wait_error = |source| RunError::Wait {
        command: command.clone(),
        source,
    };

    let (exit_code, stdout, stderr, timed_out) = match spec.timeout {
        None => {
            let status = child.wait().map_err(wait_error)?;
            (exit_code_of(status), stdout.finish(), stderr.finish(), false)
        }
        Some(timeout) => match child.wait_timeout(timeout).map_err(wait_error)? {
            Some(status) => (exit_code_of(status), stdout.finish(), stderr.finish(), false),
            None => {
                // Whatever the readers have buffered so far is all we report
                let out = stdout.snapshot();
                let err = stderr.snapshot();
                if spec.kill_on_timeout {
                    kill_child_process(&mut child);
                }
                (timeout_exit_code(&err), out, err, true)
            }
        },
    };

    debug!(
        command = %command,
        ret = exit_code,
        stdout = %stdout,
        stderr = %stderr,
        timed_out,
        "run"
    );

    Ok(InvocationResult {
        command,
        exit_code,
        stdout,
        stderr,
        timed_out,
        duration: start.elapsed(),
    })
}

fn spawn(spec: &InvocationSpec, display: &str) -> Result<Child, RunError> {
    let mut cmd = build_command(spec)?;

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = &spec.working_dir {
        cmd.current_dir(dir);
    }

    cmd.spawn().map_err(|source| RunError::Spawn {
        command: display.to_string(),
        source,
    })
}

/// Turn the invocation's command into a `Command`.
///
/// In shell mode an argument vector is joined with single spaces and run
/// through `sh -c`; outside shell mode a single string names the program.
pub(crate) fn build_command(spec: &InvocationSpec) -> Result<Command, RunError> {
    match (&spec.command, spec.shell) {
        (CommandLine::Line(line), _) if line.trim().is_empty() => {
            Err(RunError::InvalidCommandShape {
                reason: "empty command line".to_string(),
            })
        }
        (CommandLine::Args(args), true) => {
            if args.is_empty() {
                return Err(empty_args());
            }
            Ok(shell_command(&args.join(" ")))
        }
        (CommandLine::Line(line), true) => Ok(shell_command(line)),
        (CommandLine::Args(args), false) => {
            let (program, rest) = args.split_first().ok_or_else(empty_args)?;
            let mut cmd = Command::new(program);
            cmd.args(rest);
            Ok(cmd)
        }
        (CommandLine::Line(line), false) => Ok(Command::new(line)),
    }
}

fn empty_args() -> RunError {
    RunError::InvalidCommandShape {
        reason: "empty argument vector".to_string(),
    }
}

fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

/// Exit code of a finished process; a signalled child reports `-signal`
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

/// Trim surrounding whitespace, keep everything in between
fn clean_output(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

/// Background reader that accumulates one pipe into a shared buffer.
///
/// The buffer is readable at any time, so a timed-out invocation can still
/// report partial output.
struct StreamCapture {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl StreamCapture {
    fn start<R: Read + Send + 'static>(stream: Option<R>) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done) = mpsc::channel();

        if let Some(mut stream) = stream {
            let buf = Arc::clone(&buf);
            thread::spawn(move || {
                let mut chunk = [0u8; 8192];
                loop {
                    match stream.read(&mut chunk) {
                        Ok(0) => break, // EOF
                        Ok(n) => buf
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .extend_from_slice(&chunk[..n]),
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(_) => break,
                    }
                }
                let _ = done_tx.send(());
            });
        }

        Self { buf, done }
    }

    /// Wait for the reader to hit EOF, then return everything it read
    fn finish(self) -> String {
        // A grandchild holding the pipe open must not hang the harness
        let _ = self.done.recv_timeout(OUTPUT_COLLECTION_TIMEOUT);
        self.snapshot()
    }

    fn snapshot(&self) -> String {
        let buf = self
            .buf
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        clean_output(&buf)
    }
}

/// Terminate a child process
fn kill_child_process(child: &mut Child) {
    // The process may have exited between the deadline and now
    let _ = child.kill();
    // Wait to reap the zombie process
    let _ = child.wait();
}
