//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path ("-" for null output)
    output: PathBuf,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add input arguments (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add multiple input arguments.
    pub fn input_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set seek position (before input).
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Set duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.input_arg("-t").input_arg(format!("{:.3}", seconds))
    }

    /// Stream-copy all streams (no re-encode).
    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set audio filter.
    pub fn audio_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-af").output_arg(filter)
    }

    /// Set output container format.
    pub fn format(self, format: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(format)
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        // Overwrite flag
        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-hide_banner".to_string());

        // Log level
        args.push("-v".to_string());
        args.push(self.log_level.clone());

        // Input args
        args.extend(self.input_args.clone());

        // Input file
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        // Output args
        args.extend(self.output_args.clone());

        // Output file
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Captured output of a finished FFmpeg invocation.
///
/// The runner deliberately does not equate a non-zero exit with failure
/// here: silence detection in null-output mode exits non-zero on some
/// builds while still emitting its diagnostic stream. Callers decide.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr (FFmpeg's diagnostic stream).
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runner for FFmpeg commands with cancellation and timeout support.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner {
    /// Cancellation signal receiver
    cancel_rx: Option<watch::Receiver<bool>>,
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command, treating any non-zero exit as an error.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        let output = self.run_capture(cmd).await?;
        if output.success() {
            Ok(())
        } else {
            Err(MediaError::tool_failed(
                "FFmpeg exited with non-zero status",
                Some(output.stderr),
                output.exit_code,
            ))
        }
    }

    /// Run an FFmpeg command and return the raw exit/stdout/stderr triple.
    pub async fn run_capture(&self, cmd: &FfmpegCommand) -> MediaResult<ToolOutput> {
        // Check FFmpeg exists
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdout_pipe = child.stdout.take().expect("stdout not captured");
        let mut stderr_pipe = child.stderr.take().expect("stderr not captured");

        // Drain both pipes concurrently so the child never blocks on a full buffer
        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stdout_pipe.read_to_end(&mut buf).await;
            buf
        });
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr_pipe.read_to_end(&mut buf).await;
            buf
        });

        let status = self.wait_for_completion(&mut child).await;

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        let status = status?;

        Ok(ToolOutput {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }

    /// Wait for the child process, honoring cancellation and timeout.
    async fn wait_for_completion(
        &self,
        child: &mut Child,
    ) -> MediaResult<std::process::ExitStatus> {
        let deadline = self
            .timeout_secs
            .map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));
        let mut cancel_rx = self.cancel_rx.clone();

        loop {
            tokio::select! {
                status = child.wait() => return Ok(status?),
                _ = async {
                    match deadline {
                        Some(d) => tokio::time::sleep_until(d).await,
                        None => std::future::pending().await,
                    }
                } => {
                    let secs = self.timeout_secs.unwrap_or_default();
                    warn!("FFmpeg timed out after {} seconds, killing process", secs);
                    let _ = child.kill().await;
                    return Err(MediaError::Timeout(secs));
                }
                changed = async {
                    match cancel_rx.as_mut() {
                        Some(rx) => rx.changed().await,
                        None => std::future::pending().await,
                    }
                } => {
                    match changed {
                        Ok(()) => {
                            if cancel_rx.as_ref().is_some_and(|rx| *rx.borrow()) {
                                info!("FFmpeg cancelled, killing process");
                                let _ = child.kill().await;
                                return Err(MediaError::Cancelled);
                            }
                        }
                        // Sender dropped: cancellation can no longer fire
                        Err(_) => cancel_rx = None,
                    }
                }
            }
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}


#[cfg(all(test, target_os = "linux"))]
mod runner_tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tokio::sync::watch;

    // These tests prepend a stub ffmpeg to PATH; serialize them so the
    // environment mutation cannot race
    static PATH_LOCK: Mutex<()> = Mutex::new(());

    /// Install a stub `ffmpeg` that records its pid and sleeps.
    fn install_stub_ffmpeg(dir: &TempDir) -> std::path::PathBuf {
        let pid_file = dir.path().join("ffmpeg.pid");
        let stub = dir.path().join("ffmpeg");
        std::fs::write(
            &stub,
            format!(
                "#!/bin/sh\necho $$ > '{}'\nexec sleep 30\n",
                pid_file.display()
            ),
        )
        .unwrap();
        let mut perms = std::fs::metadata(&stub).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&stub, perms).unwrap();

        let old = std::env::var("PATH").unwrap_or_default();
        std::env::set_var("PATH", format!("{}:{}", dir.path().display(), old));
        pid_file
    }

    fn assert_process_gone(pid_file: &Path) {
        let pid = std::fs::read_to_string(pid_file)
            .unwrap()
            .trim()
            .to_string();
        assert!(
            !Path::new(&format!("/proc/{pid}")).exists(),
            "stub ffmpeg (pid {pid}) still running"
        );
    }

    #[tokio::test]
    async fn test_cancel_kills_in_flight_process() {
        let _guard = PATH_LOCK.lock().unwrap();
        let dir = TempDir::new().unwrap();
        let pid_file = install_stub_ffmpeg(&dir);

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let runner = FfmpegRunner::new().with_cancel(cancel_rx);
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4");

        let trigger = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let _ = cancel_tx.send(true);
        });

        let err = runner.run_capture(&cmd).await.unwrap_err();
        assert!(matches!(err, MediaError::Cancelled));
        assert_process_gone(&pid_file);
        trigger.await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_kills_in_flight_process() {
        let _guard = PATH_LOCK.lock().unwrap();
        let dir = TempDir::new().unwrap();
        let pid_file = install_stub_ffmpeg(&dir);

        let runner = FfmpegRunner::new().with_timeout(1);
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4");

        let err = runner.run_capture(&cmd).await.unwrap_err();
        assert!(matches!(err, MediaError::Timeout(1)));
        assert_process_gone(&pid_file);
    }
}
