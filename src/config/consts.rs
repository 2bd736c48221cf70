/// Token in a workspace template replaced by a fresh unique directory name per run
pub const RANDOM_DIR_TOKEN: &str = "$TEMP$";
/// Directory under the system temp dir used when no default workspace is configured
pub const DEFAULT_WORKSPACE_DIR: &str = "codepack";
/// Sub-directory of a workspace that receives staged inputs
pub const INPUTS_DIR: &str = "inputs";
/// Sub-directory of a workspace where backends write outputs
pub const OUTPUTS_DIR: &str = "outputs";
/// Captured standard output of a process backend run
pub const STDOUT_LOG: &str = "stdout.log";
/// Captured standard error of a process backend run
pub const STDERR_LOG: &str = "stderr.log";
/// Maximum number of stderr bytes quoted in a failure message
pub const STDERR_TAIL_BYTES: usize = 4 * 1024;
/// How long a backend may take to stop after its run is cancelled before it is abandoned
pub const BACKEND_STOP_GRACE: std::time::Duration = std::time::Duration::from_secs(5);
