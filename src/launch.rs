//! Launch targets and the hand-off to the user's shell.
//!
//! A child process cannot change its parent shell's directory, so the chosen
//! directory is written to a file that the `worktui` shell function (see
//! [`shell_init_script`]) reads after the binary exits.

use std::ffi::CString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming the hand-off file, set by the shell wrapper.
pub const CD_FILE_ENV: &str = "WORKTUI_CD_FILE";

/// What to run once the dashboard closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Drop into a shell in `cwd`
    Shell { cwd: PathBuf },
    /// Start the assistant in `cwd`, resuming `session_id` when given
    Assistant {
        cwd: PathBuf,
        session_id: Option<String>,
    },
}

impl LaunchTarget {
    pub fn cwd(&self) -> &Path {
        match self {
            LaunchTarget::Shell { cwd } | LaunchTarget::Assistant { cwd, .. } => cwd,
        }
    }
}

/// The process working directory as explicit state.
///
/// The directory only changes through [`activate`](Self::activate), which
/// also remembers the activation so quitting can hand it to the shell.
#[derive(Debug, Clone)]
pub struct WorkingDir {
    current: PathBuf,
    activated: Option<PathBuf>,
    apply_to_process: bool,
}

impl WorkingDir {
    /// Track the real process working directory.
    pub fn from_process() -> Result<Self> {
        let current = std::env::current_dir().context("Failed to read current directory")?;
        Ok(Self {
            current,
            activated: None,
            apply_to_process: true,
        })
    }

    /// A working directory that never touches the process.
    pub fn detached(current: impl Into<PathBuf>) -> Self {
        Self {
            current: current.into(),
            activated: None,
            apply_to_process: false,
        }
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Directory activated during this run, if any.
    pub fn activated(&self) -> Option<&Path> {
        self.activated.as_deref()
    }

    /// Whether the working directory is `dir` or below it.
    ///
    /// Compares whole path components, so `/w/feature` is not inside `/w/feat`.
    pub fn is_inside(&self, dir: &Path) -> bool {
        self.current.starts_with(dir)
    }

    pub fn activate(&mut self, dir: &Path) -> std::io::Result<()> {
        if self.apply_to_process {
            std::env::set_current_dir(dir)?;
        }
        self.current = dir.to_path_buf();
        self.activated = Some(dir.to_path_buf());
        Ok(())
    }
}

/// File the target directory is written to.
pub fn cd_file_path() -> PathBuf {
    match std::env::var_os(CD_FILE_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => std::env::temp_dir().join(format!("worktui-cd-{}", nix::unistd::getuid())),
    }
}

pub fn write_cd_file(file: &Path, dir: &Path) -> Result<()> {
    fs::write(file, dir.as_os_str().as_encoded_bytes())
        .with_context(|| format!("Failed to write {}", file.display()))
}

/// Hand the target to the shell and, when needed, replace this process.
///
/// Assistant targets exec `<assistant> [--resume <id>]` in the target
/// directory. Shell targets exec `$SHELL` only when no shell wrapper is
/// waiting to `cd` for us.
pub fn hand_off(target: &LaunchTarget, assistant: &str) -> Result<()> {
    let cwd = target.cwd();
    write_cd_file(&cd_file_path(), cwd)?;
    log::debug!("Launching {:?}", target);

    match target {
        LaunchTarget::Shell { .. } if std::env::var_os(CD_FILE_ENV).is_some() => Ok(()),
        LaunchTarget::Shell { .. } => {
            let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
            exec_in(cwd, &[shell])
        }
        LaunchTarget::Assistant { session_id, .. } => {
            let mut argv = vec![assistant.to_string()];
            if let Some(id) = session_id {
                argv.push("--resume".to_string());
                argv.push(id.clone());
            }
            exec_in(cwd, &argv)
        }
    }
}

/// Replace the current process with `argv` running in `cwd`.
fn exec_in(cwd: &Path, argv: &[String]) -> Result<()> {
    std::env::set_current_dir(cwd)
        .with_context(|| format!("Failed to enter {}", cwd.display()))?;

    let args = argv
        .iter()
        .map(|a| CString::new(a.as_bytes()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Argument contains a NUL byte")?;
    let program = args.first().context("Nothing to launch")?;

    // execvp never returns on success
    match nix::unistd::execvp(program, &args) {
        Ok(infallible) => match infallible {},
        Err(e) => anyhow::bail!("Failed to launch {}: {}", argv[0], e),
    }
}

/// POSIX shell function that runs worktui and follows its directory hand-off.
pub fn shell_init_script() -> &'static str {
    r#"worktui() {
    local cd_file status
    cd_file="$(mktemp "${TMPDIR:-/tmp}/worktui-cd.XXXXXX")" || return
    WORKTUI_CD_FILE="$cd_file" command worktui "$@"
    status=$?
    if [ -s "$cd_file" ]; then
        cd -- "$(cat "$cd_file")" || status=$?
    fi
    rm -f "$cd_file"
    return $status
}
"#
}
