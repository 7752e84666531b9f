//! # Local Debug Sessions
//!
//! Starts the skill's own code locally against the platform's debug stream, one
//! variant per runtime:
//!
//! * [`NodeSession`]: runs the `ask-sdk-local-debug` invoker script with `node`,
//!   optionally under `--inspect-brk`.
//! * [`PythonSession`]: runs the installed `ask_sdk_local_debug` adapter with
//!   `python3`, optionally under `debugpy`.
//! * [`JavaSession`]: runs the invoker class through `mvn exec:exec`, optionally
//!   with a JDWP socket.
//!
//! The expansion pipeline has no dependency on this module.

mod session;

use std::{
    io,
    path::{Path, PathBuf},
    process::{Child, ExitStatus},
    str::FromStr,
};

use secrecy::SecretString;
use thiserror::Error;
use tracing::info;

pub use session::{
    JavaSession, NodeSession, PythonSession, find_python_adapter, parse_site_packages,
    python_site_packages,
};

pub const DEFAULT_DEBUG_PORT: u16 = 5000;
pub const HOSTED_CODE_FOLDER: &str = "lambda";

#[derive(Error, Debug)]
pub enum DebugError {
    #[error("Unsupported runtime: {0}")]
    UnsupportedRuntime(String),

    #[error("Missing handler info for runtime {0}")]
    MissingHandler(Runtime),

    #[error("Install ask-sdk-local-debug to debug Python skills")]
    AdapterNotFound,

    #[error("Code folder does not exist: {}", .0.display())]
    CodeFolderNotFound(PathBuf),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Node,
    Python,
    Java,
}

impl FromStr for Runtime {
    type Err = DebugError;

    /// Accepts platform runtime identifiers such as `nodejs18.x` or `python3.9`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower.contains("python") {
            Ok(Runtime::Python)
        } else if lower.contains("node") {
            Ok(Runtime::Node)
        } else if lower.contains("java") {
            Ok(Runtime::Java)
        } else {
            Err(DebugError::UnsupportedRuntime(s.to_string()))
        }
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runtime::Node => write!(f, "node"),
            Runtime::Python => write!(f, "python"),
            Runtime::Java => write!(f, "java"),
        }
    }
}

/// Entry point of the skill code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationInfo {
    pub handler_name: String,
    /// Source file without extension, relative to the code folder. Unused for Java.
    pub skill_file_name: Option<String>,
}

impl InvocationInfo {
    /// Derive the entry point from a `file.function` handler string.
    ///
    /// Hosted skills use fixed entry points and ignore `handler`.
    pub fn resolve(
        handler: Option<&str>,
        runtime: Runtime,
        hosted: bool,
    ) -> Result<Self, DebugError> {
        match (runtime, hosted) {
            (Runtime::Node, true) => Ok(Self::new("handler", Some("index"))),
            (Runtime::Python, true) => Ok(Self::new("lambda_handler", Some("lambda_function"))),
            (Runtime::Java, _) => {
                let handler = non_blank(handler).ok_or(DebugError::MissingHandler(runtime))?;
                Ok(Self::new(handler, None))
            }
            (_, false) => {
                let handler = non_blank(handler).ok_or(DebugError::MissingHandler(runtime))?;
                let mut parts: Vec<&str> = handler.split('.').collect();
                let handler_name = parts.pop().unwrap_or_default();
                Ok(Self::new(handler_name, Some(&parts.join("/"))))
            }
        }
    }

    fn new(handler_name: &str, skill_file_name: Option<&str>) -> Self {
        Self {
            handler_name: handler_name.to_string(),
            skill_file_name: skill_file_name.map(str::to_string),
        }
    }

    fn skill_file(&self, code_folder: &Path, extension: &str) -> PathBuf {
        let name = self.skill_file_name.as_deref().unwrap_or("index");
        code_folder.join(format!("{}.{}", name, extension))
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    /// Run the skill code directly.
    Run,
    /// Start suspended and wait for a debugger on `port`.
    WaitForAttach { port: u16 },
}

impl AttachMode {
    pub fn new(wait_for_attach: bool, port: u16) -> Self {
        if wait_for_attach {
            AttachMode::WaitForAttach { port }
        } else {
            AttachMode::Run
        }
    }
}

/// Everything needed to start a local debug session.
#[derive(Debug)]
pub struct LaunchRequest {
    pub runtime: Runtime,
    pub invocation: InvocationInfo,
    pub code_folder: PathBuf,
    pub attach: AttachMode,
    pub token: SecretString,
    pub skill_id: String,
}

pub trait DebugSession {
    fn runtime(&self) -> Runtime;

    /// The process this session runs.
    fn command(&self, attach: AttachMode) -> std::process::Command;

    /// One-off setup before the process starts.
    fn prepare(&self, _attach: AttachMode) -> Result<(), DebugError> {
        Ok(())
    }

    fn launch(&self, attach: AttachMode) -> Result<SessionHandle, DebugError> {
        self.prepare(attach)?;
        let mut command = self.command(attach);
        let program = command.get_program().to_string_lossy().to_string();
        let child = command
            .spawn()
            .map_err(|source| DebugError::Spawn { program, source })?;
        info!(
            "Started {} debug session (pid {}, {:?})",
            self.runtime(),
            child.id(),
            attach
        );
        Ok(SessionHandle {
            runtime: self.runtime(),
            child,
        })
    }
}

/// A running debug session process.
#[derive(Debug)]
pub struct SessionHandle {
    runtime: Runtime,
    child: Child,
}

impl SessionHandle {
    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn wait(&mut self) -> Result<ExitStatus, DebugError> {
        self.child.wait().map_err(|source| DebugError::Spawn {
            program: self.runtime.to_string(),
            source,
        })
    }

    pub fn kill(&mut self) -> Result<(), DebugError> {
        self.child.kill().map_err(|source| DebugError::Spawn {
            program: self.runtime.to_string(),
            source,
        })
    }
}

/// Pick the session variant for `request.runtime`.
///
/// Python sessions look up the installed debug adapter here.
pub fn session_for(request: LaunchRequest) -> Result<Box<dyn DebugSession>, DebugError> {
    if !request.code_folder.exists() {
        return Err(DebugError::CodeFolderNotFound(request.code_folder));
    }
    let session: Box<dyn DebugSession> = match request.runtime {
        Runtime::Node => Box::new(NodeSession::new(
            &request.code_folder,
            &request.invocation,
            request.token,
            request.skill_id,
        )),
        Runtime::Python => {
            let adapter =
                find_python_adapter(&python_site_packages()?).ok_or(DebugError::AdapterNotFound)?;
            Box::new(PythonSession::new(
                adapter,
                &request.code_folder,
                &request.invocation,
                request.token,
                request.skill_id,
            ))
        }
        Runtime::Java => Box::new(JavaSession::new(
            &request.code_folder,
            &request.invocation,
            request.token,
            request.skill_id,
        )),
    };
    Ok(session)
}

#[tracing::instrument(level = "debug", skip(request), fields(runtime = %request.runtime), err)]
pub fn start(request: LaunchRequest) -> Result<SessionHandle, DebugError> {
    let attach = request.attach;
    session_for(request)?.launch(attach)
}
