use std::{
    path::{Path, PathBuf},
    process::Command,
};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use super::{AttachMode, DebugError, DebugSession, InvocationInfo, Runtime};

const NODE_INVOKER: &str = "node_modules/ask-sdk-local-debug/dist/LocalDebuggerInvoker.js";
const PYTHON_ADAPTER: [&str; 2] = ["ask_sdk_local_debug", "local_debugger_invoker.py"];
const JAVA_INVOKER_CLASS: &str = "com.amazon.ask.localdebug.LocalDebuggerInvoker";

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

pub struct NodeSession {
    invoker_script: PathBuf,
    skill_entry_file: PathBuf,
    handler_name: String,
    token: SecretString,
    skill_id: String,
}

impl NodeSession {
    pub fn new(
        code_folder: &Path,
        invocation: &InvocationInfo,
        token: SecretString,
        skill_id: String,
    ) -> Self {
        Self {
            invoker_script: code_folder.join(NODE_INVOKER),
            skill_entry_file: absolute(invocation.skill_file(code_folder, "js")),
            handler_name: invocation.handler_name.clone(),
            token,
            skill_id,
        }
    }
}

impl DebugSession for NodeSession {
    fn runtime(&self) -> Runtime {
        Runtime::Node
    }

    fn command(&self, attach: AttachMode) -> Command {
        let mut command = Command::new("node");
        if let AttachMode::WaitForAttach { port } = attach {
            command.arg(format!("--inspect-brk={}", port));
        }
        command
            .arg(&self.invoker_script)
            .arg("--accessToken")
            .arg(self.token.expose_secret())
            .args(["--skillId", self.skill_id.as_str()])
            .args(["--handlerName", self.handler_name.as_str()])
            .arg("--skillEntryFile")
            .arg(&self.skill_entry_file);
        command
    }
}

pub struct PythonSession {
    adapter: PathBuf,
    skill_file: PathBuf,
    handler_name: String,
    token: SecretString,
    skill_id: String,
}

impl PythonSession {
    pub fn new(
        adapter: PathBuf,
        code_folder: &Path,
        invocation: &InvocationInfo,
        token: SecretString,
        skill_id: String,
    ) -> Self {
        Self {
            adapter,
            skill_file: invocation.skill_file(code_folder, "py"),
            handler_name: invocation.handler_name.clone(),
            token,
            skill_id,
        }
    }
}

impl DebugSession for PythonSession {
    fn runtime(&self) -> Runtime {
        Runtime::Python
    }

    fn command(&self, attach: AttachMode) -> Command {
        let mut command = Command::new("python3");
        if let AttachMode::WaitForAttach { port } = attach {
            command
                .args(["-m", "debugpy", "--listen"])
                .arg(port.to_string())
                .arg("--wait-for-client");
        }
        command
            .arg(&self.adapter)
            .arg("--accessToken")
            .arg(self.token.expose_secret())
            .args(["--skillId", self.skill_id.as_str()])
            .args(["--skillHandler", self.handler_name.as_str()])
            .arg("--skillFilePath")
            .arg(&self.skill_file);
        command
    }

    /// Attaching needs `debugpy` in the interpreter's environment.
    fn prepare(&self, attach: AttachMode) -> Result<(), DebugError> {
        if attach == AttachMode::Run {
            return Ok(());
        }
        info!("Installing debugpy");
        let program = "python3 -m pip install debugpy".to_string();
        let status = Command::new("python3")
            .args(["-m", "pip", "install", "debugpy"])
            .status()
            .map_err(|source| DebugError::Spawn {
                program: program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(DebugError::Failed { program, status });
        }
        Ok(())
    }
}

pub struct JavaSession {
    code_folder: PathBuf,
    handler_class: String,
    token: SecretString,
    skill_id: String,
}

impl JavaSession {
    pub fn new(
        code_folder: &Path,
        invocation: &InvocationInfo,
        token: SecretString,
        skill_id: String,
    ) -> Self {
        Self {
            code_folder: code_folder.to_path_buf(),
            handler_class: invocation.handler_name.clone(),
            token,
            skill_id,
        }
    }

    fn exec_args(&self, attach: AttachMode) -> String {
        let mut args = vec!["-classpath %classpath".to_string()];
        if let AttachMode::WaitForAttach { port } = attach {
            args.push(format!(
                "-Xdebug -Xrunjdwp:transport=dt_socket,server=y,suspend=n,address={}",
                port
            ));
        }
        args.push(format!(
            "{} --accessToken {} --skillId {} --skillStreamHandlerClass {}",
            JAVA_INVOKER_CLASS,
            self.token.expose_secret(),
            self.skill_id,
            self.handler_class
        ));
        args.join(" ")
    }
}

impl DebugSession for JavaSession {
    fn runtime(&self) -> Runtime {
        Runtime::Java
    }

    fn command(&self, attach: AttachMode) -> Command {
        let mut command = Command::new("mvn");
        command
            .current_dir(&self.code_folder)
            .args(["exec:exec", "-Dexec.executable=java"])
            .arg(format!("-Dexec.args={}", self.exec_args(attach)));
        command
    }
}

/// Site-packages directories of the local `python3`.
pub fn python_site_packages() -> Result<Vec<PathBuf>, DebugError> {
    let program = "python3".to_string();
    let output = Command::new(&program)
        .args(["-c", "import site; print(site.getsitepackages())"])
        .output()
        .map_err(|source| DebugError::Spawn {
            program: program.clone(),
            source,
        })?;
    if !output.status.success() {
        return Err(DebugError::Failed {
            program,
            status: output.status,
        });
    }
    let dirs = parse_site_packages(&String::from_utf8_lossy(&output.stdout));
    debug!("Python site-packages: {:?}", dirs);
    Ok(dirs)
}

/// Parse the printed Python list, e.g. `['/usr/lib/python3/site-packages', '/opt/site']`.
pub fn parse_site_packages(printed: &str) -> Vec<PathBuf> {
    printed
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|s| s.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// First adapter script found across `site_packages`.
pub fn find_python_adapter(site_packages: &[PathBuf]) -> Option<PathBuf> {
    site_packages
        .iter()
        .map(|dir| dir.join(PYTHON_ADAPTER[0]).join(PYTHON_ADAPTER[1]))
        .find(|path| path.exists())
}
