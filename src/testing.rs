//! In-memory port fakes shared by unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::Settings;
use crate::context::Ports;
use crate::ports::{FileSystem, GitRepo, SharedFileSystem, ShellExecutor, ShellOutput};

/// Inventory location used by wired test containers.
pub const INVENTORY: &str = "/work/.deployer/inventory.yml";

pub fn settings() -> Settings {
    Settings { inventory_path: PathBuf::from(INVENTORY) }
}

/// Ports backed by fakes: an empty memory filesystem (returned for
/// inspection), a shell with nothing queued and no git repository.
pub fn fake_ports() -> (Arc<MemoryFileSystem>, Ports) {
    let fs = Arc::new(MemoryFileSystem::new());
    let ports = Ports {
        fs: Arc::clone(&fs) as SharedFileSystem,
        git: Arc::new(StubGit::outside_repository()),
        shell: Arc::new(ScriptedShell::new()),
    };
    (fs, ports)
}

/// In-memory filesystem for testing without touching disk.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
    dirs: Mutex<HashSet<PathBuf>>,
    fail_writes: bool,
    fail_directories: bool,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `write` fails.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Every `create_dir_all` fails.
    pub fn failing_directories(mut self) -> Self {
        self.fail_directories = true;
        self
    }

    /// Places a file, creating its parent directories.
    pub fn insert_file(&self, path: impl AsRef<Path>, contents: &str) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dirs(parent);
        }
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    fn add_dirs(&self, path: &Path) {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.read(path).ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_writes {
            return Err("disk full".into());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !self.dirs.lock().unwrap().contains(parent) {
                return Err(format!("No such directory: {}", parent.display()).into());
            }
        }
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.dirs.lock().unwrap().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_directories {
            return Err("permission denied".into());
        }
        self.add_dirs(path);
        Ok(())
    }
}

/// Shell fake that replays queued outputs and records every invocation.
#[derive(Default)]
pub struct ScriptedShell {
    outputs: Mutex<VecDeque<ShellOutput>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the output of the next call.
    pub fn then(self, exit_code: i32, stderr: &str) -> Self {
        self.outputs.lock().unwrap().push_back(ShellOutput {
            exit_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        });
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ShellExecutor for ScriptedShell {
    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>> {
        self.calls.lock().unwrap().push((program.to_string(), args.to_vec()));
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| format!("{program}: command not found").into())
    }
}

/// Git fake returning fixed answers; `None` means "not a repository".
pub struct StubGit {
    pub remote: Option<String>,
    pub branch: Option<String>,
}

impl StubGit {
    pub fn new(remote: &str, branch: &str) -> Self {
        Self { remote: Some(remote.to_string()), branch: Some(branch.to_string()) }
    }

    pub fn outside_repository() -> Self {
        Self { remote: None, branch: None }
    }
}

impl GitRepo for StubGit {
    fn remote_url(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.remote.clone().ok_or_else(|| "not a git repository".into())
    }

    fn current_branch(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.branch.clone().ok_or_else(|| "not a git repository".into())
    }
}
