//! Test doubles shared by the core unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use novaforge_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

use crate::forge::engine::{ForgeEngine, GenerationSettings};
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::LlmProvider;
use crate::service::fs::FileSystem;

// --- LLM ---

/// Provider that answers every request with the same content (or error) and
/// records what it was sent.
pub struct ScriptedProvider {
    capabilities: ProviderCapabilities,
    replies: Option<Vec<String>>,
    calls: AtomicUsize,
    stop_reason: StopReason,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn replying(content: &str) -> Self {
        Self {
            capabilities: ProviderCapabilities {
                structured_output: false,
                max_context_tokens: 100_000,
                max_output_tokens: 8_192,
            },
            replies: Some(vec![content.to_string()]),
            calls: AtomicUsize::new(0),
            stop_reason: StopReason::EndTurn,
            requests: Arc::default(),
        }
    }

    /// Answer successive calls with successive entries, wrapping around.
    pub fn cycling(contents: &[&str]) -> Self {
        Self {
            replies: Some(contents.iter().map(|c| c.to_string()).collect()),
            ..Self::replying("")
        }
    }

    pub fn failing() -> Self {
        Self {
            replies: None,
            ..Self::replying("")
        }
    }

    /// Report every reply as cut off by the output token limit.
    pub fn truncated(mut self) -> Self {
        self.stop_reason = StopReason::MaxTokens;
        self
    }

    /// Advertise structured-output support.
    pub fn structured(mut self) -> Self {
        self.capabilities.structured_output = true;
        self
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .as_ref()
            .map(|replies| replies[call % replies.len()].clone());
        let stop_reason = self.stop_reason.clone();
        let model = request.model.clone();
        async move {
            match reply {
                Some(content) => Ok(CompletionResponse {
                    id: "resp-scripted".to_string(),
                    content,
                    model,
                    stop_reason,
                    usage: Usage {
                        input_tokens: 10,
                        output_tokens: 20,
                    },
                }),
                None => Err(LlmError::Provider {
                    message: "scripted failure".to_string(),
                }),
            }
        }
    }
}

pub fn engine_with(provider: ScriptedProvider) -> ForgeEngine {
    ForgeEngine::new(
        BoxLlmProvider::new(provider),
        GenerationSettings {
            model: "test-model".to_string(),
            max_tokens: 1024,
            temperature: None,
        },
    )
}

// --- Filesystem ---

#[derive(Default)]
struct Tree {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    writes: Vec<(PathBuf, String)>,
}

impl Tree {
    fn add_dir(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn add_file(&mut self, path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path.to_path_buf(), content.to_string());
    }

    fn clear(&mut self, path: &Path) {
        self.files.retain(|p, _| !p.starts_with(path));
        self.dirs.retain(|d| d == path || !d.starts_with(path));
    }

    fn copy(&mut self, src: &Path, dst: &Path) -> Result<(), io::Error> {
        if !self.dirs.contains(src) {
            return Err(not_found(src));
        }
        let dirs: Vec<PathBuf> = self
            .dirs
            .iter()
            .filter_map(|d| d.strip_prefix(src).ok())
            .map(|rel| dst.join(rel))
            .collect();
        let files: Vec<(PathBuf, String)> = self
            .files
            .iter()
            .filter_map(|(p, c)| p.strip_prefix(src).ok().map(|rel| (dst.join(rel), c.clone())))
            .collect();
        for dir in dirs {
            self.add_dir(&dir);
        }
        self.files.extend(files);
        Ok(())
    }
}

/// In-memory filesystem. Clones share the same tree.
///
/// Mutating calls yield to the scheduler before touching the tree, so
/// unsynchronized callers interleave the way they would on a real disk.
#[derive(Clone, Default)]
pub struct MemFs {
    tree: Arc<Mutex<Tree>>,
}

impl MemFs {
    pub fn insert_file(&self, path: impl AsRef<Path>, content: &str) {
        self.tree.lock().unwrap().add_file(path.as_ref(), content);
    }

    pub fn insert_dir(&self, path: impl AsRef<Path>) {
        self.tree.lock().unwrap().add_dir(path.as_ref());
    }

    pub fn file(&self, path: &Path) -> Option<String> {
        self.tree.lock().unwrap().files.get(path).cloned()
    }

    pub fn has_dir(&self, path: &Path) -> bool {
        self.tree.lock().unwrap().dirs.contains(path)
    }

    /// Every `write_file` call so far, in order.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.tree.lock().unwrap().writes.clone()
    }

    /// Every file below `path`, sorted.
    pub fn files_under(&self, path: &Path) -> Vec<PathBuf> {
        self.tree
            .lock()
            .unwrap()
            .files
            .keys()
            .filter(|p| p.starts_with(path) && p.as_path() != path)
            .cloned()
            .collect()
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
}

impl FileSystem for MemFs {
    fn write_file(
        &self,
        path: &Path,
        content: &str,
    ) -> impl Future<Output = Result<(), io::Error>> + Send {
        let tree = Arc::clone(&self.tree);
        let path = path.to_path_buf();
        let content = content.to_string();
        async move {
            tokio::task::yield_now().await;
            let mut tree = tree.lock().unwrap();
            tree.add_file(&path, &content);
            tree.writes.push((path, content));
            Ok(())
        }
    }

    fn read_file(&self, path: &Path) -> impl Future<Output = Result<String, io::Error>> + Send {
        let result = self.file(path).ok_or_else(|| not_found(path));
        async move { result }
    }

    fn create_dir_all(&self, path: &Path) -> impl Future<Output = Result<(), io::Error>> + Send {
        self.insert_dir(path);
        async { Ok(()) }
    }

    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send {
        let tree = self.tree.lock().unwrap();
        let found = tree.files.contains_key(path) || tree.dirs.contains(path);
        async move { found }
    }

    fn is_dir(&self, path: &Path) -> impl Future<Output = bool> + Send {
        let found = self.has_dir(path);
        async move { found }
    }

    fn list_dirs(&self, path: &Path) -> impl Future<Output = Result<Vec<String>, io::Error>> + Send {
        let tree = self.tree.lock().unwrap();
        let result = if tree.dirs.contains(path) {
            Ok(tree
                .dirs
                .iter()
                .filter(|d| d.parent() == Some(path))
                .filter_map(|d| d.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect())
        } else {
            Err(not_found(path))
        };
        async move { result }
    }

    fn clear_dir(&self, path: &Path) -> impl Future<Output = Result<(), io::Error>> + Send {
        let tree = Arc::clone(&self.tree);
        let path = path.to_path_buf();
        async move {
            tokio::task::yield_now().await;
            tree.lock().unwrap().clear(&path);
            Ok(())
        }
    }

    fn copy_dir_contents(
        &self,
        src: &Path,
        dst: &Path,
    ) -> impl Future<Output = Result<(), io::Error>> + Send {
        let tree = Arc::clone(&self.tree);
        let (src, dst) = (src.to_path_buf(), dst.to_path_buf());
        async move {
            tokio::task::yield_now().await;
            tree.lock().unwrap().copy(&src, &dst)
        }
    }
}
