//! Claude session discovery for a worktree.
//!
//! Sessions live under `<claude_dir>/projects/<encoded path>/`, where the
//! encoded path is the worktree path with every `/` replaced by `-`. The
//! directory holds one `<uuid>.jsonl` transcript per session and, usually, a
//! `sessions-index.json` with precomputed metadata.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const INDEX_FILE: &str = "sessions-index.json";
const MAX_PROMPT_CHARS: usize = 200;

/// One assistant session recorded for a worktree.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaudeSession {
    pub session_id: String,
    pub first_prompt: String,
    pub summary: String,
    pub message_count: u32,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub git_branch: String,
}

impl ClaudeSession {
    /// Best available one-line description.
    pub fn display_summary(&self) -> &str {
        if !self.summary.is_empty() {
            &self.summary
        } else if !self.first_prompt.is_empty() {
            &self.first_prompt
        } else {
            "(no prompt)"
        }
    }
}

/// Session count plus the description of the most recent session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub count: usize,
    /// Empty when there are no sessions
    pub latest: String,
}

/// Read-only source of assistant sessions, keyed by worktree path.
pub trait SessionSource: Send + Sync {
    /// Sessions for `worktree`, most recently modified first.
    ///
    /// Missing or unreadable data yields an empty list.
    fn sessions(&self, worktree: &Path) -> Vec<ClaudeSession>;

    fn summary(&self, worktree: &Path) -> SessionSummary {
        let sessions = self.sessions(worktree);
        SessionSummary {
            count: sessions.len(),
            latest: sessions
                .first()
                .map(|s| s.display_summary().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Sessions stored by Claude Code on disk.
#[derive(Debug, Clone)]
pub struct ClaudeSessions {
    projects_dir: PathBuf,
}

impl ClaudeSessions {
    pub fn new(claude_dir: &Path) -> Self {
        Self {
            projects_dir: claude_dir.join("projects"),
        }
    }

    pub fn project_dir(&self, worktree: &Path) -> PathBuf {
        self.projects_dir.join(encode_path(worktree))
    }
}

impl SessionSource for ClaudeSessions {
    fn sessions(&self, worktree: &Path) -> Vec<ClaudeSession> {
        let dir = self.project_dir(worktree);
        if !dir.is_dir() {
            return Vec::new();
        }

        let mut sessions = match load_index(&dir.join(INDEX_FILE)) {
            Some(sessions) => sessions,
            None => scan_transcripts(&dir),
        };
        // Newest first; sessions without a timestamp go last
        sessions.sort_by(|a, b| b.modified.cmp(&a.modified));
        sessions
    }
}

/// Encode an absolute path the way Claude Code names project directories.
pub fn encode_path(path: &Path) -> String {
    path.to_string_lossy().replace('/', "-")
}

/// Shape of `sessions-index.json`: the versioned object is tried first.
#[derive(Deserialize)]
#[serde(untagged)]
enum IndexFile {
    Versioned {
        #[allow(dead_code)]
        version: u32,
        entries: Vec<Value>,
    },
    Bare(Vec<Value>),
}

/// One index entry; every field is optional and defaults when missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct IndexEntry {
    session_id: String,
    first_prompt: String,
    summary: Option<String>,
    message_count: i64,
    created: Option<String>,
    modified: Option<String>,
    git_branch: Option<String>,
    is_sidechain: bool,
}

impl IndexEntry {
    fn into_session(self) -> Option<ClaudeSession> {
        // Sidechains are background agents, not user sessions
        if self.session_id.is_empty() || self.message_count <= 0 || self.is_sidechain {
            return None;
        }
        Some(ClaudeSession {
            session_id: self.session_id,
            first_prompt: truncate_prompt(&self.first_prompt),
            summary: self.summary.unwrap_or_default(),
            message_count: u32::try_from(self.message_count).unwrap_or(u32::MAX),
            created: self.created.as_deref().and_then(parse_timestamp),
            modified: self.modified.as_deref().and_then(parse_timestamp),
            git_branch: self.git_branch.unwrap_or_default(),
        })
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Sessions from the index file, or `None` when it is absent or unparsable.
fn load_index(path: &Path) -> Option<Vec<ClaudeSession>> {
    let file = File::open(path).ok()?;
    let index: IndexFile = match serde_json::from_reader(BufReader::new(file)) {
        Ok(index) => index,
        Err(e) => {
            log::debug!("Ignoring unreadable session index {}: {}", path.display(), e);
            return None;
        }
    };
    let entries = match index {
        IndexFile::Versioned { entries, .. } => entries,
        IndexFile::Bare(entries) => entries,
    };

    Some(
        entries
            .into_iter()
            .filter_map(|value| serde_json::from_value::<IndexEntry>(value).ok())
            .filter_map(IndexEntry::into_session)
            .collect(),
    )
}

/// Check if a string looks like a UUID
fn is_uuid(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    s.len() == 36
        && parts.len() == 5
        && parts
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(part, len)| part.len() == len && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Build sessions from the `<uuid>.jsonl` transcripts in `dir`.
fn scan_transcripts(dir: &Path) -> Vec<ClaudeSession> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot read {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "jsonl") {
                return None;
            }
            let session_id = path.file_stem()?.to_str()?;
            if !is_uuid(session_id) {
                return None;
            }
            let session_id = session_id.to_string();

            let transcript = read_transcript(&path)?;
            if transcript.message_count == 0 {
                return None;
            }
            let meta = entry.metadata().ok();
            let modified = meta
                .as_ref()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from);
            let created = meta
                .as_ref()
                .and_then(|m| m.created().ok())
                .map(DateTime::<Utc>::from);

            Some(ClaudeSession {
                session_id,
                summary: String::new(),
                first_prompt: transcript.first_prompt,
                message_count: transcript.message_count,
                created,
                modified,
                git_branch: transcript.git_branch,
            })
        })
        .collect()
}

#[derive(Default)]
struct Transcript {
    message_count: u32,
    first_prompt: String,
    git_branch: String,
}

fn read_transcript(path: &Path) -> Option<Transcript> {
    let file = File::open(path).ok()?;
    let mut transcript = Transcript::default();

    for line in BufReader::new(file).lines().map_while(Result::ok) {
        let value: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => continue,
        };

        let kind = value.get("type").and_then(Value::as_str);
        if !matches!(kind, Some("user" | "assistant")) {
            continue;
        }
        transcript.message_count += 1;

        if transcript.git_branch.is_empty() {
            if let Some(branch) = value.get("gitBranch").and_then(Value::as_str) {
                transcript.git_branch = branch.to_string();
            }
        }
        if kind == Some("user") && transcript.first_prompt.is_empty() {
            if let Some(text) = user_text(&value) {
                transcript.first_prompt = truncate_prompt(&text);
            }
        }
    }

    Some(transcript)
}

/// Text of a user message; `content` is either a string or a block array.
fn user_text(value: &Value) -> Option<String> {
    let content = value.get("message").unwrap_or(value).get("content")?;
    let text = match content {
        Value::String(s) => s.clone(),
        // tool_result blocks carry no prompt text
        Value::Array(blocks) => blocks
            .iter()
            .find(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .and_then(|b| b.get("text"))
            .and_then(Value::as_str)?
            .to_string(),
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn truncate_prompt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MAX_PROMPT_CHARS {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .nth(MAX_PROMPT_CHARS - 3)
        .map_or(text.len(), |(idx, _)| idx);
    format!("{}...", &text[..cut])
}
