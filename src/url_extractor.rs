//! URL extractor (component F, §4.6): a background scanner that pulls
//! dev-server URLs out of managed-process output with strict per-process
//! bounds. Grounded on the worker pack's tick-driven housekeeping loops
//! (e.g. the logger worker's rotation timer) and on `continuum-core`'s use
//! of a readers-writer lock for state shared between a scan task and
//! synchronous callers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use tracing::{trace, warn};

/// Per-process cap on tracked URLs (§3 "URL-tracker state").
pub const MAX_URLS_PER_PROCESS: usize = 5;

/// Per-process cap on scanned output bytes (§3, §4.6 step 1/3).
pub const MAX_SCAN_BYTES: usize = 8 * 1024;

/// Default tick interval for the background scan loop (§4.6).
pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"https?://(?:localhost|127\.0\.0\.1|0\.0\.0\.0|\[::1\]|192\.168\.\d+\.\d+|10\.\d+\.\d+\.\d+):\d+[^\s\)\]\}'"<>]*"#,
    )
    .expect("static regex is valid")
});

const TRIM_CHARS: &[char] = &['.', ',', ';', ':', ')'];

const IGNORED_SUBSTRINGS: &[&str] = &[
    "/api/",
    "/error",
    "/debug",
    "/.well-known/",
    "/favicon",
    "/static/",
    "/assets/",
    "/node_modules/",
];

/// True if `url` should be excluded from tracking (§4.6 "ignored").
fn is_ignored(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.contains('?') || IGNORED_SUBSTRINGS.iter().any(|needle| lower.contains(needle))
}

/// Identifies a managed process to the extractor. Opaque to this module;
/// the process supervisor is out of scope (§1 Non-goals/out-of-scope list).
pub type ProcessId = String;

/// What the extractor needs from the (external, out-of-scope) process
/// supervisor: the set of currently running process ids, and each one's
/// combined output so far. Kept as a trait so tests can supply a fake
/// supervisor without a real one existing in this crate.
pub trait ProcessSupervisor: Send + Sync {
    /// Ids of processes currently in the `Running` state.
    fn running_process_ids(&self) -> Vec<ProcessId>;

    /// The process's combined stdout+stderr captured so far. `None` if the
    /// process is unknown to the supervisor.
    fn combined_output(&self, id: &ProcessId) -> Option<Vec<u8>>;
}

#[derive(Debug, Clone, Default)]
struct TrackedProcess {
    urls: Vec<String>,
    seen: HashSet<String>,
    scanned: usize,
}

/// Background URL scanner. Holds its three per-process maps behind one
/// readers-writer lock per §5: `get_urls` takes a shared lock, everything
/// else takes an exclusive lock.
pub struct UrlExtractor {
    state: RwLock<HashMap<ProcessId, TrackedProcess>>,
}

impl UrlExtractor {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HashMap::new()),
        }
    }

    /// Defensive copy of the tracked URLs for `id`, or an empty vec if the
    /// id isn't tracked (§4.6 `GetURLs`).
    pub fn get_urls(&self, id: &str) -> Vec<String> {
        let state = self.state.read();
        state
            .get(id)
            .map(|p| p.urls.clone())
            .unwrap_or_default()
    }

    /// Remove all state for `id` in one critical section (§4.6 `ClearProcess`).
    pub fn clear_process(&self, id: &str) {
        let mut state = self.state.write();
        state.remove(id);
    }

    /// Run one scan pass over the processes the supervisor currently
    /// reports as running. This is the body of the background tick; it is
    /// exposed directly (rather than only via a spawned loop) so tests can
    /// drive individual ticks deterministically.
    pub fn tick(&self, supervisor: &dyn ProcessSupervisor) {
        let running = supervisor.running_process_ids();
        let running_set: HashSet<&str> = running.iter().map(String::as_str).collect();

        for id in &running {
            self.scan_one(id, supervisor);
        }

        // Drop any tracked id the supervisor no longer reports, in one
        // critical section per id (§4.6 "after each full pass").
        let mut state = self.state.write();
        state.retain(|id, _| running_set.contains(id.as_str()));
    }

    fn scan_one(&self, id: &ProcessId, supervisor: &dyn ProcessSupervisor) {
        // Step 1: skip if already at either cap. Read-only check first so
        // concurrent GetURLs callers aren't blocked by processes that have
        // nothing left to do.
        {
            let state = self.state.read();
            if let Some(tracked) = state.get(id) {
                if tracked.scanned >= MAX_SCAN_BYTES || tracked.urls.len() >= MAX_URLS_PER_PROCESS {
                    return;
                }
            }
        }

        // Step 2: read output outside the lock (§5 "Output reads from the
        // supervisor happen outside the lock").
        let Some(output) = supervisor.combined_output(id) else {
            return;
        };
        if output.is_empty() {
            return;
        }

        let mut state = self.state.write();
        let tracked = state.entry(id.clone()).or_default();

        // Re-check caps now that we hold the exclusive lock; another pass
        // may have filled them while we were reading output.
        if tracked.scanned >= MAX_SCAN_BYTES || tracked.urls.len() >= MAX_URLS_PER_PROCESS {
            return;
        }

        // Step 3: window bounds.
        let start = tracked.scanned;
        let end = output.len().min(MAX_SCAN_BYTES);
        if start >= end {
            return;
        }

        // Step 4.
        tracked.scanned = end;

        // Step 5: scan the window for candidates. The window may split a
        // UTF-8 codepoint; lossily decode since URLs are ASCII and any
        // corruption only affects bytes outside the matched URL.
        let window = String::from_utf8_lossy(&output[start..end]);
        for m in URL_REGEX.find_iter(&window) {
            let trimmed = m.as_str().trim_end_matches(TRIM_CHARS);
            if trimmed.is_empty() || tracked.seen.contains(trimmed) {
                continue;
            }
            if is_ignored(trimmed) {
                trace!(url = trimmed, process = %id, "ignoring filtered url");
                continue;
            }
            tracked.seen.insert(trimmed.to_string());
            tracked.urls.push(trimmed.to_string());
            if tracked.urls.len() >= MAX_URLS_PER_PROCESS {
                break;
            }
        }
    }
}

impl Default for UrlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the extractor's background tick loop on its own OS thread, ticking
/// every `interval` until `supervisor`/`extractor` are dropped and the
/// channel-free loop panics on a poisoned lock (propagated, not hidden).
/// Returns a handle whose `JoinHandle` the caller can use to await shutdown
/// by dropping the `Arc`s and joining.
pub fn spawn_tick_loop(
    extractor: Arc<UrlExtractor>,
    supervisor: Arc<dyn ProcessSupervisor>,
    interval: Duration,
    stop: Arc<std::sync::atomic::AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while !stop.load(std::sync::atomic::Ordering::Relaxed) {
            extractor.tick(supervisor.as_ref());
            std::thread::sleep(interval);
        }
        warn!("url extractor tick loop stopped");
    })
}
