//! Client library for the Warden local-host control daemon.
//!
//! Warden manages long-lived child artifacts — user processes, reverse
//! proxies with in-browser instrumentation, TCP tunnels, and named sessions
//! — on behalf of short-lived CLI clients, speaking a framed request/response
//! protocol over a filesystem-bound Unix socket. This crate is the client
//! side: the frame codec, the response parser, the single-connection
//! transport, and a typed façade over every verb family the daemon exposes.
//!
//! ```no_run
//! use warden_client::{CallOptions, Client};
//!
//! let client = Client::connect("/tmp/warden.sock")?;
//! let ok = client.ping(&CallOptions::default())?;
//! assert!(ok);
//! # Ok::<(), warden_client::ClientError>(())
//! ```

mod error;
mod filters;
mod protocol;
mod transport;
mod url_extractor;
mod verbs;
pub mod version;

pub use error::{ClientError, FrameError};
pub use filters::{DirectoryFilter, OutputFilter};
pub use protocol::{
    decode_request, encode_request, encode_response, RequestFrame, ResponseFrame, ResponseType,
};
pub use transport::{CallOptions, CancelToken, Client, ClientBuilder, CommandReply, Expect};
pub use url_extractor::{
    spawn_tick_loop, ProcessId, ProcessSupervisor, UrlExtractor, DEFAULT_TICK, MAX_SCAN_BYTES,
    MAX_URLS_PER_PROCESS,
};
pub use verbs::{
    generate_code, ChaosRule, ChaosStatus, CurrentPage, DaemonInfo, OverlayState,
    ProcessDescriptor, ProxyConfig, ProxyLogStats, ProxyStatus, SessionInfo, TaskInfo,
    TunnelConfig, TunnelStatus,
};
pub use version::{
    compare_version_strings, compare_versions, format_version, parse_version, versions_match,
    Version,
};
