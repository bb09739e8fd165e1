//! Tool adapters and registry.
//!
//! Adapters translate typed tool calls into MCP invocations; the registry
//! collects them into the ordered sequence the agent runtime consumes.

use std::future::Future;
use std::sync::OnceLock;

pub mod github;
pub mod registry;
pub mod types;

pub use github::GitHubIssuesAdapter;
pub use registry::{RegistryError, ToolRegistry};
pub use types::{FailurePolicy, ParamType, ToolAdapter, ToolDescriptor, ToolError, ToolParam};

/// Block the current thread on an async call.
///
/// Adapters are invoked synchronously but the protocol client is async; this
/// is the single bridging point. On a multi-thread runtime the worker thread
/// is marked blocking first. On a current-thread runtime `block_in_place`
/// would panic, and the host thread is the only one driving that runtime, so
/// the future runs on the fallback runtime from a scoped thread instead.
/// Outside any runtime the fallback runtime drives the future directly.
pub(crate) fn block_on<F>(future: F) -> F::Output
where
    F: Future + Send,
    F::Output: Send,
{
    use tokio::runtime::{Handle, RuntimeFlavor};

    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| handle.block_on(future))
        }
        Ok(_) => std::thread::scope(|scope| {
            scope
                .spawn(|| fallback_runtime().block_on(future))
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
        }),
        Err(_) => fallback_runtime().block_on(future),
    }
}

fn fallback_runtime() -> &'static tokio::runtime::Runtime {
    static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("failed to build bridge runtime")
    })
}
