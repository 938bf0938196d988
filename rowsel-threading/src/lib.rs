//! Process-wide rayon thread pool shared by the parallel rowsel operations.
//!
//! Parallel work in this workspace always runs inside [`with_thread_pool`] so
//! that nested operations reuse one pool instead of oversubscribing the
//! machine. The pool size can be pinned with the `ROWSEL_MAX_THREADS`
//! environment variable; otherwise it follows the available parallelism.

#![forbid(unsafe_code)]

use std::sync::OnceLock;

use rayon::{ThreadPool, ThreadPoolBuilder};

static POOL: OnceLock<ThreadPool> = OnceLock::new();

fn pool() -> &'static ThreadPool {
    POOL.get_or_init(|| {
        let threads = std::env::var("ROWSEL_MAX_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            });
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("rowsel-worker-{i}"))
            .build()
            .expect("failed to build rowsel thread pool")
    })
}

/// Run `f` inside the shared pool. Rayon parallel iterators invoked within
/// `f` are scheduled on that pool.
pub fn with_thread_pool<R, F>(f: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    pool().install(f)
}

/// Number of worker threads in the shared pool.
pub fn current_thread_count() -> usize {
    pool().current_num_threads()
}
