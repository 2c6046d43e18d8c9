use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

/// Runtime of the caller, or a lazily built two-thread one for callers that
/// are not inside any runtime.
fn runtime_handle() -> tokio::runtime::Handle {
	static DETACHED: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

	tokio::runtime::Handle::try_current().unwrap_or_else(|_| {
		DETACHED
			.get_or_init(|| {
				tokio::runtime::Builder::new_multi_thread()
					.enable_all()
					.worker_threads(2)
					.thread_name("inkpad-detached")
					.build()
					.expect("inkpad: cannot start detached runtime")
			})
			.handle()
			.clone()
	})
}

/// Spawns `fut`, logging the class it runs under.
///
/// Works from plain threads too, such as a frontend's own event loop.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}
