use std::io;
use std::path::Path;

/// Reads and writes whole document contents.
#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
	async fn read(&self, path: &Path) -> io::Result<String>;
	async fn write(&self, path: &Path, text: &str) -> io::Result<()>;
}

/// [`FileStore`] backed by the local filesystem.
///
/// Writes create missing parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

#[async_trait::async_trait]
impl FileStore for FsStore {
	async fn read(&self, path: &Path) -> io::Result<String> {
		let text = tokio::fs::read_to_string(path).await?;
		tracing::trace!(path = %path.display(), len = text.len(), "store.read");
		Ok(text)
	}

	async fn write(&self, path: &Path, text: &str) -> io::Result<()> {
		if let Some(parent) = path.parent()
			&& !parent.as_os_str().is_empty()
		{
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(path, text).await?;
		tracing::trace!(path = %path.display(), len = text.len(), "store.write");
		Ok(())
	}
}
