use crate::error::ChatError;
use async_trait::async_trait;
use std::path::PathBuf;

/// 附件字节存储：字节 + 路径提示 -> 可访问URL
/// Attachment byte storage: bytes + path hint -> resolvable URL
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, bytes: &[u8], path_hint: &str) -> Result<String, ChatError>;
}

/// 本地文件系统实现，写入 uploads 根目录下
/// Local filesystem implementation rooted at the uploads directory
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, bytes: &[u8], path_hint: &str) -> Result<String, ChatError> {
        // 路径提示不允许逃出根目录 / The hint must not escape the root
        if path_hint.contains("..") || path_hint.starts_with('/') {
            return Err(ChatError::InvalidArgument(format!(
                "invalid upload path: {}",
                path_hint
            )));
        }
        let target = self.root.join(path_hint);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        Ok(format!("/uploads/{}", path_hint))
    }
}
