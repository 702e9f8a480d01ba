use crate::config::AuthConfigLite;
use crate::error::ChatError;
use async_trait::async_trait;

/// 身份解析：bearer 令牌换取用户ID / Identity resolution: bearer token to user id
#[async_trait]
pub trait AuthService: Send + Sync {
    /// 返回 None 表示令牌无效或缺失 / None means the token is invalid or absent
    async fn resolve(&self, token: &str) -> Result<Option<String>, ChatError>;
}

/// 开发模式鉴权：识别 "user-<id>" 形式的令牌
/// Dev-mode auth: recognizes tokens of the form "user-<id>"
pub struct DevAuthService;

#[async_trait]
impl AuthService for DevAuthService {
    async fn resolve(&self, token: &str) -> Result<Option<String>, ChatError> {
        Ok(token.strip_prefix("user-").and_then(|id| {
            if id.is_empty() {
                None
            } else {
                Some(id.to_string())
            }
        }))
    }
}

/// 鉴权中心远端实现 / Remote implementation against the auth center
pub struct RemoteAuthService {
    config: AuthConfigLite,
    client: reqwest::Client,
}

impl RemoteAuthService {
    pub fn new(config: AuthConfigLite) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl AuthService for RemoteAuthService {
    async fn resolve(&self, token: &str) -> Result<Option<String>, ChatError> {
        if token.is_empty() {
            return Ok(None);
        }
        let resp = self
            .client
            .get(format!("{}/v1/sso/auth", self.config.center_url))
            .query(&[("token", token)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let body: serde_json::Value = resp.json().await?;
        Ok(body
            .get("user_id")
            .and_then(|v| {
                v.as_str()
                    .map(|s| s.to_string())
                    .or_else(|| v.as_i64().map(|n| n.to_string()))
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dev_auth_parses_user_tokens() {
        let auth = DevAuthService;
        assert_eq!(auth.resolve("user-7").await.unwrap(), Some("7".to_string()));
        assert_eq!(auth.resolve("user-").await.unwrap(), None);
        assert_eq!(auth.resolve("garbage").await.unwrap(), None);
        assert_eq!(auth.resolve("").await.unwrap(), None);
    }
}
