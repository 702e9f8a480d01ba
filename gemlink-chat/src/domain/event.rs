use serde::{Deserialize, Serialize};

/// 实时帧结构（双向共用）/ Realtime frame structure, shared both directions
#[derive(Serialize, Deserialize, Debug)]
pub struct ChatFrame {
    #[serde(rename = "type")]
    pub frame_type: String,
    pub data: serde_json::Value,
}

impl ChatFrame {
    pub fn new(frame_type: &str, data: serde_json::Value) -> Self {
        Self {
            frame_type: frame_type.to_string(),
            data,
        }
    }

    /// 同连接上回发的错误事件，不断开连接
    /// Error event echoed on the same connection, connection kept
    pub fn error(message: &str) -> Self {
        Self::new("error", serde_json::json!({ "message": message }))
    }

    pub fn to_text(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
