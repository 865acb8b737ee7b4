// 通用的数据结构定义

use serde::{Deserialize, Serialize};

/// 通用的API响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 错误码，0表示成功
    pub code: i32,
    /// 错误消息，成功时为"success"
    pub msg: String,
    /// 响应数据，无数据时省略
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_serializes_payload() {
        let response = ApiResponse {
            code: 0,
            msg: "success".to_string(),
            resp_data: Some(json!({"token": "abc"})),
        };
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["code"], 0);
        assert_eq!(value["msg"], "success");
        assert_eq!(value["resp_data"]["token"], "abc");
    }

    #[test]
    fn empty_payload_is_omitted() {
        let response: ApiResponse<()> = ApiResponse {
            code: 0,
            msg: "success".to_string(),
            resp_data: None,
        };
        let value = serde_json::to_value(&response).unwrap();

        assert!(value.get("resp_data").is_none());
    }
}
