//! Wire types exchanged with the invoking edge gateway.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Request descriptor the gateway posts once per inbound API call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    /// Raw `Authorization` header value, scheme marker included.
    #[serde(default)]
    pub authorization_token: String,
    /// Method-level resource identifier, e.g.
    /// `arn:aws:execute-api:eu-central-1:111111111111:abc123/production/GET/tenants/t1`.
    pub method_arn: String,
    /// Request path as the gateway saw it, when it forwards one.
    #[serde(default)]
    pub path: Option<String>,
    /// Request headers; the tenant-override and host headers matter here.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl AuthorizeRequest {
    /// Case-insensitive header lookup; gateways do not normalize casing.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Gateway-native policy emitted back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    /// String-only context attributes; omitted entirely on Deny so the
    /// boundary leaks nothing about why access was refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resource: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let request: AuthorizeRequest = serde_json::from_value(serde_json::json!({
            "authorizationToken": "Bearer abc",
            "methodArn": "arn:aws:execute-api:eu-central-1:1:api/prod/GET/x",
            "headers": { "X-TENANT-ID": "creatora", "Host": "a.example.com" }
        }))
        .unwrap();

        assert_eq!(request.header("x-tenant-id"), Some("creatora"));
        assert_eq!(request.header("host"), Some("a.example.com"));
        assert_eq!(request.header("x-missing"), None);
    }

    #[test]
    fn deny_response_serializes_without_context_key() {
        let response = AuthorizerResponse {
            principal_id: "user".to_string(),
            policy_document: PolicyDocument {
                version: "2012-10-17".to_string(),
                statement: vec![PolicyStatement {
                    action: "execute-api:Invoke".to_string(),
                    effect: Effect::Deny,
                    resource: "arn:resource".to_string(),
                }],
            },
            context: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("context").is_none());
        assert_eq!(json["policyDocument"]["Statement"][0]["Effect"], "Deny");
    }
}
