//! Policy synthesis: turning a decision into the gateway's
//! effect/resource/context shape.

use std::collections::BTreeMap;

use crate::dtos::{AuthorizerResponse, Effect, PolicyDocument, PolicyStatement};
use crate::models::CallerIdentity;
use crate::services::routes::ARN_PREFIX_FIELDS;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Principal used on Deny, where no verified identity may be echoed back.
const DENY_PRINCIPAL: &str = "user";

/// Allow policy with a wildcarded resource, so the gateway may cache one
/// decision across every method and path under the same deployment stage.
pub fn allow(
    principal: &str,
    resource: &str,
    context: BTreeMap<String, String>,
) -> AuthorizerResponse {
    AuthorizerResponse {
        principal_id: principal.to_string(),
        policy_document: document(Effect::Allow, &wildcard_resource(resource)),
        context: Some(context),
    }
}

/// Deny policy: minimal principal, the exact originally-requested resource
/// (never wildcarded, so a later Allow for a sibling path is not shadowed
/// by a cached Deny), and no context.
pub fn deny(resource: &str) -> AuthorizerResponse {
    AuthorizerResponse {
        principal_id: DENY_PRINCIPAL.to_string(),
        policy_document: document(Effect::Deny, resource),
        context: None,
    }
}

fn document(effect: Effect, resource: &str) -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![PolicyStatement {
            action: INVOKE_ACTION.to_string(),
            effect,
            resource: resource.to_string(),
        }],
    }
}

/// Rewrite a method ARN's final field from `{apiId}/{stage}/{method}/{path...}`
/// to `{apiId}/{stage}/*`, preserving the colon-delimited prefix verbatim.
/// Idempotent; returns the input unchanged when it does not carry the
/// expected shape.
pub fn wildcard_resource(resource: &str) -> String {
    let fields: Vec<&str> = resource.splitn(ARN_PREFIX_FIELDS + 1, ':').collect();
    if fields.len() != ARN_PREFIX_FIELDS + 1 {
        return resource.to_string();
    }

    let path_fields: Vec<&str> = fields[ARN_PREFIX_FIELDS].split('/').collect();
    if path_fields.len() < 2 {
        return resource.to_string();
    }

    format!(
        "{}:{}/{}/*",
        fields[..ARN_PREFIX_FIELDS].join(":"),
        path_fields[0],
        path_fields[1]
    )
}

/// Build the Allow context. Every value is a string because the consuming
/// gateway does not support mixed-typed context.
pub fn build_context(identity: &CallerIdentity, tenant_id: &str) -> BTreeMap<String, String> {
    let mut context = BTreeMap::new();
    context.insert("userId".to_string(), identity.subject.clone());
    context.insert("tenantId".to_string(), tenant_id.to_string());
    context.insert(
        "email".to_string(),
        identity.email.clone().unwrap_or_else(|| "unknown".to_string()),
    );
    context.insert(
        "groups".to_string(),
        if identity.groups.is_empty() {
            "none".to_string()
        } else {
            identity.groups.join(",")
        },
    );
    context.insert(
        "isBillingAdmin".to_string(),
        bool_value(identity.is_billing_admin()),
    );
    context.insert(
        "isPlatformAdmin".to_string(),
        bool_value(identity.is_platform_admin()),
    );
    context
}

fn bool_value(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CredentialKind;

    const RESOURCE: &str =
        "arn:aws:execute-api:eu-central-1:111111111111:abc123/production/GET/tenants/t1/admins";
    const WILDCARDED: &str =
        "arn:aws:execute-api:eu-central-1:111111111111:abc123/production/*";

    #[test]
    fn wildcard_keeps_prefix_and_stage() {
        assert_eq!(wildcard_resource(RESOURCE), WILDCARDED);
    }

    #[test]
    fn wildcard_is_idempotent() {
        assert_eq!(wildcard_resource(WILDCARDED), WILDCARDED);
        assert_eq!(
            wildcard_resource(&wildcard_resource(RESOURCE)),
            WILDCARDED
        );
    }

    #[test]
    fn malformed_resources_pass_through_unchanged() {
        assert_eq!(wildcard_resource("not-an-arn"), "not-an-arn");
        assert_eq!(
            wildcard_resource("arn:aws:execute-api:r:a:single-field"),
            "arn:aws:execute-api:r:a:single-field"
        );
    }

    #[test]
    fn allow_wildcards_and_carries_context() {
        let identity = CallerIdentity {
            subject: "user-1".to_string(),
            kind: CredentialKind::Identity,
            email: None,
            groups: vec!["billing-admins".to_string()],
        };
        let response = allow("user-1", RESOURCE, build_context(&identity, "platform"));

        assert_eq!(response.policy_document.statement[0].resource, WILDCARDED);
        let context = response.context.unwrap();
        assert_eq!(context["userId"], "user-1");
        assert_eq!(context["tenantId"], "platform");
        assert_eq!(context["email"], "unknown");
        assert_eq!(context["groups"], "billing-admins");
        assert_eq!(context["isBillingAdmin"], "true");
        assert_eq!(context["isPlatformAdmin"], "false");
    }

    #[test]
    fn deny_keeps_exact_resource_and_drops_context() {
        let response = deny(RESOURCE);
        assert_eq!(response.principal_id, "user");
        assert_eq!(response.policy_document.statement[0].effect, Effect::Deny);
        assert_eq!(response.policy_document.statement[0].resource, RESOURCE);
        assert!(response.context.is_none());
    }
}
