//! Endpoint classification and tenant path extraction.
//!
//! Both operate on the gateway's method-level resource identifier: a
//! colon-delimited ARN whose final field is `{apiId}/{stage}/{method}/{path...}`.

use crate::models::is_canonical_tenant_id;

/// Colon-separated fields before the api path portion of a method ARN
/// (`arn:aws:execute-api:{region}:{account}`).
pub const ARN_PREFIX_FIELDS: usize = 5;

const PLATFORM_ADMIN_MARKERS: [&str; 2] = ["/billing/admin/", "/billing/generate-invoices"];

/// Membership-lifecycle actions reachable by any authenticated caller; their
/// whole purpose is to create or inspect the membership a tenant-scoped
/// check would otherwise require.
const PUBLIC_TENANT_MARKERS: [&str; 4] = [
    "/membership/my-status",
    "/membership/subscribe",
    "/membership/cancel",
    "/join",
];

/// Routes that list the caller's own tenants and are inherently
/// cross-tenant.
const CROSS_TENANT_MARKERS: [&str; 1] = ["/user/tenants"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Billing-administration or invoice-generation routes; tenant context
    /// is meaningless for these.
    PlatformAdmin,
    /// Reachable regardless of existing tenant membership.
    PublicTenant,
    /// Default: requires a membership check against the resolved tenant.
    TenantScoped,
}

pub fn classify(method_arn: &str) -> RouteClass {
    if is_platform_admin_route(method_arn) {
        RouteClass::PlatformAdmin
    } else if is_public_tenant_route(method_arn) {
        RouteClass::PublicTenant
    } else {
        RouteClass::TenantScoped
    }
}

pub fn is_platform_admin_route(method_arn: &str) -> bool {
    PLATFORM_ADMIN_MARKERS.iter().any(|m| method_arn.contains(m))
}

pub fn is_public_tenant_route(method_arn: &str) -> bool {
    PUBLIC_TENANT_MARKERS.iter().any(|m| method_arn.contains(m))
}

pub fn is_cross_tenant_route(path: &str) -> bool {
    CROSS_TENANT_MARKERS.iter().any(|m| path.contains(m))
}

/// The `{apiId}/{stage}/{method}/{path...}` portion of a method ARN, or
/// `None` when the identifier does not carry the expected field count.
pub fn arn_path(method_arn: &str) -> Option<&str> {
    method_arn.splitn(ARN_PREFIX_FIELDS + 1, ':').nth(ARN_PREFIX_FIELDS)
}

/// One named tenant path matcher. Matchers are evaluated in declaration
/// order, first match wins; each is independently testable through
/// [`tenant_from_path`].
pub struct PathMatcher {
    pub name: &'static str,
    matcher: fn(&str) -> Option<String>,
}

/// Ordered tenant extraction patterns over the ARN path portion.
pub const TENANT_PATH_MATCHERS: [PathMatcher; 3] = [
    PathMatcher {
        name: "tenants-segment",
        matcher: match_tenants_segment,
    },
    PathMatcher {
        name: "billing-admin-tenant",
        matcher: match_billing_admin_tenant,
    },
    PathMatcher {
        name: "billing-tenant-uuid",
        matcher: match_billing_tenant_uuid,
    },
];

/// Run the matcher chain over an ARN path portion, returning the winning
/// matcher's name alongside the extracted raw tenant value.
pub fn tenant_from_path(path: &str) -> Option<(&'static str, String)> {
    TENANT_PATH_MATCHERS
        .iter()
        .find_map(|m| (m.matcher)(path).map(|id| (m.name, id)))
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Generic `/tenants/{id}` segment anywhere in the path.
fn match_tenants_segment(path: &str) -> Option<String> {
    let segs = segments(path);
    segs.windows(2)
        .find(|w| w[0] == "tenants" && is_id_segment(w[1]))
        .map(|w| w[1].to_string())
}

/// `/billing/admin/tenants/{36-char-uuid}/...` — a billing admin acting on
/// one specific tenant.
fn match_billing_admin_tenant(path: &str) -> Option<String> {
    let segs = segments(path);
    segs.windows(4)
        .find(|w| {
            w[0] == "billing"
                && w[1] == "admin"
                && w[2] == "tenants"
                && w[3].len() == 36
                && w[3].chars().all(|c| c.is_ascii_hexdigit() || c == '-')
        })
        .map(|w| w[3].to_string())
}

/// `/billing/{uuid}/...` — tenant self-service billing routes. Restricted
/// to the full UUID shape so `/billing/admin/...` never matches here.
fn match_billing_tenant_uuid(path: &str) -> Option<String> {
    let segs = segments(path);
    segs.windows(2)
        .find(|w| w[0] == "billing" && is_canonical_tenant_id(w[1]))
        .map(|w| w[1].to_string())
}

fn is_id_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str =
        "arn:aws:execute-api:eu-central-1:111111111111:abc123/production/GET/tenants/t1/admins";

    #[test]
    fn classifies_platform_admin_routes() {
        assert_eq!(
            classify("arn:aws:execute-api:r:a:api/prod/POST/billing/admin/reports"),
            RouteClass::PlatformAdmin
        );
        assert_eq!(
            classify("arn:aws:execute-api:r:a:api/prod/POST/billing/generate-invoices"),
            RouteClass::PlatformAdmin
        );
    }

    #[test]
    fn classifies_public_tenant_routes() {
        for marker in [
            "/membership/my-status",
            "/membership/subscribe",
            "/membership/cancel",
            "/join",
        ] {
            let arn = format!("arn:aws:execute-api:r:a:api/prod/POST{}", marker);
            assert_eq!(classify(&arn), RouteClass::PublicTenant, "{}", marker);
        }
    }

    #[test]
    fn platform_admin_wins_over_public_tenant() {
        let arn = "arn:aws:execute-api:r:a:api/prod/POST/billing/admin/membership/subscribe";
        assert_eq!(classify(arn), RouteClass::PlatformAdmin);
    }

    #[test]
    fn everything_else_is_tenant_scoped() {
        assert_eq!(classify(ARN), RouteClass::TenantScoped);
    }

    #[test]
    fn arn_path_extracts_final_field() {
        assert_eq!(arn_path(ARN), Some("abc123/production/GET/tenants/t1/admins"));
        assert_eq!(arn_path("not-an-arn"), None);
    }

    #[test]
    fn tenants_segment_matcher_takes_any_id_shape() {
        let (name, id) = tenant_from_path("api/prod/GET/tenants/creatora/videos").unwrap();
        assert_eq!(name, "tenants-segment");
        assert_eq!(id, "creatora");
    }

    #[test]
    fn billing_admin_matcher_requires_full_uuid_length() {
        let path = "api/prod/GET/billing/admin/tenants/0ba14817-0393-4468-a457-363e1c2a7b03/usage";
        // The generic tenants matcher fires first and extracts the same id.
        let (_, id) = tenant_from_path(path).unwrap();
        assert_eq!(id, "0ba14817-0393-4468-a457-363e1c2a7b03");

        assert_eq!(
            match_billing_admin_tenant(path),
            Some("0ba14817-0393-4468-a457-363e1c2a7b03".to_string())
        );
        assert_eq!(match_billing_admin_tenant("api/prod/GET/billing/admin/tenants/short"), None);
    }

    #[test]
    fn billing_uuid_matcher_skips_admin_namespace() {
        let path = "api/prod/GET/billing/0ba14817-0393-4468-a457-363e1c2a7b03/invoices";
        let (name, id) = tenant_from_path(path).unwrap();
        assert_eq!(name, "billing-tenant-uuid");
        assert_eq!(id, "0ba14817-0393-4468-a457-363e1c2a7b03");

        assert_eq!(match_billing_tenant_uuid("api/prod/GET/billing/admin/reports"), None);
    }

    #[test]
    fn no_tenant_in_plain_routes() {
        assert_eq!(tenant_from_path("api/prod/GET/user/tenants"), None);
        assert_eq!(tenant_from_path("api/prod/GET/videos"), None);
    }
}
