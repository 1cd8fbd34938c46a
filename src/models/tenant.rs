use uuid::Uuid;

/// Sentinel identifier for the platform-operator tenant.
pub const PLATFORM_TENANT: &str = "platform";

/// Reserved alias that also denotes the platform tenant.
pub const WWW_ALIAS: &str = "www";

/// A raw tenant identifier classified by shape.
///
/// Canonical identifiers and the platform sentinel are used verbatim; only
/// aliases ever reach the tenant directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantRef {
    Platform,
    Canonical(String),
    Alias(String),
}

impl TenantRef {
    pub fn classify(raw: &str) -> TenantRef {
        if raw == PLATFORM_TENANT || raw == WWW_ALIAS {
            TenantRef::Platform
        } else if is_canonical_tenant_id(raw) {
            TenantRef::Canonical(raw.to_string())
        } else {
            TenantRef::Alias(raw.to_string())
        }
    }
}

/// Whether a value has the canonical tenant-id shape: a 36-character
/// hyphenated UUID, case-insensitive. Braced, URN, and compact UUID forms
/// are not canonical here.
pub fn is_canonical_tenant_id(value: &str) -> bool {
    value.len() == 36 && Uuid::try_parse(value).is_ok()
}
