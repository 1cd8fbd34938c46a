/// Group granting billing administration rights.
pub const BILLING_ADMINS_GROUP: &str = "billing-admins";

/// Groups granting platform-wide administration rights.
pub const PLATFORM_ADMIN_GROUPS: [&str; 2] = ["admins", "platform-admins"];

/// How the bearer credential was classified.
///
/// Access credentials carry a `client_id` claim and no group claims;
/// identity credentials carry an `aud` claim and, where the caller belongs
/// to any groups, a group-membership claim. A credential satisfying neither
/// shape is rejected during verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Access,
    Identity,
}

/// Verified caller identity, derived per invocation and never persisted.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    /// Stable per-user subject identifier.
    pub subject: String,
    pub kind: CredentialKind,
    pub email: Option<String>,
    /// Group memberships; empty for access credentials, which do not carry
    /// group claims.
    pub groups: Vec<String>,
}

impl CallerIdentity {
    pub fn is_billing_admin(&self) -> bool {
        self.groups.iter().any(|g| g == BILLING_ADMINS_GROUP)
    }

    pub fn is_platform_admin(&self) -> bool {
        self.groups
            .iter()
            .any(|g| PLATFORM_ADMIN_GROUPS.contains(&g.as_str()))
    }
}
