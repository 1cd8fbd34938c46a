//! Domain types for the authorization pipeline.

mod identity;
mod membership;
mod tenant;

pub use identity::{CallerIdentity, CredentialKind, BILLING_ADMINS_GROUP, PLATFORM_ADMIN_GROUPS};
pub use membership::{Membership, ADMIN_ROLE};
pub use tenant::{is_canonical_tenant_id, TenantRef, PLATFORM_TENANT, WWW_ALIAS};
