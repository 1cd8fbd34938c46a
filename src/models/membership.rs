use sqlx::FromRow;

/// Role that grants elevated (platform-reaching) access.
pub const ADMIN_ROLE: &str = "admin";

/// A caller's membership in one tenant. Existence of the record grants base
/// access to that tenant; the role only drives context flags and the
/// platform-tenant admin scan.
#[derive(Debug, Clone, FromRow)]
pub struct Membership {
    pub user_id: String,
    pub tenant_id: String,
    #[sqlx(rename = "member_role")]
    pub role: String,
}
