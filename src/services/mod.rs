//! Services layer: the authorization pipeline's components and their
//! collaborators.

mod database;
pub mod directory;
mod engine;
mod jwks;
pub mod policy;
mod resolver;
pub mod routes;
mod token;

pub use database::Database;
pub use directory::{MembershipStore, MockDirectory, MockMemberships, TenantDirectory};
pub use engine::{AccessDecisionEngine, Decision};
pub use jwks::{JwksClient, KeyResolver};
pub use resolver::TenantResolver;
pub use routes::RouteClass;
pub use token::TokenVerifier;
