//! Authentication and authorization
//!
//! - [`jwt`] - token service and the [`CurrentUser`] request context
//! - [`password`] - argon2 hashing
//! - [`middleware`] - `require_auth` / `require_admin` layers
//! - [`roles`] - the identity & role resolver (sole reader of `user_roles`)

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod roles;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use roles::{ROLE_ADMIN, ROLE_USER, RoleResolver};
