//! Authentication and authorization: JWT issue/verify, password
//! hashing, the role capability table and the request guards.

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_staff};
pub use password::{hash_password, verify_password};
pub use permissions::{Capability, capabilities};
