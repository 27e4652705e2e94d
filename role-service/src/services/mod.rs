pub mod authorizer;
pub mod memory;
pub mod metrics;
pub mod use_cases;

pub use authorizer::{Authorizer, JwtAuthorizer, PermissionClaims, Principal};
pub use memory::InMemoryRoleStore;
pub use self::metrics::{get_metrics, init_metrics};
pub use use_cases::{RoleUseCases, UseCase};
