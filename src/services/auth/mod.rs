pub mod access_jwt;
pub mod factory;
pub mod gate;
pub mod principal;
pub mod verifier;

pub use access_jwt::JwtTokenVerifier;
pub use factory::build_auth_gate;
pub use gate::{AuthGate, GateOutcome, GateRequest, PassReason, Rejection};
pub use principal::{PgPrincipalLoader, PrincipalLoader};
pub use verifier::TokenVerifier;
