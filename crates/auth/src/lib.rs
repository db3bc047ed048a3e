//! `landacq-auth`: client-side session handling and route gating.
//!
//! Everything here works on **unverified** token claims. It decides what the
//! user is shown; it is not a security boundary. The backend independently
//! re-authorizes every request.

pub mod claims;
pub mod decode;
pub mod guard;
pub mod profile;
pub mod roles;
pub mod session;

pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use decode::{DecodeError, decode_claims, peek_claims};
pub use guard::{
    DenialKind, DenialReason, GuardDecision, GuardExplanation, LOGIN_PATH, RouteGuard,
    UNAUTHORIZED_PATH,
};
pub use profile::{UserProfile, display_name};
pub use roles::Role;
pub use session::{
    FileStore, InMemoryStore, KeyValueStore, LoginGrant, Session, SessionStore, StoreError,
};
