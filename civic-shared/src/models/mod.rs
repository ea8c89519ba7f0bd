//! Request and response bodies of the platform API.

pub mod auth;
pub mod errors;
pub mod system;
pub mod user;

pub use auth::{
    LoginRequest, LoginResponse, MeResponse, RegisterRequest, VerifyEmailRequest,
};
pub use errors::ErrorResponse;
pub use system::{SystemStatus, SystemStatusResponse};
pub use user::{AccountKind, Role, User, UserId, UserPayload, VolunteerStatus};
