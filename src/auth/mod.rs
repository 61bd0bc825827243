//! Authentication subsystem: password hashing, bearer-token issuance and
//! validation, the email-verification token lifecycle, and the service that
//! orchestrates them.

pub mod handlers;
mod password;
mod service;
mod token;
mod verification;

pub use password::PasswordHasher;
pub use service::{AuthService, Login, Registration, TOKEN_TYPE};
pub use token::{Claims, TokenSigner};
pub use verification::{LoggingDelivery, VerificationDelivery, VerificationTokens};
