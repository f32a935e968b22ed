//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the auth layer and the stores.

pub mod cve;
pub mod user;

pub use cve::CveService;
pub use user::UserService;
