//! Value Object Module

pub mod email;
pub mod person_name;
pub mod user_name;
pub mod user_password;

pub use email::{Email, EmailError};
pub use person_name::{PersonName, PersonNameError};
pub use user_name::{UserName, UserNameError};
pub use user_password::{RawPassword, UserPassword};
