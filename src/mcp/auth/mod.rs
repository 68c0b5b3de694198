//! Authentication strategies for SSH connections.
//!
//! Log fetches authenticate with the public-key identity named in the
//! credential document ([`KeyAuth`]). Strategies implement [`AuthStrategy`] so
//! the session client does not depend on how the identity is presented.

mod key;
mod traits;

pub use key::KeyAuth;
pub use traits::AuthStrategy;
