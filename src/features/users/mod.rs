//! Admin user management: the admin service client, its record types and the
//! local list filter. Role checks elsewhere in the crate only hide screens; the
//! admin service rejects unauthorized calls on its own.

pub mod client;
pub mod filter;
pub mod types;

pub use client::AdminClient;
pub use filter::filter_users;
pub use types::{AdminUserRecord, UserChanges, UserUpdate};
