//! Order-taking cart.
//!
//! Pure, session-local state: no IO, no storage. The API layer owns one cart
//! per signed-in principal.

pub mod cart;

pub use cart::{Cart, CartLine, CartState};
