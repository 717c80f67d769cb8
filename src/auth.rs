//! Auth domain: challenge wire types, token material, the compute-once cache, and the
//! pluggable challenge signer.

pub mod cache;
pub mod challenge;
pub mod signer;
pub mod token;

pub use cache::*;
pub use challenge::*;
pub use signer::*;
pub use token::*;
