mod error;
mod resolver;

pub use error::ResolveError;
pub use resolver::{PHONE_PATTERN, Resolver, StandardResolver};
