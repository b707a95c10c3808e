// Property domain module
// Contains the property aggregate root and its value objects

#![allow(clippy::module_inception)]

pub mod property;
pub mod value_objects;

// Re-export main types for convenience
pub use property::Property;
pub use value_objects::{Coordinates, PhoneNumber, PropertyKind, Purpose, TransactionStatus};
