pub mod access;
pub mod layer;

pub use access::AccessValidator;
pub use layer::{ValidateAccess, ValidateAccessLayer, validate};
