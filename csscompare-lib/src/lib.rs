pub mod error;
pub mod paths;
pub mod release;
pub mod style;

pub use error::CompareError;
pub use style::normalize::normalize;
