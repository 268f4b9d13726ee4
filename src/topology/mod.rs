pub mod document;
pub mod parameter;
pub mod value;

pub use document::*;
pub use parameter::*;
pub use value::*;
