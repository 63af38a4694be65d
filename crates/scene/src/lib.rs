pub mod change;
pub mod descriptors;
pub mod model;

pub use change::*;
pub use descriptors::*;
pub use model::*;
