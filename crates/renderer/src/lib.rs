pub mod api;
pub mod events;
pub mod headless;
pub mod spec;

pub use api::*;
pub use events::*;
pub use headless::HeadlessRenderer;
pub use spec::*;
