pub mod app;
pub mod attach;
pub mod background;
pub mod connector;
pub mod constants;
pub mod drag;
pub mod element;
pub mod fall;
pub mod geometry;
pub mod layout;
pub mod scene;
pub mod sling;

pub use app::*;
pub use attach::*;
pub use background::*;
pub use connector::*;
pub use drag::*;
pub use element::*;
pub use fall::*;
pub use geometry::*;
pub use layout::*;
pub use scene::*;
pub use sling::*;
