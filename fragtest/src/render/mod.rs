pub mod buffer;
pub mod coord;
pub mod depth;
pub mod error;
pub mod fragment;
pub mod snapshot;
pub mod state;
pub mod stencil;
pub mod store;

pub use buffer::*;
pub use coord::*;
pub use depth::*;
pub use error::*;
pub use fragment::*;
pub use snapshot::*;
pub use state::*;
pub use stencil::*;
pub use store::*;
