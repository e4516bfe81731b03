pub mod projection;
pub mod router;

pub use projection::*;
pub use router::*;
