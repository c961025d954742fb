pub mod axis;
pub mod payload;
pub mod record;
pub mod sheet;

pub use axis::*;
pub use payload::*;
pub use record::*;
pub use sheet::*;
