pub mod constants;
pub mod gesture;
pub mod landmarks;
pub mod machine;
pub mod preload;
pub mod state;
pub mod tips;

pub use gesture::*;
pub use landmarks::*;
pub use machine::*;
pub use preload::*;
pub use state::*;
pub use tips::*;
