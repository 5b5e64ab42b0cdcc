pub mod errors;
pub mod ids;
pub mod report;
pub mod request;
pub mod rooted;

pub use errors::*;
pub use ids::*;
pub use report::*;
pub use request::*;
pub use rooted::*;
