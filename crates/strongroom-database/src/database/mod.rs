pub mod migration;
pub mod pool;
pub mod schema;
pub mod store;

pub use migration::*;
pub use pool::*;
pub use schema::*;
pub use store::*;
