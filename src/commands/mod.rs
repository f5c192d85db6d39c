pub mod mock;
pub mod serve;
pub mod validate;

pub use mock::execute_mock;
pub use serve::execute_serve;
pub use validate::execute_validate;
