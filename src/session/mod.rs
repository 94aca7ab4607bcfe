pub mod answers;
pub mod clock;
pub mod error;
pub mod machine;
pub mod result;
pub mod snapshot;
pub mod timer;
