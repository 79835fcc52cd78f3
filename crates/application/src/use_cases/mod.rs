pub mod config;
pub mod ptr;

pub use config::ReloadPolicyUseCase;
pub use ptr::{HandlePtrQueryUseCase, ResolvePtrUseCase, SynthesizePtrUseCase};
