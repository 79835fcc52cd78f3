pub mod reload;

pub use reload::ReloadPolicyUseCase;
