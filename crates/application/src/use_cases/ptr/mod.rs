pub mod handle_ptr_query;
pub mod resolve_ptr;
pub mod synthesize_ptr;

pub use handle_ptr_query::HandlePtrQueryUseCase;
pub use resolve_ptr::ResolvePtrUseCase;
pub use synthesize_ptr::SynthesizePtrUseCase;
