pub mod config;
pub mod dns;

pub use config::ReloadConfigUseCase;
pub use dns::ResolveQueryUseCase;
