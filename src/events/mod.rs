pub mod pointer;

pub use pointer::PointerListeners;
