//! Engine-backed service implementations.
//!
//! Each backend module provides a concrete type that implements the six
//! resource service traits on top of an [`EngineGateway`].
//!
//! [`EngineGateway`]: crate::engine::EngineGateway

pub mod spdk;

pub use spdk::SpdkBackend;
