//! QUIC transport layer for frontend messages.
//!
//! This module provides [`VstorClient`] and [`VstorServer`], which exchange
//! [`VstorMessage`] values over QUIC bi-directional streams using `quinn`.
//!
//! [`VstorClient`]: client::VstorClient
//! [`VstorServer`]: server::VstorServer
//! [`VstorMessage`]: crate::message::VstorMessage

pub mod client;
pub mod server;
