//! Core library for devgenius
//!
//! This crate implements the **Functional Core** of the devgenius coding
//! assistant, following the Functional Core - Imperative Shell pattern.
//!
//! # Architecture Overview
//!
//! - **`devgenius_core`** (this crate): the request/response pipeline as pure
//!   transformations with zero I/O
//! - **`devgenius`**: the Imperative Shell that talks to the AI provider, the
//!   OCR engine, the credential file, and the terminal
//!
//! # Pipeline
//!
//! A request flows through the modules in this order:
//!
//! 1. [`feature`]: the closed catalog of six assistant features
//! 2. [`request`]: validate the input and pack a [`request::RequestPayload`]
//! 3. [`provider`]: prompt assembly and reply interpretation (the call happens in the shell)
//! 4. [`response`]: the loading/failed/ready lifecycle of a request slot
//! 5. [`format`] or [`error_detection`]: turn the reply into renderable views
//! 6. [`render`]: escape and emit HTML at the rendering boundary
//!
//! The image path ([`image`]) runs alongside: validate, preview, then hand the
//! bytes to OCR.
//!
//! # Example Usage
//!
//! ```rust
//! use devgenius_core::feature::FeatureKind;
//! use devgenius_core::request::build;
//! use devgenius_core::response::{render_output, ProviderOutput, Rendered};
//!
//! let payload = build(FeatureKind::Explanation, "let x = 1;", None).unwrap();
//! assert!(payload.options().is_none());
//!
//! // Pretend the provider answered
//! let reply = ProviderOutput::Text("Binds x:\n```js\nlet x = 1;\n```".to_string());
//! match render_output(&reply) {
//!     Rendered::Segments(segments) => assert_eq!(segments.len(), 2),
//!     Rendered::ErrorDetection(_) => unreachable!(),
//! }
//! ```

pub mod config;
pub mod error_detection;
pub mod feature;
pub mod format;
pub mod image;
pub mod language;
pub mod provider;
pub mod render;
pub mod request;
pub mod response;
