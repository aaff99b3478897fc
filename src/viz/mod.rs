//! Visualization requests and render payloads
//!
//! A [`VisualizationConfig`] names a kind, a dataset and column bindings.
//! [`VisualizationEngine`] looks up the handler for the kind, validates the
//! dataset rows against it and produces a [`RenderSpec`] for an external
//! renderer.
//!
//! Built-in handlers cover `bar`, `map` and the deck.gl kinds
//! (`deckgl_overlay`, `arc_layer`, `scatterplot_layer`). Other kinds are
//! served once a handler is registered for them.

mod bar;
mod config;
mod deckgl;
mod engine;
mod error;
mod map;

pub use bar::*;
pub use config::*;
pub use deckgl::*;
pub use engine::*;
pub use error::*;
pub use map::*;
