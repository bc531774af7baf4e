//! # embedviz
//!
//! Step-driven panels that explain word-embedding vectors to a lay audience:
//! tokenization, random initialization, scripted "learning" of feature values
//! and similarity between word vectors.
//!
//! Every number shown is illustrative. Nothing here trains a model.
//!
//! ## Quick Start
//!
//! ```
//! use embedviz::prelude::*;
//!
//! let cfg = VizConfig::default();
//! let mut panel = learning::playback(&cfg, ManualScheduler::new());
//!
//! panel.step();
//! assert_eq!(panel.position(), 1);
//! assert_eq!(panel.state().get("cat"), Some(&[0.6, 0.3, 0.2, 0.2][..]));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): snapshot serialization and config file loading
//!
//! ## Modules
//!
//! - [`catalog`]: immutable ordered example tables
//! - [`playback`]: the generic playback controller
//! - [`scheduler`]: timer seam used for auto-advance
//! - [`display`]: word vectors and scripted deltas
//! - [`derived`]: similarity and sentence annotations
//! - [`panels`]: the concrete panels and their data

#[path = "core/catalog.rs"]
pub mod catalog;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/derived.rs"]
pub mod derived;

#[path = "core/display.rs"]
pub mod display;

#[path = "core/playback.rs"]
pub mod playback;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/scheduler.rs"]
pub mod scheduler;

pub mod panels;

/// Prelude module for convenient imports.
///
/// ```
/// use embedviz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogError};
    pub use crate::config::VizConfig;
    pub use crate::derived::{annotate, relationship_grid, similarity, Annotation};
    pub use crate::display::{Delta, DeltaError, WordVectors, VOCABULARY};
    pub use crate::panels::{learning, patterns, processing, tokens, PanelKind};
    pub use crate::playback::{
        EndPolicy, Lesson, Mode, Playback, PlaybackError, SpeedBounds, StepOutcome,
    };
    pub use crate::prng::Prng;
    pub use crate::scheduler::{ManualScheduler, Scheduler, TickToken, TimerGuard, TimerHandle};
}
