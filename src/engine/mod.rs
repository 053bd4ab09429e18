//! The visibility pass.
//!
//! A [`VisionSession`] owns everything that survives between passes: the
//! change detector's keys and the shadow cache. Callers hand it a
//! [`SceneStore`](crate::scene::SceneStore) whenever the scene may have
//! changed:
//!
//! ```no_run
//! use dynfog::engine::{PassOutcome, VisionSession};
//! use dynfog::scene::MemoryScene;
//!
//! # async fn run() -> Result<(), dynfog::VisionError> {
//! let scene = MemoryScene::default();
//! let session = VisionSession::default();
//!
//! if let PassOutcome::Completed(report) = session.evaluate(&scene, false).await? {
//!     println!("{}", report);
//! }
//! # Ok(())
//! # }
//! ```

mod options;
mod session;

pub use options::EngineOptions;
pub use session::{PassOutcome, SkipReason, VisionSession};
