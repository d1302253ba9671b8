//! Placement domain models.
//!
//! Provides the data types describing one placement request and its
//! solutions. All types are immutable inputs for the duration of a
//! scheduling run, except [`Solution`], which the GA evolves.
//!
//! # Domain Mappings
//!
//! | u-cloud-schedule | Multi-cloud | Edge computing |
//! |------------------|-------------|----------------|
//! | Cloud | Data center / region | Edge site |
//! | Application | Containerized service | Offloaded task |
//! | Gene | Placement decision | Offloading decision |
//! | Solution | Deployment plan | Offloading plan |

mod application;
mod cloud;
mod solution;

pub use application::{Application, Dependency, MAX_PRIORITY, MIN_PRIORITY};
pub use cloud::{Cloud, NetState, Resources};
pub use solution::{Gene, Placement, Solution};
