//! Actor system for watch mode.
//!
//! ```text
//! FsActor --Changed--> PublishActor --Reload--> WsActor --"reload"--> browser
//! (notify)            (render cycles)          (ReloadChannel)
//! ```
//!
//! - `messages` - message types between actors
//! - `fs` - notify watcher bridge and event filtering
//! - `publish` - runs a publish cycle per change
//! - `ws` - owns the live reload connection
//! - `coordinator` - wires channels and runs the actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod publish;
pub mod ws;

pub use coordinator::Coordinator;
