pub mod bank_library;
pub mod bank_stager;
pub mod bank_store;
pub mod bank_switch;
pub mod config;
pub mod engine;
pub mod error;
pub mod gain;
pub mod ipc;
pub mod keyboard;
pub mod payloads;
pub mod processor;
pub mod render_pipeline;
pub mod translator;

pub use bank_library::*;
pub use bank_stager::*;
pub use bank_store::*;
pub use bank_switch::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use gain::*;
pub use ipc::*;
pub use keyboard::*;
pub use payloads::*;
pub use processor::*;
pub use render_pipeline::*;
pub use translator::*;
