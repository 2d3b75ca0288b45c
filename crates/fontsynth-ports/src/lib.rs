pub mod audio;
pub mod bank;
pub mod midi;
pub mod storage;
pub mod synth;
pub mod types;

pub use audio::*;
pub use bank::*;
pub use midi::*;
pub use storage::*;
pub use synth::*;
pub use types::*;
