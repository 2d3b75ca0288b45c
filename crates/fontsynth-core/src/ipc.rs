use fontsynth_ports::types::{BankHandle, Channel};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    ListBanks,
    SelectBank { name: String },
    NoteOn { note: u8, velocity: u8, channel: Channel },
    NoteOff { note: u8, channel: Channel },
    Shutdown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    BanksListed { names: Vec<String> },
    BankSwitched { name: String, handle: BankHandle },
    /// Something the user should see in a dialog.
    Alert { title: String, message: String },
}
