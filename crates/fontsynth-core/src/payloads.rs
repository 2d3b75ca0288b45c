use fontsynth_ports::bank::BankPayloadSource;
use std::borrow::Cow;

/// Bank payloads compiled into the binary, typically via `include_bytes!`.
#[derive(Clone, Debug, Default)]
pub struct EmbeddedBanks {
    banks: Vec<(String, Cow<'static, [u8]>)>,
}

impl EmbeddedBanks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bank(mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Replaces the payload of an existing name in place, keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) {
        let name = name.into();
        let bytes = bytes.into();
        match self.banks.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, payload)) => *payload = bytes,
            None => self.banks.push((name, bytes)),
        }
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}

impl BankPayloadSource for EmbeddedBanks {
    fn bank_names(&self) -> Vec<String> {
        self.banks.iter().map(|(name, _)| name.clone()).collect()
    }

    fn payload(&self, name: &str) -> Option<&[u8]> {
        self.banks
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, bytes)| bytes.as_ref())
    }
}
