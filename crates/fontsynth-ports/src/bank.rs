/// Source of the bank payloads shipped inside the binary.
pub trait BankPayloadSource: Send + Sync {
    /// Names in a stable order; the bank registry is built from this list.
    fn bank_names(&self) -> Vec<String>;

    fn payload(&self, name: &str) -> Option<&[u8]>;
}
