use serde::{Deserialize, Serialize};

/// Process-unique identity of a platform object.
///
/// Issued by an [`IdAllocator`](crate::alloc::IdAllocator); never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub uuid::Uuid);

impl ObjectId {
    pub fn from_u128(value: u128) -> Self {
        Self(uuid::Uuid::from_u128(value))
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj:{}", self.0)
    }
}

/// A 32-byte account address.
///
/// Addresses own objects; they carry no authority of their own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    pub const ZERO: Address = Address([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a stable address from a human-readable label (BLAKE3).
    pub fn derive(label: &str) -> Self {
        Self(*blake3::hash(label.as_bytes()).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short display form (first 4 bytes hex).
    pub fn short_id(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address(0x{}..)", self.short_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_addresses_are_stable_and_distinct() {
        assert_eq!(Address::derive("alice"), Address::derive("alice"));
        assert_ne!(Address::derive("alice"), Address::derive("bob"));
        assert_ne!(Address::derive("alice"), Address::ZERO);
    }

    #[test]
    fn display_formats() {
        let id = ObjectId::from_u128(1);
        assert!(format!("{}", id).starts_with("obj:"));

        let addr = Address::derive("alice");
        let shown = format!("{}", addr);
        assert!(shown.starts_with("0x"));
        assert_eq!(shown.len(), 2 + 64);
        assert!(format!("{:?}", addr).contains(&addr.short_id()));
    }

    #[test]
    fn object_id_serialization() {
        let id = ObjectId(uuid::Uuid::new_v4());
        let json = serde_json::to_string(&id).unwrap();
        let restored: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
