use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

// ─── Opaque 32-byte token ─────────────────────────────────────

/// Width of every label/role token.
pub const TOKEN_LEN: usize = 32;

/// Fixed-size opaque token. States and roles are identified by these, never
/// by an enumerated type — the graph vocabulary is data, extensible at runtime.
///
/// Constructed from UTF-8 text by NUL-padding to 32 bytes; longer inputs are
/// truncated deterministically at the last char boundary that fits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token([u8; TOKEN_LEN]);

impl Token {
    pub fn new(text: &str) -> Self {
        let mut cut = text.len().min(TOKEN_LEN);
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        let mut bytes = [0u8; TOKEN_LEN];
        bytes[..cut].copy_from_slice(&text.as_bytes()[..cut]);
        Token(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TOKEN_LEN] {
        &self.0
    }

    /// The token text with trailing NUL padding stripped.
    fn trimmed(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |pos| pos + 1);
        &self.0[..end]
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.trimmed()))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self)
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::new(text)
    }
}

// Tokens serialize as their trimmed text, not as byte arrays — identities and
// labels cross the boundary as printable UTF-8.
impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Token::new(&text))
    }
}

// ─── Domain newtypes ──────────────────────────────────────────

/// Identifies one node in a workflow's state graph.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StateLabel(pub Token);

impl StateLabel {
    pub fn new(text: &str) -> Self {
        StateLabel(Token::new(text))
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for StateLabel {
    fn from(text: &str) -> Self {
        StateLabel::new(text)
    }
}

/// Identifies a permission class. Flat — no hierarchy between roles.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Role(pub Token);

impl Role {
    pub fn new(text: &str) -> Self {
        Role(Token::new(text))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Role {
    fn from(text: &str) -> Self {
        Role::new(text)
    }
}

/// Caller identity used for authorization checks. Opaque to the core —
/// typically an address-like string owned by the transport layer.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Principal(id.into())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Principal::new(id)
    }
}

/// Unique identity of one provisioned workflow instance. UUIDv7, so ids sort
/// in provisioning order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    pub fn generate() -> Self {
        InstanceId(Uuid::now_v7())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Epoch milliseconds (UTC).
pub type Timestamp = i64;

pub(crate) fn now_ms() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as Timestamp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_short_text() {
        let t = Token::new("ORDER PLACED");
        assert_eq!(t.to_string(), "ORDER PLACED");
    }

    #[test]
    fn token_pads_with_nuls() {
        let t = Token::new("A");
        assert_eq!(t.as_bytes()[0], b'A');
        assert!(t.as_bytes()[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn token_truncates_at_char_boundary() {
        // 31 ASCII bytes + one 2-byte char: the multibyte char cannot fit, so
        // the cut lands on its leading boundary at 31 bytes.
        let text = format!("{}é", "x".repeat(31));
        let t = Token::new(&text);
        assert_eq!(t.to_string(), "x".repeat(31));

        // Same input truncated twice is stable.
        assert_eq!(Token::new(&text), Token::new(&t.to_string()));
    }

    #[test]
    fn token_serializes_as_string() {
        let label = StateLabel::new("DEMAND GENERATED");
        let json = serde_json::to_string(&label).expect("serialize");
        assert_eq!(json, "\"DEMAND GENERATED\"");
        let back: StateLabel = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, label);
    }

    #[test]
    fn instance_ids_sort_in_generation_order() {
        let a = InstanceId::generate();
        let b = InstanceId::generate();
        assert!(a < b);
    }
}
