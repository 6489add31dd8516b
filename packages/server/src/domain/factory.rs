//! Domain factories for creating value objects.

use super::{ConnectionId, NodeId, error::ValueObjectError};

/// Factory for generating ConnectionId instances.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        ConnectionId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Factory for generating NodeId instances.
pub struct NodeIdFactory;

impl NodeIdFactory {
    pub fn generate() -> NodeId {
        NodeId::new(format!("node-{}", uuid::Uuid::new_v4().simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_factory_generate() {
        // テスト項目: UUID v4 形式の ConnectionId を生成できる
        // when (操作):
        let connection_id = ConnectionIdFactory::generate().unwrap();

        // then (期待する結果):
        assert_eq!(connection_id.as_str().len(), 36);
    }

    #[test]
    fn test_connection_id_factory_generate_uniqueness() {
        // テスト項目: 毎回異なる ID を生成する
        let id1 = ConnectionIdFactory::generate().unwrap();
        let id2 = ConnectionIdFactory::generate().unwrap();

        assert_ne!(id1, id2);
    }

    #[test]
    fn test_node_id_factory_prefix() {
        // テスト項目: NodeId は "node-" で始まる
        assert!(NodeIdFactory::generate().as_str().starts_with("node-"));
    }
}
