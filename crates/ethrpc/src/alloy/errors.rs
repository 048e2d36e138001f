use alloy::transports::{RpcError, TransportError};

pub trait TransportErrorExt {
    /// Returns whether the node received the request and answered it with an
    /// error (e.g. "insufficient funds"), as opposed to the request never
    /// producing a JSON-RPC response at all.
    fn is_node_rejection(&self) -> bool;

    /// Returns whether the error carries revert data, i.e. the EVM executed
    /// the transaction and it reverted.
    fn is_revert(&self) -> bool;
}

impl TransportErrorExt for TransportError {
    fn is_node_rejection(&self) -> bool {
        matches!(self, RpcError::ErrorResp(_))
    }

    fn is_revert(&self) -> bool {
        match self {
            RpcError::ErrorResp(err) => err.as_revert_data().is_some(),
            _ => false,
        }
    }
}

/// Create an arbitrary error response as returned by a node.
/// Useful for testing.
#[cfg(any(test, feature = "test-util"))]
pub fn testing_node_rejection() -> TransportError {
    TransportError::ErrorResp(alloy::rpc::json_rpc::ErrorPayload::internal_error())
}

/// Create an error response carrying revert data, as returned when a
/// transaction reverts during gas estimation. Useful for testing.
#[cfg(any(test, feature = "test-util"))]
pub fn testing_revert() -> TransportError {
    let payload = alloy::rpc::json_rpc::ErrorPayload::internal_error_with_message_and_obj(
        "execution reverted".into(),
        "0x08c379a0".to_string(),
    )
    .serialize_payload()
    .expect("string data serializes");
    TransportError::ErrorResp(payload)
}

/// Create an arbitrary error that happened before a node could respond.
/// Useful for testing.
#[cfg(any(test, feature = "test-util"))]
pub fn testing_transport_failure() -> TransportError {
    alloy::transports::TransportErrorKind::custom_str("connection refused")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_rejection() {
        assert!(testing_node_rejection().is_node_rejection());
        assert!(!testing_transport_failure().is_node_rejection());
    }

    #[test]
    fn revert() {
        assert!(testing_revert().is_revert());
        assert!(testing_revert().is_node_rejection());
        assert!(!testing_node_rejection().is_revert());
        assert!(!testing_transport_failure().is_revert());
    }
}
