use thiserror::Error;

use crate::model::SourceKind;

#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("no active source selected")]
    NoActiveSource,
    #[error("{kind} rejected the action: {reason}")]
    ActionRejected { kind: SourceKind, reason: String },
    #[error("{kind} transport unreachable: {reason}")]
    TransportUnreachable { kind: SourceKind, reason: String },
    #[error("unrecognized transport state: {0:?}")]
    UnrecognizedState(String),
    #[error("cannot attach {proxy} proxy: {reason}")]
    ProxyAttach { proxy: String, reason: String },
}

impl SwitchError {
    pub fn action_rejected(kind: SourceKind, reason: impl Into<String>) -> Self {
        SwitchError::ActionRejected {
            kind,
            reason: reason.into(),
        }
    }

    pub fn transport_unreachable(kind: SourceKind, reason: impl Into<String>) -> Self {
        SwitchError::TransportUnreachable {
            kind,
            reason: reason.into(),
        }
    }

    pub fn proxy_attach(proxy: impl Into<String>, reason: impl Into<String>) -> Self {
        SwitchError::ProxyAttach {
            proxy: proxy.into(),
            reason: reason.into(),
        }
    }

    /// True for the construction-time failure class; everything else is
    /// recoverable and reported to the caller as a result.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SwitchError::ProxyAttach { .. })
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn rejection_names_the_offending_source() {
        let err = SwitchError::action_rejected(SourceKind::Radio, "source does not expose pause");
        assert_eq!(
            err.to_string(),
            "Radio rejected the action: source does not expose pause"
        );
        // The source kind is display payload only; these errors carry no
        // underlying cause chain.
        assert!(err.source().is_none());

        let err = SwitchError::transport_unreachable(SourceKind::Receiver, "connection refused");
        assert_eq!(
            err.to_string(),
            "Receiver transport unreachable: connection refused"
        );
        assert!(err.source().is_none());
    }
}
