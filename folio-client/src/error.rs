use crate::api;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(String),

    #[error("malformed server response: {0}")]
    Payload(String),

    #[error(transparent)]
    Api(#[from] api::Error),
}
