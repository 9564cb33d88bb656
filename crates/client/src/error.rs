use fieldwalk_kernel::SessionError;
use fieldwalk_stream::GatewayError;

/// Why a session could not start. Not retried.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("invalid client options: {0}")]
    Options(&'static str),

    #[error("could not fetch world config: {0}")]
    Config(#[source] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("could not fetch the first view: {0}")]
    FirstView(#[source] GatewayError),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("initialization failed: {0}")]
    Init(#[from] InitError),

    /// A later update failed. The previous frame stays on screen.
    #[error("update failed: {0}")]
    Fetch(#[from] GatewayError),
}
