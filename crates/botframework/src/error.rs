use botwire_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Channel(#[from] botwire_channels::Error),

    #[error("Bot Framework token request failed ({status}): {body}")]
    TokenRequest { status: u16, body: String },

    #[error("no serviceUrl in the inbound activity or the request parameters")]
    MissingServiceUrl,

    #[error("{message}")]
    Message { message: String },
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

botwire_common::impl_context!();
