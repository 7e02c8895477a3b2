use eyre::Result;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

const SESSION_TOKEN_HEADER: &str = "Session-Token";

pub enum Auth {
    /// Use a consumer token sent as a Bearer authorization header
    Token(String),
    /// Use a session token sent in the Session-Token header
    Session(String),
    /// Don't use any authentication
    None,
}

impl Auth {
    pub fn new(token: Option<String>, session_token: Option<String>) -> Self {
        match (token, session_token) {
            (Some(token), _) => Self::Token(token),
            (None, Some(session)) => Self::Session(session),
            (None, None) => Self::None,
        }
    }

    /// Insert the authentication header, if any, into a default header map
    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        let (name, value) = match self {
            Self::Token(token) => (AUTHORIZATION, format!("Bearer {}", token)),
            Self::Session(token) => (
                HeaderName::from_static("session-token"),
                token.to_string(),
            ),
            Self::None => return Ok(()),
        };
        let mut value = HeaderValue::from_str(&value)?;
        value.set_sensitive(true);
        headers.insert(name, value);
        Ok(())
    }
}

impl std::fmt::Display for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => write!(f, "Token"),
            Self::Session(_) => write!(f, "{}", SESSION_TOKEN_HEADER),
            Self::None => write!(f, "None"),
        }
    }
}
