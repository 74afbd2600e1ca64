//! `reqwest` client for the users API.

use reqwest::{Client, Url};

use crate::client::logout::{AuthApi, LogoutError};
use crate::routing::ApiPrefix;

/// Talks to a running edge. Cookies received from the server are kept in
/// the client's jar, so logout carries the session it is ending.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base: Url,
}

impl HttpAuthApi {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn logout_url(&self) -> Result<Url, url::ParseError> {
        self.base.join(&format!("{}/logout", ApiPrefix::Users.path()))
    }
}

impl AuthApi for HttpAuthApi {
    async fn logout(&self) -> Result<(), LogoutError> {
        let url = self.logout_url()?;
        let response = self.client.post(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(LogoutError::Status(status.as_u16()))
        }
    }
}
