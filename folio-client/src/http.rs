use async_trait::async_trait;

use crate::{
    api::{self, Comment, CommentId, DeleteComment, NewComment},
    CommentStore, Error,
};

/// [`CommentStore`] talking to a folio server over HTTP
#[derive(Clone, Debug)]
pub struct HttpStore {
    host: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(host: impl Into<String>) -> HttpStore {
        HttpStore::with_client(host, reqwest::Client::new())
    }

    pub fn with_client(host: impl Into<String>, client: reqwest::Client) -> HttpStore {
        let host = host.into();
        HttpStore {
            host: String::from(host.trim_end_matches('/')),
            client,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }
}

fn network(err: reqwest::Error) -> Error {
    Error::Network(err.to_string())
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.bytes().await.map_err(network)?;
    Err(match api::Error::parse(&body) {
        Ok(err) => Error::Api(err),
        Err(_) => Error::Payload(format!("server answered with status {status}")),
    })
}

#[async_trait(?Send)]
impl CommentStore for HttpStore {
    async fn list_comments(&self, limit: usize) -> Result<Vec<Comment>, Error> {
        let resp = self
            .client
            .get(format!(
                "{}?{}={}",
                self.url(api::LIST_COMMENTS),
                api::NUM_COMMENTS_PARAM,
                limit
            ))
            .send()
            .await
            .map_err(network)?;
        let body = check_status(resp)
            .await?
            .bytes()
            .await
            .map_err(network)?;
        serde_json::from_slice(&body).map_err(|e| Error::Payload(e.to_string()))
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error> {
        let resp = self
            .client
            .post(self.url(api::DELETE_COMMENT))
            .form(&DeleteComment { id: id.clone() })
            .send()
            .await
            .map_err(network)?;
        check_status(resp).await.map(|_| ())
    }

    async fn delete_all_comments(&self) -> Result<(), Error> {
        let resp = self
            .client
            .post(self.url(api::DELETE_ALL_COMMENTS))
            .send()
            .await
            .map_err(network)?;
        check_status(resp).await.map(|_| ())
    }

    /// The server answers with a redirect. Clients that follow it land on
    /// another page, which counts as success whatever its status.
    async fn contact_me(&self, comment: &NewComment) -> Result<(), Error> {
        let resp = self
            .client
            .post(self.url(api::CONTACT_ME))
            .form(comment)
            .send()
            .await
            .map_err(network)?;
        let redirected = !resp.url().path().ends_with(api::CONTACT_ME);
        if redirected || resp.status().is_redirection() {
            return Ok(());
        }
        check_status(resp).await.map(|_| ())
    }
}
