use crate::config::Config;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, error, info, instrument, trace};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Body of a search result page, only for a `200 OK` answer.
    async fn fetch(&self, url: &str) -> Result<String>;
}

// region:        --- HTTP fetcher

pub struct HttpFetcher {
    http_client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        debug!("HTTP Client created: {:?}", http_client);

        Ok(Self::from_client(http_client, config.max_body_bytes))
    }

    pub fn from_client(http_client: Client, max_body_bytes: usize) -> Self {
        Self {
            http_client,
            max_body_bytes,
        }
    }

    #[instrument(name = "HTTP_request", level = "debug", skip_all)]
    async fn http_request(&self, url: &str) -> Result<Response> {
        info!("Sending request");
        match self.http_client.get(url).send().await {
            Ok(res) => {
                info!("Receive with status: {}", res.status());
                debug!("Response: {:?}", res);
                Ok(res)
            }
            Err(err) => {
                error!("Reason: {}", err);
                Err(Error::Reqwest(err))
            }
        }
    }

    async fn read_body(&self, mut res: Response) -> Result<String> {
        let limit = self.max_body_bytes;
        if res.content_length().is_some_and(|len| len > limit as u64) {
            return Err(Error::BodyTooLarge { limit });
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = res.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(Error::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        trace!("{} bytes read", body.len());

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(name = "fetch", level = "info", fields(url = url), skip_all)]
    async fn fetch(&self, url: &str) -> Result<String> {
        let res = self.http_request(url).await?;

        if res.status() != StatusCode::OK {
            return Err(Error::HttpStatus(res.status().as_u16()));
        }

        self.read_body(res).await
    }
}

// endregion:     --- HTTP fetcher

#[cfg(test)]
mod tests {
    use super::{HttpFetcher, PageFetcher};
    use crate::Error;
    use reqwest::Client;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Answer a single connection with `response`, hand back the raw request.
    async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (request_tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let _ = request_tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        (format!("http://{}/search?q=x&start=0", addr), request_rx)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            concat!(
                "HTTP/1.1 {}\r\n",
                "Content-Type: text/html\r\n",
                "Content-Length: {}\r\n",
                "Connection: close\r\n\r\n{}"
            ),
            status,
            body.len(),
            body
        )
    }

    fn fetcher(max_body_bytes: usize) -> HttpFetcher {
        let http_client = Client::builder()
            .no_proxy()
            .user_agent("dork-hound-test/1.0")
            .build()
            .unwrap();
        HttpFetcher::from_client(http_client, max_body_bytes)
    }

    #[tokio::test]
    async fn ok_returns_body_and_sends_user_agent() {
        let body = r#"<html><a href="http://a.com">a</a></html>"#;
        let (url, request) = serve_once(http_response("200 OK", body)).await;

        let html = fetcher(1024).fetch(&url).await.unwrap();
        assert_eq!(body, html);

        let request = request.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /search?q=x&start=0 "));
        assert!(request.contains("user-agent: dork-hound-test/1.0"));
    }

    #[tokio::test]
    async fn non_200_is_an_error_with_status() {
        let (url, _request) = serve_once(http_response("429 Too Many Requests", "slow down")).await;

        match fetcher(1024).fetch(&url).await {
            Err(err @ Error::HttpStatus(429)) => assert!(err.to_string().contains("429")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn body_over_limit() {
        let body = "x".repeat(64);
        let (url, _request) = serve_once(http_response("200 OK", &body)).await;

        let res = fetcher(16).fetch(&url).await;
        assert!(matches!(res, Err(Error::BodyTooLarge { limit: 16 })));
    }

    #[tokio::test]
    async fn connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let res = fetcher(1024).fetch(&format!("http://{}/", addr)).await;
        assert!(matches!(res, Err(Error::Reqwest(_))));
    }
}
