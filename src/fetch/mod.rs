mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::{Method, Request, Response, Url};

/// Sends `body` (already JSON-encoded) as a POST to `url`.
pub async fn post_json<C: HttpClient>(
    client: &C,
    url: Url,
    body: Vec<u8>,
    user_agent: &HeaderValue,
) -> reqwest::Result<Response> {
    let mut req = Request::new(Method::POST, url);

    let headers = req.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, user_agent.clone());
    *req.body_mut() = Some(body.into());

    client.execute(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(Method, String, Option<String>, Vec<u8>)>>,
    }

    #[async_trait]
    impl HttpClient for Recorder {
        async fn execute(&self, req: Request) -> reqwest::Result<Response> {
            let content_type = req
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = req
                .body()
                .and_then(|b| b.as_bytes())
                .map(<[u8]>::to_vec)
                .unwrap_or_default();
            self.seen.lock().unwrap().push((
                req.method().clone(),
                req.url().to_string(),
                content_type,
                body,
            ));
            Ok(Response::from(http::Response::new("{}")))
        }
    }

    #[tokio::test]
    async fn test_post_json_sets_method_headers_and_body() {
        let client = Recorder::default();
        let url = Url::parse("https://example.test/cards/collection").unwrap();
        let agent = HeaderValue::from_static("card_rater/test");

        let resp = post_json(&client, url, br#"{"identifiers":[]}"#.to_vec(), &agent)
            .await
            .unwrap();
        assert!(resp.status().is_success());

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (method, url, content_type, body) = &seen[0];
        assert_eq!(*method, Method::POST);
        assert_eq!(url, "https://example.test/cards/collection");
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body.as_slice(), br#"{"identifiers":[]}"#);
    }
}
