//! HTTP client for the admin server
//!
//! Every call is a single blocking request with no retry. The dispatcher runs
//! these on worker threads so the event loop never waits on the network.

use crate::config::Config;
use crate::model::analytics::{AccountList, Analytics, ImportReport, MaintenanceOutcome, ServiceList};
use crate::model::AccountRecord;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::COOKIE;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} is not available offline")]
    Offline { endpoint: String },

    #[error("invalid server URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where a form submission ended up after redirects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub location: String,
}

impl SubmitOutcome {
    /// Query string of the final location, without the leading `?`
    pub fn query(&self) -> &str {
        self.location
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or("")
    }
}

/// Cheap to clone; clones share the connection pool
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session_cookie: Option<String>,
    csrf_token: Option<String>,
}

impl ApiClient {
    /// Endpoint paths are joined relative to the server URL, so a path
    /// prefix such as `https://host/panel` is kept.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&config.server_url).map_err(|e| ApiError::InvalidUrl {
            url: config.server_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: config.server_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: config.server_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            session_cookie: config.session_cookie.clone(),
            csrf_token: config.csrf_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            reason: e.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let mut request = self.http.request(method, self.url(path)?);
        if let Some(ref cookie) = self.session_cookie {
            request = request.header(COOKIE, format!("session={}", cookie));
        }
        Ok(request)
    }

    fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        debug!(endpoint = path, "sending request");
        let response = request.send().map_err(|source| ApiError::Transport {
            endpoint: path.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = path, status = status.as_u16(), "request rejected");
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    fn json<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, ApiError> {
        let response = self.send(path, self.request(method, path)?)?;
        let body = response.text().map_err(|source| ApiError::Transport {
            endpoint: path.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }

    fn submit_form(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<SubmitOutcome, ApiError> {
        let mut form: Vec<(String, String)> = params.to_vec();
        if let Some(ref token) = self.csrf_token {
            form.push(("csrf_token".to_string(), token.clone()));
        }
        let response = self.send(path, self.request(Method::POST, path)?.form(&form))?;
        Ok(SubmitOutcome {
            location: response.url().to_string(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Endpoints
    // ─────────────────────────────────────────────────────────────────────────

    /// The listing masks emails and leaves passwords out, so every row comes back redacted
    pub fn fetch_accounts(&self) -> Result<Vec<AccountRecord>, ApiError> {
        let list: AccountList = self.json(Method::GET, "api/accounts")?;
        Ok(list
            .accounts
            .into_iter()
            .map(|record| AccountRecord {
                redacted: true,
                ..record
            })
            .collect())
    }

    pub fn fetch_analytics(&self) -> Result<Analytics, ApiError> {
        self.json(Method::GET, "api/analytics")
    }

    pub fn fetch_import_report(&self) -> Result<ImportReport, ApiError> {
        self.json(Method::GET, "api/import_report")
    }

    pub fn fetch_services(&self) -> Result<Vec<String>, ApiError> {
        let list: ServiceList = self.json(Method::GET, "api/services")?;
        Ok(list.services)
    }

    pub fn clean_duplicates(&self) -> Result<MaintenanceOutcome, ApiError> {
        self.json(Method::POST, "maintenance/clean_duplicates")
    }

    pub fn clean_failed(&self) -> Result<MaintenanceOutcome, ApiError> {
        self.json(Method::POST, "maintenance/clean_failed")
    }

    pub fn add_account(&self, params: &[(String, String)]) -> Result<SubmitOutcome, ApiError> {
        self.submit_form("add_account", params)
    }

    pub fn edit_account(&self, params: &[(String, String)]) -> Result<SubmitOutcome, ApiError> {
        self.submit_form("edit_account", params)
    }

    pub fn delete_account(&self, id: &str) -> Result<SubmitOutcome, ApiError> {
        self.submit_form(&format!("delete_account/{}", id), &[])
    }

    pub fn import_accounts(&self, params: &[(String, String)]) -> Result<SubmitOutcome, ApiError> {
        self.submit_form("import_accounts", params)
    }

    pub fn import_bulk_emails(
        &self,
        params: &[(String, String)],
    ) -> Result<SubmitOutcome, ApiError> {
        self.submit_form("import_bulk_emails", params)
    }
}

/// One-shot HTTP server for exercising the client against canned responses
#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer one connection per `(status, body)` pair, in order. The join
    /// handle yields each request as received, head then body.
    pub fn serve(responses: Vec<(&str, &str)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let responses: Vec<String> = responses
            .into_iter()
            .map(|(status, body)| {
                format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                )
            })
            .collect();

        let handle = thread::spawn(move || {
            let mut heads = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut head = String::new();
                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap();
                        }
                    }
                    head.push_str(&line);
                }
                let mut body = vec![0; content_length];
                reader.read_exact(&mut body).unwrap();
                head.push_str("\r\n");
                head.push_str(&String::from_utf8_lossy(&body));

                stream.write_all(response.as_bytes()).unwrap();
                heads.push(head);
            }
            heads
        });

        (url, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::serve;
    use super::*;

    fn client(url: &str) -> ApiClient {
        ApiClient::new(&Config {
            server_url: url.to_string(),
            session_cookie: Some("abc".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_server_url() {
        let config = Config {
            server_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ApiClient::new(&config),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_fetch_services_sends_cookie() {
        let (url, server) = serve(vec![("200 OK", r#"{"services":["Netflix","Hulu"]}"#)]);
        let services = client(&url).fetch_services().unwrap();
        assert_eq!(services, vec!["Netflix", "Hulu"]);

        let heads = server.join().unwrap();
        assert!(heads[0].starts_with("GET /api/services"));
        assert!(heads[0].to_lowercase().contains("cookie: session=abc"));
    }

    #[test]
    fn test_server_path_prefix_is_kept() {
        let (url, server) = serve(vec![("200 OK", r#"{"services":[]}"#)]);
        let client = client(&format!("{}/panel", url));
        assert!(client.base_url().ends_with("/panel/"));

        client.fetch_services().unwrap();
        assert!(server.join().unwrap()[0].starts_with("GET /panel/api/services"));
    }

    #[test]
    fn test_fetch_accounts_reads_server_shape() {
        let body = r#"{"accounts":[{"id":"1","email":"abc***@x.com","name":"Netflix","type":"Streaming","price":9.99,"status":"available"}]}"#;
        let (url, server) = serve(vec![("200 OK", body)]);
        let accounts = client(&url).fetch_accounts().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].price.as_str(), "$9.99");
        assert!(accounts[0].redacted);
        server.join().unwrap();
    }

    #[test]
    fn test_maintenance_posts_and_decodes() {
        let (url, server) = serve(vec![("200 OK", r#"{"removed":4}"#)]);
        let outcome = client(&url).clean_failed().unwrap();
        assert_eq!(outcome.removed, 4);
        assert!(server.join().unwrap()[0].starts_with("POST /maintenance/clean_failed"));
    }

    #[test]
    fn test_http_error_status() {
        let (url, server) = serve(vec![("403 FORBIDDEN", r#"{"error":"Unauthorized"}"#)]);
        let err = client(&url).fetch_analytics().unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 403, .. }));
        server.join().unwrap();
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let (url, server) = serve(vec![("200 OK", "<html>login</html>")]);
        let err = client(&url).fetch_import_report().unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        server.join().unwrap();
    }

    #[test]
    fn test_import_posts_form_fields() {
        let (url, server) = serve(vec![("200 OK", "<html>admin</html>")]);
        let params = vec![
            ("accounts_text".to_string(), "Netflix\na@x.com:pw".to_string()),
            ("default_price".to_string(), "15.99".to_string()),
        ];
        let outcome = client(&url).import_accounts(&params).unwrap();
        assert!(outcome.location.ends_with("/import_accounts"));

        let request = &server.join().unwrap()[0];
        assert!(request.starts_with("POST /import_accounts"));
        assert!(request.contains("accounts_text=Netflix%0Aa%40x.com%3Apw"));
        assert!(request.contains("default_price=15.99"));
    }

    #[test]
    fn test_submit_outcome_query() {
        let outcome = SubmitOutcome {
            location: "http://host/admin?status=success".to_string(),
        };
        assert_eq!(outcome.query(), "status=success");

        let outcome = SubmitOutcome {
            location: "http://host/admin".to_string(),
        };
        assert_eq!(outcome.query(), "");
    }
}
