use reqwest::blocking::Client;
use std::time::Duration;

use super::{ContributionResponse, ContributionSource, Error, ErrorKind, Result};
use crate::config::Config;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Fetches `url` and decodes the JSON body, mapping non-success statuses to
/// [`ErrorKind::FetchFailure`].
pub(crate) fn get_json<T: serde::de::DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    log::debug!("GET {}", url);

    let response = client.get(url).send()?;
    let status = response.status();

    if !status.is_success() {
        return Err(Error::new(
            ErrorKind::FetchFailure,
            &format!("{} answered with {}", url, status),
        ));
    }

    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// Contribution calendar of a GitHub user, served by the public
/// contributions API.
pub struct GithubContributions {
    client: Client,
    url: String,
    name: String,
}

impl GithubContributions {
    pub fn new(api_base: &str, user: &str, timeout: Duration) -> Result<Self> {
        Ok(GithubContributions {
            client: http_client(timeout)?,
            url: contributions_url(api_base, user),
            name: format!("GitHub user '{}'", user),
        })
    }

    pub fn from_config(config: &Config, user: &str) -> Result<Self> {
        Self::new(&config.contributions_api, user, config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ContributionSource for GithubContributions {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<ContributionResponse> {
        get_json(&self.client, &self.url)
    }
}

pub(crate) fn contributions_url(api_base: &str, user: &str) -> String {
    format!("{}/{}?y=last", api_base.trim_end_matches('/'), user)
}

/// Local HTTP server answering with canned responses, for tests that go
/// through the real client.
#[cfg(test)]
pub(crate) mod canned_http {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answers one request per entry of `responses`, in order, and returns
    /// the base URL of the server.
    pub fn serve(responses: Vec<(u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        thread::spawn(move || {
            for (status, body) in responses {
                let stream = match listener.accept() {
                    Ok((stream, _)) => stream,
                    Err(_) => return,
                };

                // Request head ends with an empty line
                let mut reader = BufReader::new(stream);
                let mut line = String::new();
                while reader.read_line(&mut line).unwrap_or(0) > 0 && line != "\r\n" {
                    line.clear();
                }

                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    _ => "Internal Server Error",
                };
                let mut stream = reader.into_inner();
                let _ = write!(
                    stream,
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = stream.flush();
            }
        });

        base
    }
}
