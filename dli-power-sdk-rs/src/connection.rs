use std::sync::LazyLock;

use regex::Regex;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::challenge_response;
use crate::types::{DliPowerError, SwitchSettings};

const LOGIN_PAGE: &str = "/";
const LOGIN_FORM: &str = "/login.tcl";
const CHALLENGE_INPUT_PATTERN: &str = r#"(?is)<input[^>]*name\s*=\s*"?Challenge"?[^>]*>"#;
const VALUE_ATTRIBUTE_PATTERN: &str = r#"(?i)value\s*=\s*"?([^"\s>]*)"#;

static CHALLENGE_INPUT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CHALLENGE_INPUT_PATTERN).expect("challenge input pattern compiles"));
static VALUE_ATTRIBUTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VALUE_ATTRIBUTE_PATTERN).expect("value attribute pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authentication {
    /// Newer firmware: challenge/response form that hands out a session cookie.
    Session,
    /// Older firmware: HTTP basic auth on every request.
    Basic,
}

pub struct Connection {
    http_client: reqwest::Client,
    base_url: String,
    userid: String,
    password: String,
    authentication: Option<Authentication>,
}

impl Connection {
    pub fn new(settings: &SwitchSettings) -> Result<Self, DliPowerError> {
        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: settings.base_url(),
            userid: settings.userid.clone(),
            password: settings.password.clone(),
            authentication: None,
        })
    }

    pub fn authentication(&self) -> Option<Authentication> {
        self.authentication
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&mut self) -> Result<Authentication, DliPowerError> {
        let response = self.http_client.get(self.url(LOGIN_PAGE)).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            info!(switch = %self.base_url, "switch wants basic auth");
            self.authentication = Some(Authentication::Basic);
            return Ok(Authentication::Basic);
        }

        let login_page = response.error_for_status()?.text().await?;
        let authentication = match find_challenge(&login_page) {
            Some(challenge) => {
                let form = [
                    ("Username", self.userid.clone()),
                    ("Password", challenge_response(&challenge, &self.userid, &self.password)),
                ];
                let landing_page = self.http_client
                    .post(self.url(LOGIN_FORM))
                    .form(&form)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;

                if find_challenge(&landing_page).is_some() {
                    return Err(DliPowerError::LoginFailed(format!(
                        "{} rejected the credentials for {}", self.base_url, self.userid
                    )));
                }
                Authentication::Session
            }
            None => Authentication::Basic,
        };

        info!(switch = %self.base_url, ?authentication, "logged in");
        self.authentication = Some(authentication);
        Ok(authentication)
    }

    pub async fn get_page(&mut self, path: &str) -> Result<String, DliPowerError> {
        let authentication = match self.authentication {
            Some(authentication) => authentication,
            None => self.login().await?,
        };

        debug!(switch = %self.base_url, path, "fetching page");
        let mut request = self.http_client.get(self.url(path));
        if authentication == Authentication::Basic {
            request = request.basic_auth(&self.userid, Some(&self.password));
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

pub fn find_challenge(page: &str) -> Option<String> {
    let challenge_input = CHALLENGE_INPUT_REGEX.find(page)?;
    VALUE_ATTRIBUTE_REGEX
        .captures(challenge_input.as_str())
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_challenge_in_login_form() {
        let page = r#"<form action="/login.tcl" method="post">
            <input type="hidden" name="Challenge" value="Xk2mzQ09">
            <input type="text" name="Username"></form>"#;
        assert_eq!(find_challenge(page).as_deref(), Some("Xk2mzQ09"));
    }

    #[test]
    fn finds_challenge_when_value_comes_first() {
        let page = r#"<INPUT TYPE=hidden VALUE="abc123" NAME=Challenge>"#;
        assert_eq!(find_challenge(page).as_deref(), Some("abc123"));
    }

    #[test]
    fn status_page_has_no_challenge() {
        assert_eq!(find_challenge("<table><tr><td>1</td></tr></table>"), None);
    }
}
