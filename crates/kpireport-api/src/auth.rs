// PRTG credentials
//
// PRTG authenticates every API call through query parameters: `username`
// plus either `password` or `passhash`. There is no session to manage.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// The secret half of a PRTG login.
#[derive(Debug, Clone)]
pub enum ApiSecret {
    /// Account password, sent as `password=`.
    Password(SecretString),
    /// Account passhash (from `/api/getpasshash.htm`), sent as `passhash=`.
    Passhash(SecretString),
}

/// Username plus secret, appended to every request URL.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub username: String,
    pub secret: ApiSecret,
}

impl ApiCredentials {
    pub fn password(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            secret: ApiSecret::Password(password),
        }
    }

    pub fn passhash(username: impl Into<String>, passhash: SecretString) -> Self {
        Self {
            username: username.into(),
            secret: ApiSecret::Passhash(passhash),
        }
    }

    /// Append the credential query parameters to `url`.
    pub(crate) fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("username", &self.username);
        match &self.secret {
            ApiSecret::Password(pw) => pairs.append_pair("password", pw.expose_secret()),
            ApiSecret::Passhash(hash) => pairs.append_pair("passhash", hash.expose_secret()),
        };
    }
}

/// Mask credential parameters of `url` in place.
pub(crate) fn scrub(url: &mut Url) {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "password" || k == "passhash" {
                "***".to_owned()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return;
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// Render a URL for logs with credential parameters masked.
pub(crate) fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    scrub(&mut shown);
    shown.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn password_is_percent_encoded() {
        let creds = ApiCredentials::password("ops", SecretString::from("a#b&c".to_owned()));
        let mut url = Url::parse("https://prtg.local/api/table.json?content=sensors").unwrap();
        creds.apply(&mut url);
        assert_eq!(url.query(), Some("content=sensors&username=ops&password=a%23b%26c"));
    }

    #[test]
    fn redaction_masks_secrets_only() {
        let creds = ApiCredentials::passhash("ops", SecretString::from("123456".to_owned()));
        let mut url = Url::parse("https://prtg.local/api/historicdata.json?id=7").unwrap();
        creds.apply(&mut url);
        let shown = redacted(&url);
        assert!(shown.contains("id=7"));
        assert!(shown.contains("username=ops"));
        assert!(!shown.contains("123456"));
    }
}
