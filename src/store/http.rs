//! Remote triple store reached through a SPARQL query/update HTTP API.
//!
//! Modeled on the VIVO SPARQL API: queries are form-POSTed to
//! `<base>/api/sparqlQuery`, updates to `<base>/api/sparqlUpdate`, each
//! request carrying `email` and `password` form fields. Stores with other
//! endpoint layouts (Fuseki, GraphDB) are configured through explicit
//! endpoint URLs and optional credentials.

use std::fmt;
use std::time::Duration;

use crate::error::{StoreError, StoreResult};
use crate::graph::{Scope, Triple, TripleSet};

use super::GraphStore;
use super::results::SparqlResults;
use super::update;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const MAX_BODY_PREVIEW: usize = 500;

/// Connection settings for [`HttpStore`].
#[derive(Clone)]
pub struct HttpStoreConfig {
    pub query_endpoint: String,
    pub update_endpoint: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl HttpStoreConfig {
    /// Endpoints of a VIVO instance rooted at `base_url`.
    pub fn vivo(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            query_endpoint: format!("{base}/api/sparqlQuery"),
            update_endpoint: format!("{base}/api/sparqlUpdate"),
            email: None,
            password: None,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_credentials(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for HttpStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStoreConfig")
            .field("query_endpoint", &self.query_endpoint)
            .field("update_endpoint", &self.update_endpoint)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Blocking SPARQL-over-HTTP client.
///
/// Holds only connection and auth settings; every call is independent.
pub struct HttpStore {
    config: HttpStoreConfig,
    agent: ureq::Agent,
}

impl fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStore").field("config", &self.config).finish()
    }
}

impl HttpStore {
    pub fn new(config: HttpStoreConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { config, agent }
    }

    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    fn form<'a>(&'a self, key: &'a str, text: &'a str) -> Vec<(&'a str, &'a str)> {
        let mut form = Vec::with_capacity(3);
        if let Some(email) = &self.config.email {
            form.push(("email", email.as_str()));
        }
        if let Some(password) = &self.config.password {
            form.push(("password", password.as_str()));
        }
        form.push((key, text));
        form
    }

    fn post(
        &self,
        endpoint: &str,
        key: &str,
        text: &str,
        accept: Option<&str>,
    ) -> StoreResult<ureq::Response> {
        let mut request = self.agent.post(endpoint);
        if let Some(accept) = accept {
            request = request.set("Accept", accept);
        }
        match request.send_form(&self.form(key, text)) {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(StoreError::Status {
                    endpoint: endpoint.to_string(),
                    code,
                    body: preview(&body),
                })
            }
            Err(ureq::Error::Transport(transport)) => Err(StoreError::Transport {
                endpoint: endpoint.to_string(),
                message: transport.to_string(),
            }),
        }
    }

    /// Run a SELECT query and decode its JSON results.
    pub fn select(&self, query: &str) -> StoreResult<SparqlResults> {
        tracing::debug!(endpoint = %self.config.query_endpoint, "sparql query");
        self.post(
            &self.config.query_endpoint,
            "query",
            query,
            Some(SPARQL_RESULTS_JSON),
        )?
        .into_json::<SparqlResults>()
        .map_err(|e| StoreError::Response {
            message: format!("failed to parse SPARQL JSON results: {e}"),
        })
    }

    /// Run a SPARQL update.
    pub fn execute_update(&self, text: &str) -> StoreResult<()> {
        self.post(&self.config.update_endpoint, "update", text, None)?;
        Ok(())
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > MAX_BODY_PREVIEW {
        let head: String = body.chars().take(MAX_BODY_PREVIEW).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

impl GraphStore for HttpStore {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fetch_all(&self, scope: &Scope) -> StoreResult<TripleSet> {
        let triples = self.select(&update::select_all(scope))?.into_triples();
        tracing::debug!(scope = %scope, count = triples.len(), "fetched existing triples");
        Ok(triples)
    }

    fn bulk_insert(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize> {
        if triples.is_empty() {
            return Ok(0);
        }
        self.execute_update(&update::insert_data(scope, triples))?;
        Ok(triples.len())
    }

    fn bulk_remove(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize> {
        if triples.is_empty() {
            return Ok(0);
        }
        self.execute_update(&update::delete_data(scope, triples))?;
        Ok(triples.len())
    }
}
