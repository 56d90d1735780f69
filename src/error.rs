//! Rich diagnostic error types for the ngsync engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so operators know what
//! went wrong during a sync run and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for a synchronization run.
#[derive(Debug, Error, Diagnostic)]
pub enum SyncError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("could not read the current contents of {scope}")]
    #[diagnostic(
        code(ngsync::sync::fetch_failed),
        help(
            "The run was configured with `on_fetch_failure = \"abort\"`, so nothing was written. \
             Check that the store is reachable, or switch to \"degrade\" to re-add desired \
             triples without removing anything."
        )
    )]
    FetchFailed {
        scope: String,
        #[source]
        source: StoreError,
    },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("invalid IRI \"{iri}\": {message}")]
    #[diagnostic(
        code(ngsync::graph::invalid_iri),
        help("Subjects, predicates, IRI objects and graph names must be absolute IRIs.")
    )]
    InvalidIri { iri: String, message: String },

    #[error("invalid literal \"{value}\": {message}")]
    #[diagnostic(
        code(ngsync::graph::invalid_literal),
        help("Language tags must be well-formed BCP47 tags, e.g. `en` or `en-US`.")
    )]
    InvalidLiteral { value: String, message: String },

    #[error("unsupported term: {term}")]
    #[diagnostic(
        code(ngsync::graph::unsupported_term),
        help(
            "Only IRIs and literals can be synchronized. Blank nodes cannot be \
             matched across requests; skolemize them into IRIs first."
        )
    )]
    UnsupportedTerm { term: String },

    #[error("RDF parse error: {message}")]
    #[diagnostic(
        code(ngsync::graph::parse),
        help("Input files must be N-Triples, one statement per line.")
    )]
    Parse { message: String },

    #[error("I/O error: {source}")]
    #[diagnostic(
        code(ngsync::graph::io),
        help("Check that the file exists and that you have read/write permissions.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("transport error talking to {endpoint}: {message}")]
    #[diagnostic(
        code(ngsync::store::transport),
        help(
            "The store could not be reached. Check the URL, your network connection, \
             and that the service is up."
        )
    )]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} answered HTTP {code}: {body}")]
    #[diagnostic(
        code(ngsync::store::status),
        help(
            "The store rejected the request. A 401/403 usually means the email or \
             password is wrong or the account lacks SPARQL API rights; a 400 points \
             at malformed SPARQL."
        )
    )]
    Status {
        endpoint: String,
        code: u16,
        body: String,
    },

    #[error("unexpected response from store: {message}")]
    #[diagnostic(
        code(ngsync::store::response),
        help("The query endpoint must answer with SPARQL 1.1 JSON results.")
    )]
    Response { message: String },

    #[error("store backend error: {message}")]
    #[diagnostic(
        code(ngsync::store::backend),
        help("The embedded oxigraph store failed. Check the data directory and disk space.")
    )]
    Backend { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("batch size must be at least 1")]
    #[diagnostic(
        code(ngsync::config::batch_size),
        help(
            "Set `sync.batch_size` (or NGSYNC_BATCH_SIZE) to a positive number; 500 is the default."
        )
    )]
    InvalidBatchSize,

    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(ngsync::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(ngsync::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("missing required setting `{key}`")]
    #[diagnostic(
        code(ngsync::config::missing),
        help("Set it in the config file or through the matching environment variable.")
    )]
    Missing { key: String },

    #[error("invalid value for `{key}`: {message}")]
    #[diagnostic(code(ngsync::config::invalid_value))]
    InvalidValue { key: String, message: String },

    #[error("cannot determine home directory")]
    #[diagnostic(
        code(ngsync::config::no_home),
        help("Set the HOME environment variable or pass --config explicitly.")
    )]
    NoHome,
}

/// Result alias for graph-model operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;
/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
/// Result alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
/// Result alias for a whole synchronization run.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
