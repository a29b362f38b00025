use indexmap::IndexMap;

use crate::ids::RequestId;

/// An incoming request as seen by the dispatcher.
///
/// Exposes the full request path, the deployment context prefix and a map from
/// parameter name to one or more string values. Parameter order and value order are
/// preserved as received.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    id: RequestId,
    path: String,
    context_path: String,
    params: IndexMap<String, Vec<String>>,
}

impl Request {
    /// Request for `path` with no context prefix and no parameters.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            path: path.into(),
            context_path: String::new(),
            params: IndexMap::new(),
        }
    }

    /// Build a request from a path that may carry a query string
    /// (e.g. `/app/add?a=2&b=3`).
    pub fn from_uri(uri: &str) -> Self {
        let (path, _) = uri.split_once('?').unwrap_or((uri, ""));
        let mut req = Self::new(path);
        req.params = parse_query_params(uri);
        req
    }

    #[must_use]
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    /// Append a value for `name`. Repeated names accumulate values.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: RequestId) -> Self {
        self.id = id;
        self
    }

    /// Adopt a correlation id supplied by the transport, keeping a fresh one when
    /// the value is missing or not a ULID.
    #[must_use]
    pub fn with_supplied_id(self, supplied: Option<&str>) -> Self {
        self.with_id(RequestId::from_supplied_or_new(supplied))
    }

    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Full request path, context prefix included.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    #[must_use]
    pub fn parameter_map(&self) -> &IndexMap<String, Vec<String>> {
        &self.params
    }

    /// First value of `name`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Parse query string parameters from a URL path
///
/// Extracts everything after the `?` character and URL-decodes parameter names and values.
/// Repeated names keep every value in the order received.
///
/// # Arguments
///
/// * `path` - The full URL path (e.g., `/users?limit=10&offset=20`)
pub fn parse_query_params(path: &str) -> IndexMap<String, Vec<String>> {
    let mut params: IndexMap<String, Vec<String>> = IndexMap::new();
    if let Some((_, query)) = path.split_once('?') {
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            params.entry(k.into_owned()).or_default().push(v.into_owned());
        }
    }
    params
}
