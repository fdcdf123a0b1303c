use crate::typed::Endpoint;
use http::Method;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Path parameters captured for one request.
///
/// Names are `Arc<str>` shared with the route table, values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(Arc<str>),
}

struct Route {
    method: Method,
    template: String,
    segments: Vec<Segment>,
    endpoint: Arc<dyn Endpoint>,
}

/// Successful route lookup
#[derive(Clone)]
pub struct RouteMatch {
    pub endpoint: Arc<dyn Endpoint>,
    /// Template the request matched, e.g. `/{key}`
    pub template: String,
    pub path_params: ParamVec,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("template", &self.template)
            .field("path_params", &self.path_params)
            .finish_non_exhaustive()
    }
}

/// Why a request could not be routed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No template matches the path
    NotFound,
    /// A template matches the path, but not for this method
    MethodNotAllowed { allowed: Vec<Method> },
}

impl RouteError {
    #[must_use]
    pub fn status(&self) -> http::StatusCode {
        match self {
            RouteError::NotFound => http::StatusCode::NOT_FOUND,
            RouteError::MethodNotAllowed { .. } => http::StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::NotFound => write!(f, "no route matches the request path"),
            RouteError::MethodNotAllowed { allowed } => {
                let names: Vec<&str> = allowed.iter().map(Method::as_str).collect();
                write!(f, "method not allowed, expected one of: {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for RouteError {}

/// Method + path-template router.
///
/// Templates are `/`-separated; a segment written `{name}` captures the
/// percent-decoded request segment under `name`. Routes are tried in
/// registration order.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Builder form of [`Router::add`]
    #[must_use]
    pub fn route<E>(mut self, method: Method, template: &str, endpoint: E) -> Self
    where
        E: Endpoint + 'static,
    {
        self.add(method, template, Arc::new(endpoint));
        self
    }

    /// Register `endpoint` for `method` on `template`
    pub fn add(&mut self, method: Method, template: &str, endpoint: Arc<dyn Endpoint>) {
        let segments = parse_template(template);
        info!(
            method = %method,
            template = %template,
            params = segments.iter().filter(|s| matches!(s, Segment::Param(_))).count(),
            "Route registered"
        );
        self.routes.push(Route {
            method,
            template: template.to_string(),
            segments,
            endpoint,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the endpoint for `method` and `path` (query string already stripped)
    ///
    /// # Errors
    ///
    /// [`RouteError::NotFound`] when no template matches the path,
    /// [`RouteError::MethodNotAllowed`] when one does but for other methods.
    pub fn match_route(&self, method: &Method, path: &str) -> Result<RouteMatch, RouteError> {
        let request_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut allowed = Vec::new();

        for route in &self.routes {
            let Some(path_params) = match_segments(&route.segments, &request_segments) else {
                continue;
            };
            if route.method != *method {
                allowed.push(route.method.clone());
                continue;
            }
            debug!(
                method = %method,
                path = %path,
                template = %route.template,
                "Route matched"
            );
            return Ok(RouteMatch {
                endpoint: Arc::clone(&route.endpoint),
                template: route.template.clone(),
                path_params,
            });
        }

        if allowed.is_empty() {
            Err(RouteError::NotFound)
        } else {
            Err(RouteError::MethodNotAllowed { allowed })
        }
    }
}

fn parse_template(template: &str) -> Vec<Segment> {
    template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) if !name.is_empty() => Segment::Param(Arc::from(name)),
            _ => Segment::Literal(s.to_string()),
        })
        .collect()
}

fn match_segments(template: &[Segment], request: &[&str]) -> Option<ParamVec> {
    if template.len() != request.len() {
        return None;
    }
    let mut params = ParamVec::new();
    for (segment, actual) in template.iter().zip(request) {
        match segment {
            Segment::Literal(lit) if lit == actual => {}
            Segment::Literal(_) => return None,
            Segment::Param(name) => {
                let value = urlencoding::decode(actual)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| (*actual).to_string());
                params.push((Arc::clone(name), value));
            }
        }
    }
    Some(params)
}
