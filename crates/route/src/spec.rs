//! Route declarations.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use routeguard_parameter::prelude::{DeclarationError, ParamLocation, ParamSchema, RequestValidator};
use serde::{Deserialize, Serialize};

use crate::method::Method;
use crate::response::ResponseSpec;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// How the body parameters arrive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    /// A JSON object whose top-level fields are the body parameters.
    #[default]
    Json,
    /// `multipart/form-data` fields and file uploads.
    Multipart,
}

impl BodyKind {
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Multipart => "multipart/form-data",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Multipart => "multipart",
        })
    }
}

/// Everything declared about one route: where it lives, what it accepts and
/// what it answers.
///
/// The same declaration drives request validation
/// ([`bind`](RouteSpec::bind)) and the generated documentation
/// ([`to_documentation`](RouteSpec::to_documentation)).
///
/// # Examples
///
/// ```
/// use routeguard_route::prelude::*;
///
/// let spec = RouteSpec::new("/ping", "ping test")
///     .query(ParamSchema::string("fruit").with_description("what fruit like?"))
///     .response(ResponseSpec::message(200, "success"));
///
/// assert!(spec.check().is_ok());
/// assert_eq!(spec.to_documentation()["tags"][0], "/ping");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    pub path: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub method: Method,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_params: Vec<ParamSchema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_params: Vec<ParamSchema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<ParamSchema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_params: Vec<ParamSchema>,

    #[serde(default)]
    pub body_kind: BodyKind,

    #[serde(default = "default_body_name")]
    pub body_name: String,

    #[serde(default = "default_body_description")]
    pub body_description: String,

    #[serde(default)]
    pub responses: Vec<ResponseSpec>,
}

fn located(
    location: ParamLocation,
    params: &[ParamSchema],
) -> impl Iterator<Item = (ParamLocation, &ParamSchema)> {
    params.iter().map(move |p| (location, p))
}

fn default_body_name() -> String {
    "body".to_owned()
}

fn default_body_description() -> String {
    "body data".to_owned()
}

impl RouteSpec {
    #[must_use]
    pub fn new(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
            method: Method::Get,
            header_params: Vec::new(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            body_params: Vec::new(),
            body_kind: BodyKind::Json,
            body_name: default_body_name(),
            body_description: default_body_description(),
            responses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn header(mut self, param: ParamSchema) -> Self {
        self.header_params.push(param);
        self
    }

    #[must_use]
    pub fn path_param(mut self, param: ParamSchema) -> Self {
        self.path_params.push(param);
        self
    }

    #[must_use]
    pub fn query(mut self, param: ParamSchema) -> Self {
        self.query_params.push(param);
        self
    }

    #[must_use]
    pub fn body(mut self, param: ParamSchema) -> Self {
        self.body_params.push(param);
        self
    }

    #[must_use]
    pub fn with_body_kind(mut self, kind: BodyKind) -> Self {
        self.body_kind = kind;
        self
    }

    /// Name and description of the JSON body block in the documentation.
    #[must_use]
    pub fn with_body_block(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.body_name = name.into();
        self.body_description = description.into();
        self
    }

    #[must_use]
    pub fn response(mut self, response: ResponseSpec) -> Self {
        self.responses.push(response);
        self
    }

    /// Every parameter with its location, in header, path, query, body order.
    pub fn params(&self) -> impl Iterator<Item = (ParamLocation, &ParamSchema)> {
        located(ParamLocation::Header, &self.header_params)
            .chain(located(ParamLocation::Path, &self.path_params))
            .chain(located(ParamLocation::Query, &self.query_params))
            .chain(located(ParamLocation::Body, &self.body_params))
    }

    /// Names of the `{placeholder}`s in the path, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        PLACEHOLDER
            .captures_iter(&self.path)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Runs every declaration check without binding a handler.
    pub fn check(&self) -> Result<(), DeclarationError> {
        self.compile().map(|_| ())
    }

    /// Checks the declaration and builds its validator and path matcher.
    pub(crate) fn compile(&self) -> Result<(RequestValidator, Regex), DeclarationError> {
        let validator = RequestValidator::new(
            self.params()
                .map(|(location, param)| (location, param.clone())),
        )?;

        for param in &self.path_params {
            if !self.placeholders().any(|name| name == param.name) {
                return Err(DeclarationError::UnknownPathParameter {
                    name: param.name.clone(),
                    path: self.path.clone(),
                });
            }
        }

        Ok((validator, self.matcher()?))
    }

    /// Anchored regex matching concrete paths, one named group per
    /// placeholder.
    fn matcher(&self) -> Result<Regex, DeclarationError> {
        if !self.path.starts_with('/') {
            return Err(DeclarationError::InvalidPath {
                path: self.path.clone(),
                reason: "must start with `/`".to_owned(),
            });
        }

        let mut pattern = String::from("^");
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(&self.path) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            pattern.push_str(&regex::escape(&self.path[last..whole.start()]));
            pattern.push_str(&format!("(?P<{}>[^/]+)", name.as_str()));
            last = whole.end();
        }
        pattern.push_str(&regex::escape(&self.path[last..]));
        pattern.push('$');

        Regex::new(&pattern).map_err(|e| DeclarationError::InvalidPath {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}
