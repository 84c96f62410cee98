use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
    pub description: String,
    pub default: Option<Value>,
    #[serde(rename = "enum")]
    pub allowed_values: Option<Vec<Value>>,
}

impl EndpointParameter {
    pub fn required(name: impl Into<String>, param_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            required: true,
            description: description.into(),
            default: None,
            allowed_values: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
        default: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            required: false,
            description: description.into(),
            default,
            allowed_values: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointExample {
    pub name: String,
    pub description: String,
    pub request: Option<Value>,
    pub response: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub requests: u32,
    /// e.g. "1m", "1h", "1d".
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub description: String,
    pub parameters: Option<Vec<EndpointParameter>>,
    pub request_body: Option<Value>,
    pub response_schema: Option<Value>,
    pub examples: Option<Vec<EndpointExample>>,
    pub authentication: Option<Vec<String>>,
    pub rate_limit: Option<RateLimit>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            description: description.into(),
            parameters: None,
            request_body: None,
            response_schema: None,
            examples: None,
            authentication: None,
            rate_limit: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<EndpointParameter>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_request_body(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_example(mut self, example: EndpointExample) -> Self {
        self.examples.get_or_insert_with(Vec::new).push(example);
        self
    }

    pub fn with_authentication(mut self, schemes: &[&str]) -> Self {
        self.authentication = Some(schemes.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_rate_limit(mut self, requests: u32, period: impl Into<String>) -> Self {
        self.rate_limit = Some(RateLimit {
            requests,
            period: period.into(),
        });
        self
    }

    /// Names of the parameters a caller must supply.
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .flatten()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// `:name` segments in the declared path match any single segment of `path`.
    pub fn matches(&self, path: &str, method: HttpMethod) -> bool {
        if self.method != method {
            return false;
        }
        let declared: Vec<&str> = self.path.trim_matches('/').split('/').collect();
        let requested: Vec<&str> = path.trim_matches('/').split('/').collect();

        declared.len() == requested.len()
            && declared
                .iter()
                .zip(&requested)
                .all(|(d, r)| (d.starts_with(':') && !r.is_empty()) || d == r)
    }
}
