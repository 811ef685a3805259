//! Flavor-agnostic model of an `api_gateway` build meta entry
//!
//! One logical API definition is expanded into resource nodes (one per path
//! segment, shared between paths) and methods. Each flavor then maps the
//! model onto its own primitive resources.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::domain::entities::AttributeReader;
use crate::error::TransformResult;

pub const DEFAULT_STAGE: &str = "prod";
pub const CATCH_ALL_METHOD: &str = "ANY";

const HTTP_METHODS: [&str; 8] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "ANY"];

const CORS_ALLOW_HEADERS: &str = "'Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token'";

/// One path segment of the resource tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResourceNode {
    /// Full path, e.g. `/users/{id}`
    pub path: String,
    /// Parent path; `None` when the parent is the API root
    pub parent: Option<String>,
    /// Last segment, e.g. `{id}`
    pub path_part: String,
}

/// Backend an API method forwards to
#[derive(Debug, Clone, PartialEq)]
pub enum Integration {
    Lambda { function: String, proxy: bool },
    Mock,
    Http { uri: String, method: String },
    Service { uri: String, method: String },
}

impl Integration {
    /// API Gateway integration type
    pub fn integration_type(&self) -> &'static str {
        match self {
            Integration::Lambda { proxy: true, .. } => "AWS_PROXY",
            Integration::Lambda { proxy: false, .. } | Integration::Service { .. } => "AWS",
            Integration::Mock => "MOCK",
            Integration::Http { .. } => "HTTP",
        }
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self, Integration::Lambda { proxy: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodResponse {
    pub status_code: String,
    /// `method.response.header.X` -> required flag
    pub response_parameters: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResponse {
    pub status_code: String,
    pub selection_pattern: Option<String>,
    /// `method.response.header.X` -> mapping expression
    pub response_parameters: Map<String, Value>,
    pub response_templates: Map<String, Value>,
}

/// One HTTP method on one path
#[derive(Debug, Clone, PartialEq)]
pub struct ApiMethod {
    pub path: String,
    pub http_method: String,
    pub authorization: String,
    pub api_key_required: bool,
    pub request_parameters: Map<String, Value>,
    pub request_templates: Map<String, Value>,
    pub integration: Integration,
    pub responses: Vec<MethodResponse>,
    pub integration_responses: Vec<IntegrationResponse>,
}

/// Expanded API definition
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSpec {
    pub name: String,
    pub stage: String,
    pub resources: Vec<ApiResourceNode>,
    pub methods: Vec<ApiMethod>,
}

impl ApiSpec {
    /// Parse an `api_gateway` entry
    pub fn parse(name: &str, attrs: &AttributeReader<'_>) -> TransformResult<Self> {
        let stage = attrs
            .str_any(&["deploy_stage", "stage_name"])?
            .unwrap_or(DEFAULT_STAGE)
            .to_string();

        let mut nodes: IndexMap<String, ApiResourceNode> = IndexMap::new();
        let mut methods = Vec::new();

        if let Some(paths) = attrs.object("resources")? {
            for (path, definition) in paths {
                let Value::Object(definition) = definition else {
                    return Err(attrs.invalid(
                        "resources",
                        format!("path '{}' must map to an object", path),
                    ));
                };
                let path = normalize_path(path);
                add_nodes(&mut nodes, &path);

                let path_attrs = attrs.child(definition);
                let mut has_options = false;
                for (key, method_definition) in definition {
                    let http_method = key.to_ascii_uppercase();
                    if !HTTP_METHODS.contains(&http_method.as_str()) {
                        continue;
                    }
                    let Value::Object(method_definition) = method_definition else {
                        return Err(attrs.invalid(
                            key,
                            format!("method {} on '{}' must be an object", http_method, path),
                        ));
                    };
                    has_options |= http_method == "OPTIONS";
                    methods.push(parse_method(
                        &path,
                        &http_method,
                        &attrs.child(method_definition),
                    )?);
                }

                if path_attrs.flag("enable_cors")? && !has_options {
                    methods.push(cors_preflight(&path, definition));
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            stage,
            resources: nodes.into_values().collect(),
            methods,
        })
    }

    /// Lambda functions invoked by any method, without duplicates
    pub fn invoked_functions(&self) -> Vec<&str> {
        let mut functions: Vec<&str> = Vec::new();
        for method in &self.methods {
            if let Integration::Lambda { function, .. } = &method.integration {
                if !functions.contains(&function.as_str()) {
                    functions.push(function);
                }
            }
        }
        functions
    }
}

/// Leading slash, no trailing slash; `/` stays the root
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{}", trimmed)
}

fn add_nodes(nodes: &mut IndexMap<String, ApiResourceNode>, path: &str) {
    let mut parent: Option<String> = None;
    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current.push('/');
        current.push_str(segment);
        nodes
            .entry(current.clone())
            .or_insert_with(|| ApiResourceNode {
                path: current.clone(),
                parent: parent.clone(),
                path_part: segment.to_string(),
            });
        parent = Some(current.clone());
    }
}

fn parse_method(
    path: &str,
    http_method: &str,
    attrs: &AttributeReader<'_>,
) -> TransformResult<ApiMethod> {
    let integration = parse_integration(http_method, attrs)?;

    let mut responses = Vec::new();
    for response in attrs.objects("responses")? {
        responses.push(MethodResponse {
            status_code: status_code(&response)?,
            response_parameters: response
                .object("response_parameters")?
                .cloned()
                .unwrap_or_default(),
        });
    }
    if responses.is_empty() {
        responses.push(MethodResponse {
            status_code: "200".to_string(),
            response_parameters: Map::new(),
        });
    }

    let mut integration_responses = Vec::new();
    for response in attrs.objects("integration_responses")? {
        integration_responses.push(IntegrationResponse {
            status_code: status_code(&response)?,
            selection_pattern: response
                .str_any(&["error_regex", "selection_pattern"])?
                .map(str::to_string),
            response_parameters: response
                .object("response_parameters")?
                .cloned()
                .unwrap_or_default(),
            response_templates: response
                .object("response_templates")?
                .cloned()
                .unwrap_or_default(),
        });
    }
    if integration_responses.is_empty() && !integration.is_proxy() {
        integration_responses.push(IntegrationResponse {
            status_code: "200".to_string(),
            selection_pattern: None,
            response_parameters: Map::new(),
            response_templates: Map::new(),
        });
    }

    let mut request_templates = attrs
        .object("integration_request_body_template")?
        .cloned()
        .unwrap_or_default();
    if request_templates.is_empty() && integration == Integration::Mock {
        request_templates.insert(
            "application/json".to_string(),
            Value::String("{\"statusCode\": 200}".to_string()),
        );
    }

    Ok(ApiMethod {
        path: path.to_string(),
        http_method: http_method.to_string(),
        authorization: attrs
            .str("authorization_type")?
            .unwrap_or("NONE")
            .to_string(),
        api_key_required: attrs.flag("api_key_required")?,
        request_parameters: attrs
            .object("method_request_parameters")?
            .cloned()
            .unwrap_or_default(),
        request_templates,
        integration,
        responses,
        integration_responses,
    })
}

fn parse_integration(http_method: &str, attrs: &AttributeReader<'_>) -> TransformResult<Integration> {
    let integration_type = attrs.str("integration_type")?.unwrap_or("mock");
    match integration_type {
        "lambda" => Ok(Integration::Lambda {
            function: attrs.required_str("lambda_name")?.to_string(),
            proxy: attrs.flag("enable_proxy")?,
        }),
        "mock" => Ok(Integration::Mock),
        "http" => Ok(Integration::Http {
            uri: attrs.required_str("uri")?.to_string(),
            method: attrs
                .str("integration_method")?
                .unwrap_or(http_method)
                .to_string(),
        }),
        "service" => Ok(Integration::Service {
            uri: attrs.required_str("uri")?.to_string(),
            method: attrs
                .str("integration_method")?
                .unwrap_or("POST")
                .to_string(),
        }),
        other => Err(attrs.invalid(
            "integration_type",
            format!(
                "unknown integration type '{}' (expected lambda, mock, http or service)",
                other
            ),
        )),
    }
}

fn status_code(response: &AttributeReader<'_>) -> TransformResult<String> {
    match response.value("status_code") {
        Some(Value::String(code)) => Ok(code.clone()),
        Some(Value::Number(code)) => Ok(code.to_string()),
        Some(other) => Err(response.invalid(
            "status_code",
            format!("expected a status code, got {}", other),
        )),
        None => Err(response.missing("status_code")),
    }
}

/// Mock `OPTIONS` method answering CORS preflight requests for `path`
fn cors_preflight(path: &str, definition: &Map<String, Value>) -> ApiMethod {
    let mut allowed: Vec<String> = definition
        .keys()
        .map(|k| k.to_ascii_uppercase())
        .filter(|m| HTTP_METHODS.contains(&m.as_str()))
        .collect();
    allowed.push("OPTIONS".to_string());

    let header = |name: &str| format!("method.response.header.Access-Control-Allow-{}", name);

    let mut response_parameters = Map::new();
    let mut integration_parameters = Map::new();
    for (name, value) in [
        ("Headers", CORS_ALLOW_HEADERS.to_string()),
        ("Methods", format!("'{}'", allowed.join(","))),
        ("Origin", "'*'".to_string()),
    ] {
        response_parameters.insert(header(name), Value::Bool(true));
        integration_parameters.insert(header(name), Value::String(value));
    }

    let mut request_templates = Map::new();
    request_templates.insert(
        "application/json".to_string(),
        json!("{\"statusCode\": 200}"),
    );

    ApiMethod {
        path: path.to_string(),
        http_method: "OPTIONS".to_string(),
        authorization: "NONE".to_string(),
        api_key_required: false,
        request_parameters: Map::new(),
        request_templates,
        integration: Integration::Mock,
        responses: vec![MethodResponse {
            status_code: "200".to_string(),
            response_parameters,
        }],
        integration_responses: vec![IntegrationResponse {
            status_code: "200".to_string(),
            selection_pattern: None,
            response_parameters: integration_parameters,
            response_templates: Map::new(),
        }],
    }
}
