use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifies one API operation: the GraphQL-style `(typeName, fieldName)`
/// pair. Unique per registry; maps to exactly one resolver binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub type_name: String,
    pub field_name: String,
}

impl OperationKey {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl std::fmt::Display for OperationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

/// The kind of backend a data source points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    /// Relational engine; batches execute sequentially inside one
    /// transaction.
    Relational,
    /// Key-value store; exactly one statement per batch.
    KeyValue,
    /// Out-of-process compute function invoked by name.
    Function,
}

/// The authenticated principal attached to an invocation, as established
/// by the upstream gateway. Absent for unauthenticated operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub claims: Map<String, Value>,
}

/// The inbound wire form of an operation invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub type_name: String,
    pub field_name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    /// Parent object for nested field resolution.
    #[serde(default)]
    pub source: Option<Map<String, Value>>,
    #[serde(default)]
    pub identity: Option<Identity>,
}

impl Invocation {
    pub fn operation_key(&self) -> OperationKey {
        OperationKey::new(&self.type_name, &self.field_name)
    }
}

/// Per-invocation context that placeholders resolve against. Created per
/// request, discarded after the response.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub arguments: Map<String, Value>,
    pub source: Option<Map<String, Value>>,
    pub identity: Option<Identity>,
}

impl RequestContext {
    pub fn new(
        arguments: Map<String, Value>,
        source: Option<Map<String, Value>>,
        identity: Option<Identity>,
    ) -> Self {
        Self {
            arguments,
            source,
            identity,
        }
    }

    /// Looks up a dotted argument path.
    ///
    /// The first segment selects the root: `source.` resolves against the
    /// parent object, `identity.` against the principal (`username`,
    /// `groups`, or a claim name), anything else against the caller
    /// arguments (an explicit `arguments.` prefix is also accepted).
    /// Returns `None` when any segment is missing.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;

        match first {
            "source" => walk(self.source.as_ref()?, segments),
            "identity" => {
                let identity = self.identity.as_ref()?;
                match segments.next()? {
                    "username" => Some(Value::String(identity.username.clone())),
                    "groups" => Some(Value::from(identity.groups.clone())),
                    claim => identity.claims.get(claim).cloned(),
                }
            }
            "arguments" => walk(&self.arguments, segments),
            _ => walk(&self.arguments, path.split('.')),
        }
    }

    /// The caller's username, when an identity is attached.
    pub fn username(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.username.as_str())
    }
}

fn walk<'a, I>(root: &Map<String, Value>, mut segments: I) -> Option<Value>
where
    I: Iterator<Item = &'a str>,
{
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current.clone())
}

impl From<Invocation> for RequestContext {
    fn from(invocation: Invocation) -> Self {
        Self {
            arguments: invocation.arguments,
            source: invocation.source,
            identity: invocation.identity,
        }
    }
}
