use std::collections::BTreeMap;

/// Key-value mapping handed to processors alongside each mutation event.
///
/// A context is attached per call through
/// [`ModelController::set_context`](crate::ModelController::set_context);
/// mutations issued directly on a controller see an empty one. `BTreeMap`
/// keeps iteration order stable for logging and assertions.
pub type Context = BTreeMap<String, serde_json::Value>;

/// Shared empty context for mutations issued without a scope.
pub(crate) static EMPTY_CONTEXT: Context = Context::new();
