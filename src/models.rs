use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by the list endpoint.
///
/// # Filtering
/// The `filter` parameter is a JSON-encoded document whose fields come from
/// the resource's derived filter schema: each integer column `c` accepts `c`,
/// `c_lt` and `c_gt`, each text column `c` accepts `c` and `c_like`, for
/// example:
/// ```json
/// {"age_gt": 100, "name_like": "pond"}
/// ```
/// Fields set to `null` are ignored; fields outside the schema are rejected
/// with a 422.
///
/// # Pagination
/// Standard REST format with 1-based page numbers: `page=1&per_page=10`.
#[derive(Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// JSON-encoded filter document validated against the resource's filter
    /// schema.
    ///
    /// Example: `{"age_gt": 100, "name_like": "pond"}`
    #[param(example = json!({"age_gt": 100, "name_like": "pond"}))]
    pub filter: Option<String>,
    /// Page number for standard REST pagination (1-based).
    ///
    /// Example: `1`
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Number of items per page for standard REST pagination.
    ///
    /// Example: `10`
    #[param(example = 10)]
    pub per_page: Option<u64>,
}
