//! URL helpers for building generation endpoints.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use folio::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://api.example.com/v1beta/"), "https://api.example.com/v1beta");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Build the URL of a model-scoped method, e.g. `models/<model>:generateContent`.
///
/// Accepts model ids with or without the `models/` prefix.
///
/// ```
/// use folio::utils::url::model_method_url;
///
/// assert_eq!(
///     model_method_url("https://api.example.com/v1beta/", "gemini-2.5-flash", "generateContent"),
///     "https://api.example.com/v1beta/models/gemini-2.5-flash:generateContent"
/// );
/// ```
pub fn model_method_url(base_url: &str, model: &str, method: &str) -> String {
    let model = model.trim_matches('/');
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("{}/models/{}:{}", normalize_base_url(base_url), model, method)
}
