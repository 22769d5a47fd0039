//! Tab-completion helpers.

/// Keep the candidates that start with `prefix`, in their given order.
pub fn complete_token<S: AsRef<str>>(candidates: &[S], prefix: &str) -> Vec<String> {
    candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| c.starts_with(prefix))
        .map(String::from)
        .collect()
}
