//! Common utility functions shared across the codebase.

/// Make a group name safe for use in a file name.
///
/// Every character outside `[A-Za-z0-9.\-_]` becomes `-`.
///
/// # Examples
///
/// ```
/// use keymangle::utils::sanitize_group_name;
///
/// assert_eq!(sanitize_group_name("main"), "main");
/// assert_eq!(sanitize_group_name("pages/home page"), "pages-home-page");
/// assert_eq!(sanitize_group_name("vendor~app.1"), "vendor-app.1");
/// ```
pub fn sanitize_group_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Render a path with `/` separators regardless of platform.
pub fn to_unit_id(path: &std::path::Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
