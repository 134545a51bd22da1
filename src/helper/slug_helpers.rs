/// Derives a URL-safe slug from a title: lowercase, every run of
/// non-alphanumeric characters collapsed into a single hyphen, no leading
/// or trailing hyphen.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    // Starts true so a leading non-alphanumeric run emits no hyphen.
    let mut pending_hyphen = true;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            pending_hyphen = false;
        } else if !pending_hyphen {
            slug.push('-');
            pending_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
