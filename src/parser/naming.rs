use crate::record::NameParts;

/// Keeps alphanumerics, spaces and hyphens, then turns spaces into `_`.
pub(crate) fn clean_part(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

/// `school_student_title_theme_zip`, skipping empty parts. Theme goes in
/// verbatim; the postal code only when it is all digits. Returns `fallback`
/// untouched when nothing is left.
pub fn derive_filename(parts: &NameParts<'_>, fallback: &str) -> String {
    let mut out: Vec<String> = [parts.school, parts.student, parts.title]
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| clean_part(p))
        .filter(|p| !p.is_empty())
        .collect();

    if !parts.theme.is_empty() {
        out.push(parts.theme.to_string());
    }
    if !parts.postal_code.is_empty() && parts.postal_code.bytes().all(|b| b.is_ascii_digit()) {
        out.push(parts.postal_code.to_string());
    }

    if out.is_empty() {
        fallback.to_string()
    } else {
        out.join("_")
    }
}
