/// Pick a display name: explicit name wins, then a resolved page title, then
/// a generated one. Blank strings count as absent. Never returns empty.
pub fn resolve_name<F>(explicit: Option<&str>, title: Option<&str>, random: F) -> String
where
    F: FnOnce() -> String,
{
    if let Some(name) = non_blank(explicit) {
        return name.to_string();
    }
    if let Some(title) = non_blank(title) {
        return title.to_string();
    }
    let generated = random();
    if generated.trim().is_empty() {
        // The generator is an external collaborator; guard the invariant anyway.
        "download".to_string()
    } else {
        generated
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
