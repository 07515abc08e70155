//! Favicon source templates

const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// Candidate favicon URLs for `domain`, in probe order
pub fn candidate_urls<'a>(templates: &'a [String], domain: &'a str) -> impl Iterator<Item = String> + 'a {
    templates
        .iter()
        .map(move |template| template.replace(DOMAIN_PLACEHOLDER, domain))
}
