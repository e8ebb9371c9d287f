//! Short display forms for well-known GitHub URLs.
//!
//! Table footers show autolinks by a short name instead of the full URL.
//! Issue, pull request, discussion and commit URLs on github.com get their
//! conventional short form; everything else is left to the caller.

const KINDS: &[&str] = &["issue", "issues", "pull", "pulls", "discussion", "discussions"];
const PULL_KINDS: &[&str] = &["pull", "pulls"];
const MIN_SHA_LEN: usize = 7;

/// Returns the short form of a GitHub URL, or `None` if it has none.
///
/// ```rust
/// use glamour::autolink::detect;
///
/// assert_eq!(detect("https://github.com/owner/repo/pull/7").as_deref(), Some("owner/repo#7"));
/// assert_eq!(
///     detect("https://github.com/owner/repo/commit/abcdef0123").as_deref(),
///     Some("owner/repo@abcdef0")
/// );
/// assert_eq!(detect("https://example.com/owner/repo/pull/7"), None);
/// ```
pub fn detect(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))?;
    let (path, fragment) = match rest.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (rest, None),
    };
    let parts: Vec<&str> = path.split('/').collect();

    match parts.as_slice() {
        [owner, repo, kind, number] if is_name(owner) && is_name(repo) && is_number(number) => {
            if *kind == "commit" {
                return commit(owner, repo, number);
            }
            if !KINDS.contains(kind) {
                return None;
            }
            let base = format!("{owner}/{repo}#{number}");
            match fragment {
                None => Some(base),
                Some(f) if numbered(f, "issuecomment-") => Some(format!("{base} (comment)")),
                Some(f) if numbered(f, "discussion_r") && PULL_KINDS.contains(kind) => {
                    Some(format!("{base} (comment)"))
                }
                Some(f) if numbered(f, "pullrequestreview-") && PULL_KINDS.contains(kind) => {
                    Some(format!("{base} (review)"))
                }
                Some(f) if numbered(f, "discussioncomment-") && *kind == "discussions" => {
                    Some(format!("{base} (comment)"))
                }
                Some(_) => None,
            }
        }
        [owner, repo, "commit", sha] => commit(owner, repo, sha),
        [owner, repo, kind, number, "commits", sha]
            if PULL_KINDS.contains(kind) && is_number(number) =>
        {
            commit(owner, repo, sha)
        }
        _ => None,
    }
}

/// `owner/repo@sha7` for a commit path segment. Any fragment is allowed.
fn commit(owner: &str, repo: &str, sha: &str) -> Option<String> {
    if !is_name(owner) || !is_name(repo) {
        return None;
    }
    if sha.len() < MIN_SHA_LEN || !sha.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!("{owner}/{repo}@{}", &sha[..MIN_SHA_LEN]))
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn numbered(fragment: &str, prefix: &str) -> bool {
    fragment.strip_prefix(prefix).is_some_and(is_number)
}
