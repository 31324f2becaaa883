//! ARN construction.
//!
//! Kept as a pure function rather than a fluent builder type, since this
//! store only ever constructs the single AWS-IAM-compatible shape:
//! `arn:aws:iam:<root_id>:user[/<path>]/<name>`.

/// Builds the ARN for an IAM user (or root account) identified by `name`,
/// owned by the root account `root_id`, at the given `iam_path`.
pub fn user_arn(root_id: &str, iam_path: &str, name: &str) -> String {
    let trimmed_path = iam_path.trim_start_matches('/').trim_end_matches('/');
    if trimmed_path.is_empty() {
        format!("arn:aws:iam:{root_id}:user/{name}")
    } else {
        format!("arn:aws:iam:{root_id}:user/{trimmed_path}/{name}")
    }
}
