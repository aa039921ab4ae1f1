//! Build matrix expansion

/// Expand declared tags into the tags actually published
///
/// Each tag is followed by its dated variant `<tag>-<revision>`. Neither part
/// is escaped, so `a-b` with revision `c-d` and `a` with revision `b-c-d`
/// both produce `a-b-c-d`.
pub fn expand_tags(tags: &[String], revision: &str) -> Vec<String> {
    tags.iter()
        .flat_map(|tag| [tag.clone(), format!("{}-{}", tag, revision)])
        .collect()
}
