use crate::core::error::DocumentError;
use crate::core::manifest::access::{get_seq_mut, get_str};
use crate::core::manifest::node::Node;
use crate::core::types::TemplateRef;

/// Insert `job` right after the first job group named `anchor`.
///
/// Returns the index the new job landed at. Every other element keeps its
/// relative order.
pub fn insert_after_anchor(
    jobs: &mut Vec<Node>,
    anchor: &str,
    job: Node,
) -> Result<usize, DocumentError> {
    let mut position = None;
    for (index, existing) in jobs.iter().enumerate() {
        if get_str(existing, "name")? == anchor {
            position = Some(index + 1);
            break;
        }
    }
    let position = position.ok_or_else(|| DocumentError::AnchorNotFound {
        anchor: anchor.to_string(),
    })?;
    jobs.insert(position, job);
    Ok(position)
}

/// Indices of the job groups whose `name` starts with `prefix`, in document order.
///
/// Every job must carry a string `name`; one that does not fails the whole
/// selection.
pub fn select_by_prefix(jobs: &[Node], prefix: &str) -> Result<Vec<usize>, DocumentError> {
    let mut matches = Vec::new();
    for (index, job) in jobs.iter().enumerate() {
        if get_str(job, "name")?.starts_with(prefix) {
            matches.push(index);
        }
    }
    Ok(matches)
}

pub fn template_node(template: &TemplateRef) -> Node {
    Node::map_of([
        ("name", Node::from(template.name)),
        ("release", Node::from(template.release)),
    ])
}

/// Append template references to the end of a job's `templates`.
///
/// Appends are unconditional: a reference already present is added again.
pub fn append_templates(job: &mut Node, templates: &[TemplateRef]) -> Result<(), DocumentError> {
    let existing = get_seq_mut(job, "templates")?;
    existing.extend(templates.iter().map(template_node));
    Ok(())
}
