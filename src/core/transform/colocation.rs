use crate::core::config::ConnetConfig;
use crate::core::error::DocumentError;
use crate::core::manifest::access::{get, get_mut, get_seq, get_seq_mut, get_str, set, walk};
use crate::core::manifest::collections::{append_templates, select_by_prefix};
use crate::core::manifest::Node;
use crate::core::transform::{TransformInputs, Transformer, SUBSYSTEM_RELEASE};
use crate::core::types::TemplateRef;

pub const CELL_PREFIX: &str = "cell_z";
pub const COLOCATED_PREFIX: &str = "colocated_z";
pub const CC_BRIDGE_PREFIX: &str = "cc_bridge_z";

const NATS_PATH: &str = "properties.diego.route_emitter.nats";

const DUCATI: TemplateRef = TemplateRef::new("ducati", SUBSYSTEM_RELEASE);
const CONNET: TemplateRef = TemplateRef::new("connet", SUBSYSTEM_RELEASE);
const ROUTE_REGISTRAR: TemplateRef = TemplateRef::new("route_registrar", "cf");

const CELL_TEMPLATES: &[TemplateRef] = &[DUCATI];
// colocated VMs host connet alongside ducati, and connet needs its route registered
const COLOCATED_TEMPLATES: &[TemplateRef] = &[DUCATI, CONNET, ROUTE_REGISTRAR];
const CC_BRIDGE_TEMPLATES: &[TemplateRef] = &[CONNET, ROUTE_REGISTRAR];

pub(super) fn colocate_cells(
    _transformer: &Transformer,
    manifest: &mut Node,
    _inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    colocate_templates(manifest, CELL_PREFIX, CELL_TEMPLATES)
}

pub(super) fn colocate_colocated_vms(
    _transformer: &Transformer,
    manifest: &mut Node,
    _inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    colocate_templates(manifest, COLOCATED_PREFIX, COLOCATED_TEMPLATES)
}

/// Append `templates` to every job group whose name starts with `prefix`.
///
/// A malformed job aborts the pass; jobs already visited keep their new templates.
fn colocate_templates(
    manifest: &mut Node,
    prefix: &str,
    templates: &[TemplateRef],
) -> Result<(), DocumentError> {
    let jobs = get_seq_mut(manifest, "jobs")?;
    let matches = select_by_prefix(jobs.as_slice(), prefix)?;
    tracing::debug!(prefix, matched = matches.len(), "colocating templates");
    for index in matches {
        let job = &mut jobs[index];
        let name = get_str(job, "name")?.to_string();
        append_templates(job, templates).map_err(|err| DocumentError::in_job(name, err))?;
    }
    Ok(())
}

/// Colocate connet onto every cc_bridge job group.
///
/// Each match gets a copy of the route emitter's NATS credentials, a
/// route_registrar block for `connet.<domain>`, and the connet and
/// route_registrar templates.
pub(super) fn colocate_cc_bridges(
    transformer: &Transformer,
    manifest: &mut Node,
    inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    let matches = select_by_prefix(get_seq(manifest, "jobs")?, CC_BRIDGE_PREFIX)?;
    tracing::debug!(prefix = CC_BRIDGE_PREFIX, matched = matches.len(), "colocating connet");
    if matches.is_empty() {
        return Ok(());
    }

    let domain = inputs
        .system_domain
        .ok_or(DocumentError::MissingInput("system domain for route registration"))?;
    let nats = walk(manifest, NATS_PATH)?.clone();
    let route_registrar = route_registrar_properties(&transformer.config().connet, domain);

    let jobs = get_seq_mut(manifest, "jobs")?;
    for index in matches {
        let job = &mut jobs[index];
        let name = get_str(job, "name")?.to_string();
        attach_connet(job, &nats, &route_registrar)
            .map_err(|err| DocumentError::in_job(name, err))?;
    }
    Ok(())
}

fn attach_connet(job: &mut Node, nats: &Node, route_registrar: &Node) -> Result<(), DocumentError> {
    let properties = ensure_properties(job)?;
    set(properties, "nats", nats.clone())?;
    set(properties, "route_registrar", route_registrar.clone())?;
    append_templates(job, CC_BRIDGE_TEMPLATES)
}

/// The job's `properties` mapping, created empty when absent or null.
fn ensure_properties(job: &mut Node) -> Result<&mut Node, DocumentError> {
    match get(job, "properties") {
        Ok(Node::Null) | Err(DocumentError::MissingKey(_)) => {
            set(job, "properties", Node::map())?
        }
        Ok(_) => {}
        Err(err) => return Err(err),
    }
    let properties = get_mut(job, "properties")?;
    if !properties.is_mapping() {
        return Err(DocumentError::Unpack {
            found: properties.kind(),
        });
    }
    Ok(properties)
}

fn route_registrar_properties(connet: &ConnetConfig, domain: &str) -> Node {
    let route = Node::map_of([
        ("name", Node::from("connet")),
        (
            "registration_interval",
            Node::from(connet.registration_interval.as_str()),
        ),
        ("port", Node::from(connet.port)),
        (
            "uris",
            Node::seq_of([Node::from(format!("{}.{}", connet.subdomain, domain))]),
        ),
    ]);
    Node::map_of([("routes", Node::seq_of([route]))])
}
