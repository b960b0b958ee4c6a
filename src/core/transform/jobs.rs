use crate::core::error::DocumentError;
use crate::core::manifest::access::{append, get, get_mut, get_seq, get_seq_mut, get_str};
use crate::core::manifest::collections::{insert_after_anchor, template_node};
use crate::core::manifest::Node;
use crate::core::transform::{TransformInputs, Transformer, SUBSYSTEM_RELEASE};
use crate::core::types::TemplateRef;
use std::net::Ipv4Addr;

pub const DB_JOB_NAME: &str = "ducati_db";
pub const ACCEPTANCE_JOB_NAME: &str = "ducati-acceptance";

const DB_TEMPLATES: &[TemplateRef] = &[
    TemplateRef::new("postgres", SUBSYSTEM_RELEASE),
    TemplateRef::new("consul_agent", "cf"),
];
const ACCEPTANCE_TEMPLATES: &[TemplateRef] =
    &[TemplateRef::new("acceptance-with-cf", SUBSYSTEM_RELEASE)];

pub(super) fn update_releases(
    transformer: &Transformer,
    manifest: &mut Node,
    _inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    let releases = get_mut(manifest, "releases")?;
    append(
        releases,
        Node::map_of([
            ("name", Node::from(SUBSYSTEM_RELEASE)),
            (
                "version",
                Node::from(transformer.config().release_version.as_str()),
            ),
        ]),
    );
    Ok(())
}

/// Insert the ducati_db job after the configured anchor job.
///
/// The job gets a static address taken from the end of its network's first
/// static range, so the lookup fails before `jobs` is touched.
pub(super) fn add_db_job(
    transformer: &Transformer,
    manifest: &mut Node,
    _inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    let database = &transformer.config().database;
    let static_ip = last_static_ip(manifest, &database.network)?;

    let job = Node::map_of([
        ("name", Node::from(DB_JOB_NAME)),
        ("instances", Node::Int(1)),
        ("persistent_disk", Node::from(database.persistent_disk)),
        ("resource_pool", Node::from(database.resource_pool.as_str())),
        (
            "networks",
            Node::seq_of([Node::map_of([
                ("name", Node::from(database.network.as_str())),
                ("static_ips", Node::seq_of([Node::from(static_ip.to_string())])),
            ])]),
        ),
        (
            "templates",
            Node::seq_of(DB_TEMPLATES.iter().map(template_node)),
        ),
        ("properties", consul_service_properties()),
    ]);

    let jobs = get_seq_mut(manifest, "jobs")?;
    let index = insert_after_anchor(jobs, &database.anchor_job, job)?;
    tracing::debug!(index, ip = %static_ip, "placed {}", DB_JOB_NAME);
    Ok(())
}

/// Append the acceptance errand at the end of `jobs`.
pub(super) fn add_acceptance_job(
    transformer: &Transformer,
    manifest: &mut Node,
    _inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    let database = &transformer.config().database;
    let job = Node::map_of([
        ("name", Node::from(ACCEPTANCE_JOB_NAME)),
        ("instances", Node::Int(1)),
        ("lifecycle", Node::from("errand")),
        ("resource_pool", Node::from(database.resource_pool.as_str())),
        (
            "networks",
            Node::seq_of([Node::map_of([(
                "name",
                Node::from(database.network.as_str()),
            )])]),
        ),
        (
            "templates",
            Node::seq_of(ACCEPTANCE_TEMPLATES.iter().map(template_node)),
        ),
    ]);
    get_seq_mut(manifest, "jobs")?.push(job);
    Ok(())
}

fn consul_service_properties() -> Node {
    let service = Node::map_of([
        ("name", Node::from("ducati-db")),
        (
            "check",
            Node::map_of([
                ("script", Node::from("/bin/true")),
                ("interval", Node::from("5s")),
            ]),
        ),
    ]);
    Node::map_of([(
        "consul",
        Node::map_of([(
            "agent",
            Node::map_of([("services", Node::map_of([("ducati-db", service)]))]),
        )]),
    )])
}

/// Last address of the first static range declared for `network`.
fn last_static_ip(manifest: &Node, network: &str) -> Result<Ipv4Addr, DocumentError> {
    let networks = match get(manifest, "networks") {
        Ok(Node::Seq(items)) => items,
        Ok(other) => {
            return Err(DocumentError::NotSequence {
                key: "networks".to_string(),
                found: other.kind(),
            })
        }
        Err(DocumentError::MissingKey(_)) => {
            return Err(DocumentError::NotSequence {
                key: "networks".to_string(),
                found: "null",
            })
        }
        Err(err) => return Err(err),
    };

    let mut selected = None;
    for candidate in networks {
        if get_str(candidate, "name")? == network {
            selected = Some(candidate);
            break;
        }
    }
    let selected = selected.ok_or_else(|| DocumentError::MissingNetwork(network.to_string()))?;

    let subnet = get_seq(selected, "subnets")?
        .first()
        .ok_or(DocumentError::MissingInput("subnet on the database network"))?;
    let static_entry = get_seq(subnet, "static")?
        .first()
        .ok_or(DocumentError::MissingInput("static ip range on the database network"))?;
    let range = static_entry.as_str().ok_or_else(|| DocumentError::NotString {
        key: "static".to_string(),
        found: static_entry.kind(),
    })?;
    parse_range_end(range)
}

/// Upper bound of `"A.B.C.D - A.B.C.E"`, or the address itself for a single entry.
fn parse_range_end(range: &str) -> Result<Ipv4Addr, DocumentError> {
    let invalid = |reason: &str| DocumentError::InvalidStaticRange {
        range: range.to_string(),
        reason: reason.to_string(),
    };
    let parse = |text: &str| {
        text.trim()
            .parse::<Ipv4Addr>()
            .map_err(|err| invalid(&err.to_string()))
    };

    match range.split_once('-') {
        Some((start, end)) => {
            let start = parse(start)?;
            let end = parse(end)?;
            if end < start {
                return Err(invalid("range ends before it starts"));
            }
            Ok(end)
        }
        None => parse(range),
    }
}
