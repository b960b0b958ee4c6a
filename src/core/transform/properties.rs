//! Property injectors.
//!
//! Overlay injectors merge fixed keys into a subtree that must already exist;
//! replace injectors assign a whole subtree under `properties`, creating or
//! overwriting the key.

use crate::core::config::DatabaseConfig;
use crate::core::error::DocumentError;
use crate::core::manifest::access::{get_mut, set, walk_mut};
use crate::core::manifest::Node;
use crate::core::transform::{TransformInputs, Transformer};

pub const ACCEPTANCE_PROPERTIES_KEY: &str = "acceptance-with-cf";

pub(super) fn add_garden_properties(
    transformer: &Transformer,
    manifest: &mut Node,
    _inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    let garden = &transformer.config().garden;
    overlay(
        manifest,
        "properties.garden",
        [
            ("shared_mounts", strings(&garden.shared_mounts)),
            ("network_plugin", Node::from(garden.network_plugin.as_str())),
            (
                "network_plugin_extra_args",
                strings(&garden.network_plugin_extra_args),
            ),
        ],
    )
}

pub(super) fn add_nsync_properties(
    transformer: &Transformer,
    manifest: &mut Node,
    _inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    let network_id = transformer.config().nsync.network_id.as_str();
    overlay(
        manifest,
        "properties.diego.nsync",
        [("network_id", Node::from(network_id))],
    )
}

pub(super) fn add_ducati_properties(
    transformer: &Transformer,
    manifest: &mut Node,
    _inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    let database = &transformer.config().database;
    let ducati = Node::map_of([
        (
            "daemon",
            Node::map_of([("database", database_connection(database))]),
        ),
        (
            "database",
            Node::map_of([
                ("db_scheme", Node::from("postgres")),
                ("port", Node::from(database.port)),
                (
                    "databases",
                    Node::seq_of([Node::map_of([
                        ("name", Node::from(database.name.as_str())),
                        ("tag", Node::from("whatever")),
                    ])]),
                ),
                (
                    "roles",
                    Node::seq_of([Node::map_of([
                        ("name", Node::from(database.username.as_str())),
                        ("password", Node::from(database.password.as_str())),
                        ("tag", Node::from("admin")),
                    ])]),
                ),
            ]),
        ),
    ]);
    replace(manifest, "ducati", ducati)
}

pub(super) fn add_connet_properties(
    transformer: &Transformer,
    manifest: &mut Node,
    _inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    let config = transformer.config();
    let connet = Node::map_of([(
        "daemon",
        Node::map_of([
            ("listen_host", Node::from(config.connet.listen_host.as_str())),
            ("listen_port", Node::from(config.connet.port)),
            ("database", database_connection(&config.database)),
        ]),
    )]);
    replace(manifest, "connet", connet)
}

/// Attach the caller's acceptance configuration verbatim. Without one, nothing changes.
pub(super) fn add_acceptance_properties(
    _transformer: &Transformer,
    manifest: &mut Node,
    inputs: &TransformInputs<'_>,
) -> Result<(), DocumentError> {
    match inputs.acceptance_config {
        Some(config) => replace(manifest, ACCEPTANCE_PROPERTIES_KEY, config.clone()),
        None => {
            tracing::debug!("no acceptance config supplied, skipping passthrough");
            Ok(())
        }
    }
}

fn overlay<const N: usize>(
    manifest: &mut Node,
    path: &str,
    entries: [(&str, Node); N],
) -> Result<(), DocumentError> {
    let target = walk_mut(manifest, path)?;
    if !target.is_mapping() {
        return Err(DocumentError::Unpack {
            found: target.kind(),
        });
    }
    for (key, value) in entries {
        set(target, key, value)?;
    }
    Ok(())
}

fn replace(manifest: &mut Node, key: &str, value: Node) -> Result<(), DocumentError> {
    let properties = get_mut(manifest, "properties")?;
    set(properties, key, value)
}

fn database_connection(database: &DatabaseConfig) -> Node {
    Node::map_of([
        ("username", Node::from(database.username.as_str())),
        ("password", Node::from(database.password.as_str())),
        ("name", Node::from(database.name.as_str())),
        ("ssl_mode", Node::from(database.ssl_mode.as_str())),
        ("host", Node::from(database.host.as_str())),
        ("port", Node::from(database.port)),
    ])
}

fn strings(values: &[String]) -> Node {
    Node::seq_of(values.iter().map(|value| Node::from(value.as_str())))
}
