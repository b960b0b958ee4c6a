use crate::{
    cli::args::{OutputFormat, TransformArgs},
    core::{
        error::DocumentError,
        manifest::{access, Node},
        ConfigLoader, TransformInputs, Transformer,
    },
    utils::serialization::{codec_for_path, DocumentCodec, FileUtils, JsonCodec, YamlCodec},
    Result,
};
use anyhow::{anyhow, Context};
use std::{
    fs,
    io::{self, Write},
    path::Path,
};

/// Read the inputs, run the transform pipeline, and write the result.
///
/// Nothing is written unless every step succeeded.
pub fn transform(args: TransformArgs) -> Result<()> {
    let config = ConfigLoader::load(args.config.as_deref()).context("loading configuration")?;

    let mut manifest =
        FileUtils::load_document(&args.diego_manifest, codec_for_path(&args.diego_manifest).as_ref())
            .context("reading diego manifest")?;
    if !manifest.is_mapping() {
        return Err(anyhow!(
            "reading diego manifest: expected a mapping at the top level, found {}",
            manifest.kind()
        ));
    }

    let cf_creds = args
        .cf_creds
        .as_deref()
        .map(|path| {
            FileUtils::load_document(path, codec_for_path(path).as_ref())
                .context("reading cf creds config")
        })
        .transpose()?;

    let system_domain = match (&args.system_domain, &cf_creds) {
        (Some(domain), _) => Some(domain.clone()),
        (None, Some(creds)) => Some(system_domain_from_creds(creds).context("getting system domain")?),
        (None, None) => None,
    };
    tracing::debug!(
        manifest = %args.diego_manifest.display(),
        system_domain = system_domain.as_deref().unwrap_or("<none>"),
        "transforming manifest"
    );

    let transformer = Transformer::with_config(config);
    let inputs = TransformInputs {
        acceptance_config: cf_creds.as_ref(),
        system_domain: system_domain.as_deref(),
    };
    transformer
        .transform(&mut manifest, &inputs)
        .context("transforming")?;

    let bytes = codec_for(args.format).encode(&manifest)?;
    write_output(args.output.as_deref(), &bytes)
}

/// Derive the system domain from the `api` entry of the CF credentials, which
/// has the form `api.<system domain>`.
pub fn system_domain_from_creds(creds: &Node) -> Result<String> {
    let api = match access::get_str(creds, "api") {
        Ok(api) => api,
        Err(DocumentError::MissingKey(_)) | Err(DocumentError::Unpack { .. }) => {
            return Err(anyhow!("missing expected config in cfCreds: api"))
        }
        Err(_) => return Err(anyhow!("api key not a string")),
    };
    api.strip_prefix("api.")
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("unable to parse api key to extract system domain"))
}

fn codec_for(format: OutputFormat) -> Box<dyn DocumentCodec> {
    match format {
        OutputFormat::Yaml => Box::new(YamlCodec),
        OutputFormat::Json => Box::new(JsonCodec),
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|_| stdout.flush())
                .context("failed to write manifest to stdout")?;
        }
    }
    Ok(())
}
