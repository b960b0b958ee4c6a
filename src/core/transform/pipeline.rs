use crate::core::error::{AppError, DocumentError};
use crate::core::manifest::Node;
use crate::core::transform::{colocation, jobs, properties, TransformInputs, Transformer};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

type StepFn = fn(&Transformer, &mut Node, &TransformInputs<'_>) -> Result<(), DocumentError>;

struct Step {
    name: &'static str,
    run: StepFn,
}

const STEPS: &[Step] = &[
    Step {
        name: "updating releases",
        run: jobs::update_releases,
    },
    Step {
        name: "adding ducati_db job",
        run: jobs::add_db_job,
    },
    Step {
        name: "colocating connet onto cc_bridge jobs",
        run: colocation::colocate_cc_bridges,
    },
    Step {
        name: "adding ducati template to cells",
        run: colocation::colocate_cells,
    },
    Step {
        name: "adding ducati template to colocated vm",
        run: colocation::colocate_colocated_vms,
    },
    Step {
        name: "adding garden properties",
        run: properties::add_garden_properties,
    },
    Step {
        name: "adding nsync properties",
        run: properties::add_nsync_properties,
    },
    Step {
        name: "adding ducati properties",
        run: properties::add_ducati_properties,
    },
    Step {
        name: "adding connet properties",
        run: properties::add_connet_properties,
    },
    Step {
        name: "adding acceptance job",
        run: jobs::add_acceptance_job,
    },
    Step {
        name: "adding acceptance-with-cf properties",
        run: properties::add_acceptance_properties,
    },
];

/// Names of the pipeline steps in execution order.
pub fn step_names() -> impl Iterator<Item = &'static str> {
    STEPS.iter().map(|step| step.name)
}

pub(super) fn run(
    transformer: &Transformer,
    manifest: &mut Node,
    inputs: &TransformInputs<'_>,
) -> Result<(), AppError> {
    for step in STEPS {
        tracing::debug!(step = step.name, "running transform step");
        if let Err(err) = run_guarded(step, transformer, manifest, inputs) {
            tracing::warn!(step = step.name, code = %err.code, category = %err.category, "transform step failed");
            return Err(err);
        }
    }
    tracing::debug!(steps = STEPS.len(), "transform pipeline complete");
    Ok(())
}

/// Run one step, turning both its error and any panic it raises into an
/// [`AppError`] tagged with the step name.
fn run_guarded(
    step: &Step,
    transformer: &Transformer,
    manifest: &mut Node,
    inputs: &TransformInputs<'_>,
) -> Result<(), AppError> {
    // a caught panic surfaces only through the returned error
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        tracing::debug!(location = ?info.location(), "transform step panicked");
    }));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        (step.run)(transformer, manifest, inputs)
    }));
    panic::set_hook(previous_hook);
    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(AppError::step_failed(step.name, err)),
        Err(payload) => Err(AppError::step_aborted(
            step.name,
            panic_message(payload.as_ref()),
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown fault".to_string()
    }
}
