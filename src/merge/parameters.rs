use super::MergeContext;
use crate::error::CrawlError;
use serde_yaml::{Mapping, Sequence, Value};

/// (`in`, `name`) pair identifying a parameter.
type ParameterId = (Value, Value);

fn identity(parameter: &Value, ctx: &MergeContext<'_>) -> Result<ParameterId, CrawlError> {
    let field = |name: &'static str| {
        parameter
            .get(name)
            .cloned()
            .ok_or_else(|| ctx.incomplete_parameter(parameter, name))
    };
    let location = field("in")?;
    let name = field("name")?;
    Ok((location, name))
}

fn placeholder((location, name): ParameterId) -> Value {
    let mut slot = Mapping::new();
    slot.insert(Value::from("in"), location);
    slot.insert(Value::from("name"), name);
    Value::Mapping(slot)
}

/// Merge `defaults` into `target` by parameter identity.
///
/// Target parameters always win. A default parameter the target does not know
/// reserves a slot carrying only its identity, so attributes are never forced
/// onto the view. Both sides are validated before `target` is touched.
pub(super) fn merge_parameters(
    target: &mut Sequence,
    defaults: &[Value],
    ctx: &MergeContext<'_>,
) -> Result<(), CrawlError> {
    let mut known = target
        .iter()
        .map(|parameter| identity(parameter, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    let incoming = defaults
        .iter()
        .map(|parameter| identity(parameter, ctx))
        .collect::<Result<Vec<_>, _>>()?;

    for id in incoming {
        if known.contains(&id) {
            continue;
        }
        tracing::debug!(location = ?id.0, name = ?id.1, "Reserving parameter slot");
        target.push(placeholder(id.clone()));
        known.push(id);
    }
    Ok(())
}
