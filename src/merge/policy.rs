use super::parameters::merge_parameters;
use super::MergeContext;
use crate::error::CrawlError;
use serde_yaml::{Sequence, Value};
use std::collections::BTreeSet;

/// How a list-valued field absorbs the same field from defaults
///
/// Selected by field name. Fields without a policy keep the target's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPolicy {
    /// `parameters`: merge by (`in`, `name`) identity
    Parameters,
    /// `security`: merge by the set of scheme names in each rule
    Security,
    /// `produces`, `consumes`, `tags`: ordered union without duplicates
    Union,
    /// Everything else: target untouched
    Passthrough,
}

impl ListPolicy {
    /// Policy for a field key
    pub fn for_key(key: &Value) -> Self {
        match key.as_str() {
            Some("parameters") => ListPolicy::Parameters,
            Some("security") => ListPolicy::Security,
            Some("produces") | Some("consumes") | Some("tags") => ListPolicy::Union,
            _ => ListPolicy::Passthrough,
        }
    }

    /// Fold `defaults` into `target` according to this policy
    pub fn apply(
        self,
        target: &mut Sequence,
        defaults: &[Value],
        ctx: &MergeContext<'_>,
    ) -> Result<(), CrawlError> {
        match self {
            ListPolicy::Parameters => merge_parameters(target, defaults, ctx)?,
            ListPolicy::Security => merge_security(target, defaults),
            ListPolicy::Union => merge_union(target, defaults),
            ListPolicy::Passthrough => {}
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum RuleId<'a> {
    Schemes(BTreeSet<String>),
    Opaque(&'a Value),
}

fn rule_id(rule: &Value) -> RuleId<'_> {
    match rule {
        Value::Mapping(schemes) => RuleId::Schemes(
            schemes
                .keys()
                .map(|k| k.as_str().map_or_else(|| format!("{:?}", k), str::to_string))
                .collect(),
        ),
        other => RuleId::Opaque(other),
    }
}

/// Append default security rules whose scheme set the target lacks.
///
/// Only the target's rules count as present: two default alternatives over
/// the same schemes (different scopes) are both appended.
fn merge_security(target: &mut Sequence, defaults: &[Value]) {
    let added: Sequence = {
        let present: Vec<RuleId<'_>> = target.iter().map(rule_id).collect();
        defaults
            .iter()
            .filter(|rule| !present.contains(&rule_id(rule)))
            .cloned()
            .collect()
    };
    target.extend(added);
}

/// Ordered union: target items first, then unseen default items.
fn merge_union(target: &mut Sequence, defaults: &[Value]) {
    let mut merged: Sequence = Vec::with_capacity(target.len() + defaults.len());
    for item in target.iter().chain(defaults) {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    *target = merged;
}
