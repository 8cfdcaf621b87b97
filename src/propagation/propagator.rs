//! Mirrors ACL changes made on an owner resource (scenario, runner, ...) onto the
//! resources it links to (datasets).
//!
//! Every linked id is resolved before anything is mutated; a resolution failure
//! aborts the batch untouched. After that, each linked resource is handled on its
//! own: a refused mutation or a failed save is logged and recorded in the report,
//! the rest of the batch carries on, and nothing is rolled back.

use tracing::{debug, info, warn};

use crate::adapters::SecurityStore;
use crate::error::{RbacError, RbacResult};
use crate::rbac::{AuthorizationEngine, RoleTable, Security};

use super::policy::{SkipReason, default_change, default_translation};

pub type TranslateFn = Box<dyn Fn(&str) -> String + Send + Sync>;
pub type SharedPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Debug, Default)]
pub struct PropagationReport {
    pub updated: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
    pub failed: Vec<(String, RbacError)>,
}

impl PropagationReport {
    pub fn is_clean(&self) -> bool { self.failed.is_empty() }
}

pub struct SecurityPropagator<'a, S: SecurityStore> {
    engine: &'a AuthorizationEngine,
    store: &'a S,
    table: &'a RoleTable,
    translate: TranslateFn,
    is_shared: SharedPredicate,
}

impl<'a, S: SecurityStore> SecurityPropagator<'a, S> {
    /// `table` is the role table of the linked resources, not of the owner.
    pub fn new(engine: &'a AuthorizationEngine, store: &'a S, table: &'a RoleTable) -> Self {
        Self {
            engine,
            store,
            table,
            translate: Box::new(default_translation),
            is_shared: Box::new(|_: &str| false),
        }
    }

    pub fn with_translation<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.translate = Box::new(f);
        self
    }

    pub fn with_shared_predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.is_shared = Box::new(f);
        self
    }

    pub fn translate(&self, owner_role: &str) -> String { (self.translate)(owner_role) }

    fn resolve_all(&self, owner_id: &str, linked_ids: &[String]) -> RbacResult<Vec<(Security, bool)>> {
        let mut out = Vec::with_capacity(linked_ids.len());
        for id in linked_ids {
            let sec = self.store.load(id).inspect_err(|e| {
                warn!(target: "bastion::propagation", "{}: cannot resolve linked resource {}: {}", owner_id, id, e);
            })?;
            out.push((sec, (self.is_shared)(id.as_str())));
        }
        Ok(out)
    }

    fn persist(&self, report: &mut PropagationReport, outcome: RbacResult<()>, sec: &Security) {
        let outcome = outcome.and_then(|_| self.store.save(sec));
        match outcome {
            Ok(()) => report.updated.push(sec.resource_id.clone()),
            Err(e) => {
                warn!(target: "bastion::propagation", "skipping {}: {}", sec.resource_id, e);
                report.failed.push((sec.resource_id.clone(), e));
            }
        }
    }

    fn skip(report: &mut PropagationReport, id: &str, reason: SkipReason) {
        debug!(target: "bastion::propagation", "{} left as is ({:?})", id, reason);
        report.skipped.push((id.to_string(), reason));
    }

    /// Give `identity` the translated `owner_role` on every linked resource.
    /// Shared resources only gain entries; existing ones there are left alone.
    pub fn propagate_grant(
        &self,
        owner_id: &str,
        linked_ids: &[String],
        identity: &str,
        owner_role: &str,
    ) -> RbacResult<PropagationReport> {
        let role = self.translate(owner_role);
        let mut report = PropagationReport::default();
        for (mut sec, shared) in self.resolve_all(owner_id, linked_ids)? {
            match sec.entry(identity) {
                Some(_) if shared => { Self::skip(&mut report, &sec.resource_id, SkipReason::Shared); continue; }
                Some(e) if e.role == role => { Self::skip(&mut report, &sec.resource_id, SkipReason::Unchanged); continue; }
                _ => {}
            }
            let outcome = self.engine.set_user_role(&mut sec, identity, &role, self.table);
            self.persist(&mut report, outcome, &sec);
        }
        info!(
            target: "bastion::propagation",
            "{}: granted {} as {} on {} linked resources ({} skipped, {} failed)",
            owner_id, identity, role, report.updated.len(), report.skipped.len(), report.failed.len()
        );
        Ok(report)
    }

    /// Drop `identity` from every linked resource that is not shared.
    pub fn propagate_removal(&self, owner_id: &str, linked_ids: &[String], identity: &str) -> RbacResult<PropagationReport> {
        let mut report = PropagationReport::default();
        for (mut sec, shared) in self.resolve_all(owner_id, linked_ids)? {
            if shared { Self::skip(&mut report, &sec.resource_id, SkipReason::Shared); continue; }
            if !sec.contains(identity) { Self::skip(&mut report, &sec.resource_id, SkipReason::Absent); continue; }
            let outcome = self.engine.remove_user(&mut sec, identity, self.table);
            self.persist(&mut report, outcome, &sec);
        }
        info!(
            target: "bastion::propagation",
            "{}: removed {} from {} linked resources ({} skipped, {} failed)",
            owner_id, identity, report.updated.len(), report.skipped.len(), report.failed.len()
        );
        Ok(report)
    }

    /// Move linked defaults towards the translated owner default, within the
    /// never-downgrade rules of `default_change`.
    pub fn propagate_default(&self, owner_id: &str, linked_ids: &[String], owner_default: &str) -> RbacResult<PropagationReport> {
        let role = self.translate(owner_default);
        let mut report = PropagationReport::default();
        for (mut sec, shared) in self.resolve_all(owner_id, linked_ids)? {
            if let Some(reason) = default_change(&sec.default, &role, shared) {
                Self::skip(&mut report, &sec.resource_id, reason);
                continue;
            }
            let outcome = self.engine.set_default(&mut sec, &role, self.table);
            self.persist(&mut report, outcome, &sec);
        }
        info!(
            target: "bastion::propagation",
            "{}: default {} applied to {} linked resources ({} skipped, {} failed)",
            owner_id, role, report.updated.len(), report.skipped.len(), report.failed.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "propagator_tests.rs"]
mod tests;
