//! Per-run generation state.
//!
//! A [`Session`] starts empty, fills monotonically while classes are built,
//! and is dropped when the run ends. Nothing here persists between runs.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::calls::{CallBucket, ItemCall, OtherCall, RecordCall};
use crate::descriptor::ClassDescriptor;

/// What a class IRI resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A generated class with this name.
    Class(String),
    /// A coded value, represented by the shared coded-value type.
    Coded(String),
    /// Excluded from generation.
    Excluded,
}

impl Resolved {
    /// The type name properties referencing this class should use.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Resolved::Class(name) | Resolved::Coded(name) => Some(name),
            Resolved::Excluded => None,
        }
    }
}

/// Valid codes of one coded class: code IRI → title.
pub type ValidValues = BTreeMap<String, String>;

/// Registries and accumulators for one generation run.
#[derive(Debug, Default)]
pub struct Session {
    known: BTreeMap<String, Resolved>,
    name_owners: BTreeMap<String, String>,
    valid_values: BTreeMap<String, ValidValues>,
    record_calls: Vec<RecordCall>,
    item_calls: Vec<ItemCall>,
    other_calls: Vec<OtherCall>,
    pending: Vec<ClassDescriptor>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns what `uri` resolved to, if it was seen before.
    #[must_use]
    pub fn known(&self, uri: &str) -> Option<&Resolved> {
        self.known.get(uri)
    }

    /// Records what `uri` resolved to. A class is registered at most once;
    /// later registrations of the same IRI are ignored.
    pub fn register(&mut self, uri: &str, resolved: Resolved) {
        if let Entry::Vacant(entry) = self.known.entry(uri.to_string()) {
            if let Resolved::Class(name) = &resolved {
                self.name_owners
                    .entry(name.clone())
                    .or_insert_with(|| uri.to_string());
            }
            entry.insert(resolved);
        }
    }

    /// IRI of the class that claimed the generated class `name`.
    #[must_use]
    pub fn name_owner(&self, name: &str) -> Option<&str> {
        self.name_owners.get(name).map(String::as_str)
    }

    /// Number of IRIs resolved so far.
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    /// Names of every class resolved to a generated class, sorted.
    pub fn class_names(&self) -> BTreeSet<&str> {
        self.known
            .values()
            .filter_map(|resolved| match resolved {
                Resolved::Class(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Stores the valid codes of the coded class `uri`.
    pub fn register_valid_values(&mut self, uri: &str, values: ValidValues) {
        self.valid_values.insert(uri.to_string(), values);
    }

    /// Returns the valid codes of the coded class `uri`.
    #[must_use]
    pub fn valid_values(&self, uri: &str) -> Option<&ValidValues> {
        self.valid_values.get(uri)
    }

    /// Files a classified call into its accumulator.
    pub fn collect_call(&mut self, bucket: CallBucket) {
        match bucket {
            CallBucket::Ignored => {}
            CallBucket::RecordGetter(call) => self.record_calls.push(call),
            CallBucket::SingleItemGetter(call) => self.item_calls.push(call),
            CallBucket::Other(call) => self.other_calls.push(call),
        }
    }

    /// Queues a descriptor built while resolving another class.
    pub fn push_pending(&mut self, descriptor: ClassDescriptor) {
        self.pending.push(descriptor);
    }

    /// Takes every queued descriptor.
    pub fn take_pending(&mut self) -> Vec<ClassDescriptor> {
        std::mem::take(&mut self.pending)
    }

    /// Drains the record-level calls, sorted and unique by method name.
    pub fn drain_record_calls(&mut self) -> Vec<RecordCall> {
        let mut calls = std::mem::take(&mut self.record_calls);
        calls.sort();
        let mut seen = BTreeSet::new();
        calls.retain(|call| {
            let fresh = seen.insert(call.method_name.clone());
            if !fresh {
                warn!(
                    "Record call {} of {} clashes with an earlier method of that name, skipping",
                    call.method_name, call.item_type
                );
            }
            fresh
        });
        calls
    }

    /// Single-item calls collected so far.
    #[must_use]
    pub fn item_calls(&self) -> &[ItemCall] {
        &self.item_calls
    }

    /// Other record-scoped calls collected so far.
    #[must_use]
    pub fn other_calls(&self) -> &[OtherCall] {
        &self.other_calls
    }
}
