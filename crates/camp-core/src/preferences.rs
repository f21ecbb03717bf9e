//! The preference sheet: children, their ages, and what they want.

use std::collections::BTreeMap;

use crate::priority::Priority;
use crate::types::{ActivityName, ChildName, ValidationError};
use crate::warning::{Warning, WarningSink};

/// A child taking part in the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub name: ChildName,
    pub age: u32,
}

/// Children with ages plus a priority per (activity, child).
///
/// Children iterate in lexicographic name order. Missing
/// (activity, child) pairs read as [`Priority::No`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSheet {
    children: BTreeMap<ChildName, Child>,
    priorities: BTreeMap<ActivityName, BTreeMap<ChildName, Priority>>,
}

impl PreferenceSheet {
    pub fn builder() -> PreferenceSheetBuilder {
        PreferenceSheetBuilder::default()
    }

    /// Children in lexicographic name order.
    pub fn children(&self) -> impl Iterator<Item = &Child> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<&Child> {
        self.children.get(name)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Activities mentioned in the sheet, sorted.
    pub fn activities(&self) -> impl Iterator<Item = &ActivityName> {
        self.priorities.keys()
    }

    pub fn priority(&self, activity: &str, child: &str) -> Priority {
        self.priorities
            .get(activity)
            .and_then(|by_child| by_child.get(child))
            .copied()
            .unwrap_or_default()
    }

    /// The `interested` map for one activity.
    pub fn priorities_for(&self, activity: &str) -> BTreeMap<ChildName, Priority> {
        self.priorities.get(activity).cloned().unwrap_or_default()
    }
}

/// Collects children and priority entries, then validates them together.
#[derive(Debug, Default)]
pub struct PreferenceSheetBuilder {
    children: BTreeMap<ChildName, Child>,
    entries: Vec<(ActivityName, String, Priority)>,
}

impl PreferenceSheetBuilder {
    /// Registers a child. The first age given for a name wins.
    pub fn add_child(&mut self, name: ChildName, age: u32) -> Result<(), ValidationError> {
        if age == 0 {
            return Err(ValidationError::NonPositiveAge { value: age });
        }
        self.children
            .entry(name.clone())
            .or_insert(Child { name, age });
        Ok(())
    }

    /// Records a priority. A later entry for the same pair replaces an earlier one.
    pub fn set_priority(&mut self, activity: ActivityName, child: impl Into<String>, priority: Priority) {
        self.entries.push((activity, child.into(), priority));
    }

    /// Builds the sheet, dropping entries for children that were never registered.
    pub fn build(self, sink: &mut impl WarningSink) -> PreferenceSheet {
        let mut priorities: BTreeMap<ActivityName, BTreeMap<ChildName, Priority>> = BTreeMap::new();

        for (activity, child, priority) in self.entries {
            let Some(known) = self.children.get(child.trim()) else {
                sink.warn(Warning::UnknownChild {
                    child,
                    activity: activity.to_string(),
                });
                continue;
            };
            priorities
                .entry(activity)
                .or_default()
                .insert(known.name.clone(), priority);
        }

        PreferenceSheet {
            children: self.children,
            priorities,
        }
    }
}
