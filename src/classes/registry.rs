use crate::error::RegistryError;
use std::collections::HashSet;

/// Numeric class label as stored in a mask pixel. Valid ids start at 1;
/// 0 is the unclassified bucket.
pub type ClassId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    pub id: ClassId,
    pub name: String,
    pub color: &'static str,
}

impl ClassDefinition {
    pub fn new(id: ClassId, name: impl Into<String>, color: &'static str) -> Self {
        Self {
            id,
            name: name.into(),
            color,
        }
    }
}

/// Immutable table of the artifact classes a mask can encode.
///
/// Classes are always kept in ascending id order so that percentage vectors,
/// CSV columns and chart keys line up across the whole crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRegistry {
    classes: Vec<ClassDefinition>,
    excluded: Option<ClassId>,
}

pub const OUT_OF_FOCUS: ClassId = 6;

impl ClassRegistry {
    pub fn new(
        mut classes: Vec<ClassDefinition>,
        excluded: Option<ClassId>,
    ) -> Result<Self, RegistryError> {
        if classes.is_empty() {
            return Err(RegistryError::Empty);
        }

        classes.sort_by_key(|c| c.id);

        let mut names = HashSet::new();
        for (index, class) in classes.iter().enumerate() {
            let expected = index as ClassId + 1;
            if class.id != expected {
                return Err(RegistryError::NonContiguous {
                    expected,
                    found: class.id,
                });
            }
            if class.name.trim().is_empty() {
                return Err(RegistryError::EmptyName(class.id));
            }
            if !names.insert(class.name.as_str()) {
                return Err(RegistryError::DuplicateName(class.name.clone()));
            }
        }

        if let Some(id) = excluded {
            if id == 0 || id as usize > classes.len() {
                return Err(RegistryError::UnknownExcludedClass(id));
            }
        }

        Ok(Self { classes, excluded })
    }

    /// GrandQC artifact classes. "Out of Focus" is reported but kept out of
    /// the percentage denominator.
    pub fn grandqc() -> Self {
        Self::grandqc_with_exclusion(Some(OUT_OF_FOCUS))
    }

    pub fn grandqc_with_exclusion(excluded: Option<ClassId>) -> Self {
        Self {
            classes: vec![
                ClassDefinition::new(1, "Normal Tissue", "#8884d8"),
                ClassDefinition::new(2, "Tissue Fold", "#82ca9d"),
                ClassDefinition::new(3, "Dark Spot/Foreign", "#ffc658"),
                ClassDefinition::new(4, "Pen Marking", "#ff7300"),
                ClassDefinition::new(5, "Air Bubble/Edge", "#0088fe"),
                ClassDefinition::new(OUT_OF_FOCUS, "Out of Focus", "#ff0000"),
            ],
            excluded,
        }
    }

    pub fn classes(&self) -> &[ClassDefinition] {
        &self.classes
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassDefinition> {
        if id == 0 {
            return None;
        }
        self.classes.get(id as usize - 1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.name.as_str())
    }

    pub fn excluded_from_denominator(&self) -> Option<ClassId> {
        self.excluded
    }

    pub fn counts_toward_denominator(&self, id: ClassId) -> bool {
        id != 0 && Some(id) != self.excluded && self.get(id).is_some()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::grandqc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grandqc_classes_are_ordered_and_contiguous() {
        let registry = ClassRegistry::grandqc();
        let ids: Vec<ClassId> = registry.classes().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(registry.excluded_from_denominator(), Some(6));
        assert_eq!(registry.get(6).unwrap().name, "Out of Focus");
        assert!(registry.get(0).is_none());
        assert!(registry.get(7).is_none());
    }

    #[test]
    fn grandqc_table_passes_validation() {
        let registry = ClassRegistry::grandqc();
        let rebuilt = ClassRegistry::new(
            registry.classes().to_vec(),
            registry.excluded_from_denominator(),
        )
        .unwrap();
        assert_eq!(rebuilt, registry);
    }

    #[test]
    fn new_sorts_by_id() {
        let registry = ClassRegistry::new(
            vec![
                ClassDefinition::new(2, "B", "#000"),
                ClassDefinition::new(1, "A", "#fff"),
            ],
            None,
        )
        .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn new_rejects_gaps_and_duplicates() {
        let gap = ClassRegistry::new(
            vec![
                ClassDefinition::new(1, "A", "#fff"),
                ClassDefinition::new(3, "C", "#000"),
            ],
            None,
        );
        assert_eq!(
            gap,
            Err(RegistryError::NonContiguous {
                expected: 2,
                found: 3
            })
        );

        let duplicate = ClassRegistry::new(
            vec![
                ClassDefinition::new(1, "A", "#fff"),
                ClassDefinition::new(2, "A", "#000"),
            ],
            None,
        );
        assert_eq!(duplicate, Err(RegistryError::DuplicateName("A".into())));

        assert_eq!(ClassRegistry::new(vec![], None), Err(RegistryError::Empty));
    }

    #[test]
    fn new_rejects_unknown_exclusion() {
        let result = ClassRegistry::new(vec![ClassDefinition::new(1, "A", "#fff")], Some(2));
        assert_eq!(result, Err(RegistryError::UnknownExcludedClass(2)));
    }

    #[test]
    fn denominator_membership() {
        let registry = ClassRegistry::grandqc();
        assert!(!registry.counts_toward_denominator(0));
        assert!(registry.counts_toward_denominator(1));
        assert!(!registry.counts_toward_denominator(6));
        assert!(!registry.counts_toward_denominator(7));
    }
}
