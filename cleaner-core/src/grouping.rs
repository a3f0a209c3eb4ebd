use std::collections::BTreeSet;

/// Maximal runs of consecutive token indices
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexGroups {
    pub groups: Vec<Vec<u32>>,
    /// At least one group, and no group shorter than two
    pub valid: bool,
}

impl IndexGroups {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group `indices` into ascending runs of consecutive integers.
///
/// Duplicates are ignored. A single isolated index forms a group of one,
/// which makes the whole grouping invalid for tokenizing.
pub fn group_contiguous<I>(indices: I) -> IndexGroups
where
    I: IntoIterator<Item = u32>,
{
    let sorted: BTreeSet<u32> = indices.into_iter().collect();
    let mut groups: Vec<Vec<u32>> = Vec::new();

    for index in sorted {
        match groups.last_mut() {
            Some(group)
                if group
                    .last()
                    .and_then(|last| last.checked_add(1))
                    .is_some_and(|next| next == index) =>
            {
                group.push(index);
            }
            _ => groups.push(vec![index]),
        }
    }

    let valid = !groups.is_empty() && groups.iter().all(|group| group.len() >= 2);
    IndexGroups { groups, valid }
}
