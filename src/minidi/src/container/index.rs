use std::collections::HashMap;
use std::sync::Arc;

use crate::container::holder::BeanHolder;
use crate::key::CapabilityKey;

/// Maps each capability to the bean providing it, remembering when more than
/// one bean does.
pub(super) struct CapabilityIndex {
    entries: HashMap<CapabilityKey, IndexEntry>,
}

enum IndexEntry {
    Unique(Arc<BeanHolder>),
    Ambiguous,
}

pub(super) enum Lookup<'a> {
    Absent,
    Unique(&'a Arc<BeanHolder>),
    Ambiguous,
}

impl CapabilityIndex {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, holder: &Arc<BeanHolder>) {
        for key in holder.capability_keys() {
            match self.entries.get_mut(key) {
                None => {
                    self.entries
                        .insert(*key, IndexEntry::Unique(Arc::clone(holder)));
                }
                Some(entry @ IndexEntry::Unique(_)) => *entry = IndexEntry::Ambiguous,
                Some(IndexEntry::Ambiguous) => {}
            }
        }
    }

    pub fn lookup(&self, key: &CapabilityKey) -> Lookup<'_> {
        match self.entries.get(key) {
            None => Lookup::Absent,
            Some(IndexEntry::Unique(holder)) => Lookup::Unique(holder),
            Some(IndexEntry::Ambiguous) => Lookup::Ambiguous,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::bean::{Bean, Capabilities};
    use crate::key;

    use super::*;

    trait Bar: Send + Sync {}

    trait Baz: Send + Sync {}

    struct BarImpl;

    impl Bar for BarImpl {}

    impl Bean for BarImpl {
        fn capabilities(capabilities: &mut Capabilities<Self>) {
            capabilities.provide::<dyn Bar>(|this| this);
        }
    }

    struct BarBaz;

    impl Bar for BarBaz {}

    impl Baz for BarBaz {}

    impl Bean for BarBaz {
        fn capabilities(capabilities: &mut Capabilities<Self>) {
            capabilities
                .provide::<dyn Bar>(|this| this)
                .provide::<dyn Baz>(|this| this);
        }
    }

    #[test]
    fn capability_index_lookup_succeeds() {
        let mut index = CapabilityIndex::new();
        let bar = Arc::new(BeanHolder::new(BarImpl));
        let bar_baz = Arc::new(BeanHolder::new(BarBaz));
        index.insert(&bar);
        index.insert(&bar_baz);

        assert!(matches!(
            index.lookup(&key::of::<BarImpl>()),
            Lookup::Unique(holder) if Arc::ptr_eq(holder, &bar)
        ));
        assert!(matches!(
            index.lookup(&key::of::<dyn Baz>()),
            Lookup::Unique(holder) if Arc::ptr_eq(holder, &bar_baz)
        ));
        assert!(matches!(index.lookup(&key::of::<dyn Bar>()), Lookup::Ambiguous));
        assert!(matches!(index.lookup(&key::of::<String>()), Lookup::Absent));
    }

    #[test]
    fn capability_index_stays_ambiguous_succeeds() {
        let mut index = CapabilityIndex::new();
        index.insert(&Arc::new(BeanHolder::new(BarImpl)));
        index.insert(&Arc::new(BeanHolder::new(BarBaz)));
        index.insert(&Arc::new(BeanHolder::new(BarImpl)));

        assert!(matches!(index.lookup(&key::of::<dyn Bar>()), Lookup::Ambiguous));
        assert!(matches!(index.lookup(&key::of::<BarImpl>()), Lookup::Ambiguous));
    }
}
