use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Application state shared with every handler, one value per type.
#[derive(Default)]
pub(crate) struct DataMap {
    inner: HashMap<TypeId, Box<dyn Any + Send + Sync + 'static>>,
}

impl DataMap {
    pub fn new() -> DataMap {
        DataMap::default()
    }

    pub fn insert<T: Send + Sync + 'static>(&mut self, val: T) {
        self.inner.insert(TypeId::of::<T>(), Box::new(val));
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.inner.get(&TypeId::of::<T>()).and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl std::fmt::Debug for DataMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataMap {{ len: {} }}", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_store_one_value_per_type() {
        let mut map = DataMap::new();
        map.insert(100_u32);
        map.insert(String::from("first"));
        map.insert(String::from("second"));

        assert_eq!(map.get::<u32>(), Some(&100));
        assert_eq!(map.get::<String>().map(String::as_str), Some("second"));
        assert!(map.get::<u64>().is_none());
        assert_eq!(map.len(), 2);
    }
}
