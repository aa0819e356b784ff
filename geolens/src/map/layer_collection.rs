use crate::layer::{Layer, LayerId};

/// Ordered collection of layers shown on a map, bottom to top.
///
/// Every layer is stored together with its [`LayerId`], so that a layer can be found and
/// removed regardless of its position. Since a map should be able to show anything implementing
/// the [`Layer`] trait, this collection stores layers as trait objects. You can use downcasting
/// through `Any` trait to obtain a concrete layer type you work with.
///
/// ```
/// use geolens::layer::{LayerGroup, LayerId, TileLayerBuilder};
/// use geolens::map::LayerCollection;
///
/// let mut collection = LayerCollection::default();
/// let base = LayerId::next();
/// let shapes = LayerId::next();
/// collection.push(base, TileLayerBuilder::new_osm().build()?);
/// collection.push(shapes, LayerGroup::new());
///
/// assert!(collection.get(shapes).unwrap().as_any().is::<LayerGroup>());
/// assert_eq!(collection.ids().next(), Some(base));
/// # Ok::<(), geolens::error::GeolensError>(())
/// ```
#[derive(Default)]
pub struct LayerCollection(Vec<LayerEntry>);

struct LayerEntry {
    id: LayerId,
    layer: Box<dyn Layer>,
}

impl LayerCollection {
    /// Adds a layer on top of all the others.
    pub fn push(&mut self, id: LayerId, layer: impl Layer + 'static) {
        self.push_boxed(id, Box::new(layer))
    }

    /// Adds a boxed layer on top of all the others.
    pub fn push_boxed(&mut self, id: LayerId, layer: Box<dyn Layer>) {
        self.0.push(LayerEntry { id, layer })
    }

    /// Inserts a boxed layer at the given position, shifting the layers above it up.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_boxed(&mut self, index: usize, id: LayerId, layer: Box<dyn Layer>) {
        self.0.insert(index, LayerEntry { id, layer })
    }

    /// Removes the layer with the given id and returns it.
    pub fn remove(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        let index = self.position(id)?;
        Some(self.0.remove(index).layer)
    }

    fn position(&self, id: LayerId) -> Option<usize> {
        self.0.iter().position(|entry| entry.id == id)
    }

    /// Returns true if the collection has a layer with the given id.
    pub fn contains(&self, id: LayerId) -> bool {
        self.position(id).is_some()
    }

    /// Number of layers in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no layers in the collection.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the layer with the given id.
    pub fn get(&self, id: LayerId) -> Option<&dyn Layer> {
        self.0
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &*entry.layer)
    }

    /// Returns the layer with the given id as a mutable reference.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Box<dyn Layer>> {
        self.0
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| &mut entry.layer)
    }

    /// Iterates over layers from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Layer> + '_ {
        self.0.iter().map(|entry| &*entry.layer)
    }

    /// Iterates over ids of the layers from bottom to top.
    pub fn ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.0.iter().map(|entry| entry.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::TestLayer;

    fn collection() -> (LayerCollection, [LayerId; 3]) {
        let ids = [LayerId::next(), LayerId::next(), LayerId::next()];
        let mut collection = LayerCollection::default();
        collection.push(ids[0], TestLayer("Layer A"));
        collection.push(ids[1], TestLayer("Layer B"));
        collection.push(ids[2], TestLayer("Layer C"));

        (collection, ids)
    }

    #[test]
    fn remove_keeps_order() {
        let (mut collection, ids) = collection();

        let removed = collection.remove(ids[1]).unwrap();
        assert_eq!(
            removed.as_any().downcast_ref(),
            Some(&TestLayer("Layer B"))
        );
        assert!(collection.remove(ids[1]).is_none());

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec![ids[0], ids[2]]);
        assert_eq!(
            collection.iter().nth(1).unwrap().as_any().downcast_ref(),
            Some(&TestLayer("Layer C"))
        );
    }

    #[test]
    fn get_by_id() {
        let (mut collection, ids) = collection();

        assert_eq!(
            collection.get(ids[2]).unwrap().as_any().downcast_ref(),
            Some(&TestLayer("Layer C"))
        );
        assert!(collection.get(LayerId::next()).is_none());

        let layer = collection.get_mut(ids[0]).unwrap();
        *layer.as_any_mut().downcast_mut::<TestLayer>().unwrap() = TestLayer("Layer D");
        assert_eq!(
            collection.get(ids[0]).unwrap().as_any().downcast_ref(),
            Some(&TestLayer("Layer D"))
        );
    }

    #[test]
    fn insert_below() {
        let (mut collection, ids) = collection();
        let bottom = LayerId::next();
        collection.insert_boxed(0, bottom, Box::new(TestLayer("Layer 0")));

        assert!(collection.contains(bottom));
        assert_eq!(collection.ids().next(), Some(bottom));
        assert_eq!(collection.ids().last(), Some(ids[2]));

        for id in ids {
            collection.remove(id);
        }
        collection.remove(bottom);
        assert!(collection.is_empty());
    }
}
