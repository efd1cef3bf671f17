//! Item catalog: groups, items, and an ordered catalog with O(1) lookup.

use std::collections::HashMap;
use std::sync::Arc;

use storehouse_core::{DomainError, DomainResult, Entity, GroupId, ItemId, validate};

use crate::unit::UnitOfMeasure;

/// A named grouping of items (e.g. "spices", "flour and grains").
#[derive(Debug)]
pub struct ItemGroup {
    id: GroupId,
    name: String,
}

impl ItemGroup {
    pub fn new(name: &str) -> DomainResult<Self> {
        Ok(Self {
            id: GroupId::new(),
            name: validate::name("group name", name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for ItemGroup {
    type Id = GroupId;

    fn id(&self) -> GroupId {
        self.id
    }
}

impl PartialEq for ItemGroup {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ItemGroup {}

/// Name-keyed create-or-reuse registry of item groups.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: HashMap<String, Arc<ItemGroup>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, name: &str) -> DomainResult<Arc<ItemGroup>> {
        let key = validate::name("group name", name)?;
        if let Some(existing) = self.groups.get(&key) {
            return Ok(Arc::clone(existing));
        }
        let group = Arc::new(ItemGroup::new(&key)?);
        self.groups.insert(key, Arc::clone(&group));
        Ok(group)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ItemGroup>> {
        self.groups.get(name.trim())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Catalog item (nomenclature entry).
#[derive(Debug)]
pub struct Item {
    id: ItemId,
    name: String,
    full_name: String,
    group: Arc<ItemGroup>,
    unit: Arc<UnitOfMeasure>,
}

impl Item {
    pub fn new(
        name: &str,
        full_name: &str,
        group: Arc<ItemGroup>,
        unit: Arc<UnitOfMeasure>,
    ) -> DomainResult<Self> {
        Self::with_id(ItemId::new(), name, full_name, group, unit)
    }

    pub fn with_id(
        id: ItemId,
        name: &str,
        full_name: &str,
        group: Arc<ItemGroup>,
        unit: Arc<UnitOfMeasure>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: validate::name("item name", name)?,
            full_name: validate::text("item full name", full_name, validate::MAX_FULL_NAME_LEN)?,
            group,
            unit,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn group(&self) -> &Arc<ItemGroup> {
        &self.group
    }

    /// Unit the item is natively measured in.
    pub fn unit(&self) -> &Arc<UnitOfMeasure> {
        &self.unit
    }

    /// Unit ledger rows for this item are expressed in.
    pub fn reporting_unit(&self) -> &Arc<UnitOfMeasure> {
        self.unit.reporting_unit()
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

/// Ordered item catalog.
///
/// Iteration follows insertion order; lookup by [`ItemId`] is O(1).
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<Arc<Item>>,
    index: HashMap<ItemId, usize>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from items, rejecting duplicate ids.
    pub fn from_items(items: impl IntoIterator<Item = Arc<Item>>) -> DomainResult<Self> {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert(item)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, item: Arc<Item>) -> DomainResult<()> {
        if self.index.contains_key(&item.id) {
            return Err(DomainError::conflict(format!(
                "item '{}' ({}) is already in the catalog",
                item.name, item.id
            )));
        }
        self.index.insert(item.id, self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Wrap `item` and insert it, returning the shared handle.
    pub fn add(&mut self, item: Item) -> DomainResult<Arc<Item>> {
        let item = Arc::new(item);
        self.insert(Arc::clone(&item))?;
        Ok(item)
    }

    pub fn get(&self, id: &ItemId) -> Option<&Arc<Item>> {
        self.index.get(id).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Item>> {
        let name = name.trim();
        self.items.iter().find(|item| item.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Item>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ordered subset of this catalog.
    pub fn filter(&self, mut keep: impl FnMut(&Item) -> bool) -> Self {
        let mut subset = Self::new();
        for item in self.items.iter().filter(|item| keep(item)) {
            subset.index.insert(item.id, subset.items.len());
            subset.items.push(Arc::clone(item));
        }
        subset
    }

    /// Items belonging to `group`, in catalog order.
    pub fn in_group(&self, group: &ItemGroup) -> Self {
        self.filter(|item| *item.group == *group)
    }
}

impl<'a> IntoIterator for &'a ItemCatalog {
    type Item = &'a Arc<Item>;
    type IntoIter = std::slice::Iter<'a, Arc<Item>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{GRAM, KILOGRAM, MILLILITER, UnitRegistry};

    struct Fixture {
        units: UnitRegistry,
        groups: GroupRegistry,
    }

    fn fixture() -> Fixture {
        Fixture {
            units: UnitRegistry::standard().unwrap(),
            groups: GroupRegistry::new(),
        }
    }

    fn item(fx: &mut Fixture, name: &str, group: &str, unit: &str) -> Item {
        let group = fx.groups.create(group).unwrap();
        let unit = fx.units.require(unit).unwrap();
        Item::new(name, name, group, unit).unwrap()
    }

    #[test]
    fn group_registry_reuses_by_name() {
        let mut groups = GroupRegistry::new();
        let a = groups.create("spices").unwrap();
        let b = groups.create("spices ").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn item_validates_names() {
        let mut fx = fixture();
        let group = fx.groups.create("dairy").unwrap();
        let unit = fx.units.require(MILLILITER).unwrap();

        assert!(Item::new("", "Cow milk", Arc::clone(&group), Arc::clone(&unit)).is_err());
        assert!(Item::new("Milk", "", Arc::clone(&group), Arc::clone(&unit)).is_err());
        assert!(Item::new(&"m".repeat(51), "Cow milk", Arc::clone(&group), Arc::clone(&unit)).is_err());
        assert!(Item::new("Milk", &"m".repeat(255), group, unit).is_ok());
    }

    #[test]
    fn reporting_unit_follows_unit_base() {
        let mut fx = fixture();
        let flour = item(&mut fx, "Flour", "flour and grains", KILOGRAM);
        let gram = fx.units.require(GRAM).unwrap();
        assert_eq!(flour.unit().name(), KILOGRAM);
        assert_eq!(flour.reporting_unit(), &gram);
    }

    #[test]
    fn catalog_preserves_insertion_order_and_indexes_ids() {
        let mut fx = fixture();
        let mut catalog = ItemCatalog::new();
        let sugar = catalog.add(item(&mut fx, "Sugar", "spices", GRAM)).unwrap();
        let salt = catalog.add(item(&mut fx, "Salt", "spices", GRAM)).unwrap();

        let names: Vec<_> = catalog.iter().map(|i| i.name().to_string()).collect();
        assert_eq!(names, ["Sugar", "Salt"]);
        assert_eq!(catalog.get(&salt.id()), Some(&salt));
        assert_eq!(catalog.find_by_name("Sugar"), Some(&sugar));
        assert!(catalog.get(&ItemId::new()).is_none());
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let mut fx = fixture();
        let sugar = Arc::new(item(&mut fx, "Sugar", "spices", GRAM));
        let mut catalog = ItemCatalog::new();
        catalog.insert(Arc::clone(&sugar)).unwrap();

        let err = catalog.insert(sugar).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn group_subset_keeps_order_and_lookup() {
        let mut fx = fixture();
        let mut catalog = ItemCatalog::new();
        catalog.add(item(&mut fx, "Sugar", "spices", GRAM)).unwrap();
        let milk = catalog.add(item(&mut fx, "Milk", "dairy", MILLILITER)).unwrap();
        catalog.add(item(&mut fx, "Salt", "spices", GRAM)).unwrap();

        let spices = Arc::clone(fx.groups.get("spices").unwrap());
        let subset = catalog.in_group(&spices);

        let names: Vec<_> = subset.iter().map(|i| i.name().to_string()).collect();
        assert_eq!(names, ["Sugar", "Salt"]);
        assert!(!subset.contains(&milk.id()));
        assert_eq!(catalog.len(), 3);
    }
}
