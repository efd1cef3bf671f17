//! Units of measure and their one-hop conversion to a base unit.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use storehouse_core::{DomainError, DomainResult, Entity, UnitId, validate};

pub const GRAM: &str = "gram";
pub const KILOGRAM: &str = "kilogram";
pub const LITER: &str = "liter";
pub const MILLILITER: &str = "milliliter";
pub const PIECE: &str = "piece";

/// A unit of measure.
///
/// A unit without a base *is* a base (factor 1). A derived unit points
/// directly at a base unit: "1 of this unit equals `conversion_factor`
/// base units". Chains longer than one hop cannot be constructed.
#[derive(Debug)]
pub struct UnitOfMeasure {
    id: UnitId,
    name: String,
    base: Option<Arc<UnitOfMeasure>>,
    conversion_factor: Decimal,
}

impl UnitOfMeasure {
    /// Build a base unit.
    pub fn base(name: &str) -> DomainResult<Self> {
        Self::new(name, None, Decimal::ONE)
    }

    /// Build a unit derived from `base`.
    pub fn derived(name: &str, base: &Arc<UnitOfMeasure>, conversion_factor: Decimal) -> DomainResult<Self> {
        Self::new(name, Some(Arc::clone(base)), conversion_factor)
    }

    pub fn new(
        name: &str,
        base: Option<Arc<UnitOfMeasure>>,
        conversion_factor: Decimal,
    ) -> DomainResult<Self> {
        let name = validate::name("unit name", name)?;

        if conversion_factor <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "conversion factor of '{name}' must be positive"
            )));
        }

        match &base {
            None if conversion_factor != Decimal::ONE => {
                return Err(DomainError::validation(format!(
                    "base unit '{name}' must have a conversion factor of 1"
                )));
            }
            Some(b) if !b.is_base() => {
                return Err(DomainError::validation(format!(
                    "'{}' is derived from '{}' and cannot serve as a base for '{name}'",
                    b.name,
                    b.base.as_ref().map(|bb| bb.name.as_str()).unwrap_or_default(),
                )));
            }
            _ => {}
        }

        Ok(Self {
            id: UnitId::new(),
            name,
            base,
            conversion_factor,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_unit(&self) -> Option<&Arc<UnitOfMeasure>> {
        self.base.as_ref()
    }

    pub fn conversion_factor(&self) -> Decimal {
        self.conversion_factor
    }

    pub fn is_base(&self) -> bool {
        self.base.is_none()
    }

    /// The unit quantities of this family are reported in: the base if any,
    /// otherwise this unit itself.
    pub fn reporting_unit<'a>(self: &'a Arc<Self>) -> &'a Arc<Self> {
        self.base.as_ref().unwrap_or(self)
    }

    /// Convert `quantity` expressed in this unit into `target`; see [`convert`].
    pub fn convert_to(
        &self,
        quantity: Decimal,
        target: &UnitOfMeasure,
    ) -> DomainResult<Option<Decimal>> {
        convert(quantity, self, target)
    }
}

impl Entity for UnitOfMeasure {
    type Id = UnitId;

    fn id(&self) -> UnitId {
        self.id
    }
}

impl PartialEq for UnitOfMeasure {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UnitOfMeasure {}

impl core::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Convert `quantity` from `from` into `to`.
///
/// - `from == to`: identity.
/// - `to` is `from`'s base: `quantity * from.conversion_factor`.
/// - anything else (unrelated units, base to derived): `Ok(None)`.
///
/// Fails with `InvariantViolation` when the product leaves the `Decimal` range.
pub fn convert(
    quantity: Decimal,
    from: &UnitOfMeasure,
    to: &UnitOfMeasure,
) -> DomainResult<Option<Decimal>> {
    if from == to {
        return Ok(Some(quantity));
    }
    match from.base_unit() {
        Some(base) if **base == *to => quantity
            .checked_mul(from.conversion_factor)
            .map(Some)
            .ok_or_else(|| {
                DomainError::invariant(format!(
                    "converting {quantity} {} to {} overflows",
                    from.name, to.name
                ))
            }),
        _ => Ok(None),
    }
}

/// Name-keyed registry of units.
///
/// Creating a unit under a name that is already registered hands back the
/// existing instance, so equally named units share one identity.
#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: Vec<Arc<UnitOfMeasure>>,
    by_name: HashMap<String, usize>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the stock unit families:
    /// gram/kilogram, liter/milliliter, and piece.
    pub fn standard() -> DomainResult<Self> {
        let mut registry = Self::new();
        let gram = registry.create(GRAM, None, Decimal::ONE)?;
        registry.create(KILOGRAM, Some(&gram), Decimal::from(1000))?;
        let liter = registry.create(LITER, None, Decimal::ONE)?;
        registry.create(MILLILITER, Some(&liter), Decimal::new(1, 3))?;
        registry.create(PIECE, None, Decimal::ONE)?;
        Ok(registry)
    }

    /// Create a unit, or return the one already registered under `name`.
    pub fn create(
        &mut self,
        name: &str,
        base: Option<&Arc<UnitOfMeasure>>,
        conversion_factor: Decimal,
    ) -> DomainResult<Arc<UnitOfMeasure>> {
        let key = validate::name("unit name", name)?;

        if let Some(&idx) = self.by_name.get(&key) {
            let existing = &self.units[idx];
            if existing.conversion_factor != conversion_factor
                || existing.base.as_ref().map(|b| b.id) != base.map(|b| b.id)
            {
                tracing::debug!(
                    unit = %key,
                    "unit already registered with a different definition; reusing existing"
                );
            }
            return Ok(Arc::clone(existing));
        }

        let unit = Arc::new(UnitOfMeasure::new(&key, base.cloned(), conversion_factor)?);
        self.by_name.insert(key, self.units.len());
        self.units.push(Arc::clone(&unit));
        Ok(unit)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<UnitOfMeasure>> {
        self.by_name.get(name.trim()).map(|&idx| &self.units[idx])
    }

    /// Like [`UnitRegistry::get`], failing with `NotFound`.
    pub fn require(&self, name: &str) -> DomainResult<Arc<UnitOfMeasure>> {
        self.get(name)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("unit '{}'", name.trim())))
    }

    /// Units in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<UnitOfMeasure>> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gram_and_kilogram() -> (Arc<UnitOfMeasure>, Arc<UnitOfMeasure>) {
        let gram = Arc::new(UnitOfMeasure::base(GRAM).unwrap());
        let kilo = Arc::new(UnitOfMeasure::derived(KILOGRAM, &gram, Decimal::from(1000)).unwrap());
        (gram, kilo)
    }

    #[test]
    fn derived_unit_converts_to_its_base() {
        let (gram, kilo) = gram_and_kilogram();
        assert_eq!(convert(Decimal::ONE, &kilo, &gram), Ok(Some(Decimal::from(1000))));
        assert_eq!(kilo.convert_to(Decimal::new(25, 1), &gram), Ok(Some(Decimal::from(2500))));
    }

    #[test]
    fn same_unit_is_identity() {
        let (gram, kilo) = gram_and_kilogram();
        assert_eq!(convert(Decimal::from(7), &gram, &gram), Ok(Some(Decimal::from(7))));
        assert_eq!(convert(Decimal::from(-3), &kilo, &kilo), Ok(Some(Decimal::from(-3))));
    }

    #[test]
    fn base_to_derived_is_not_converted() {
        let (gram, kilo) = gram_and_kilogram();
        assert_eq!(convert(Decimal::from(1000), &gram, &kilo), Ok(None));
    }

    #[test]
    fn unrelated_units_are_not_converted() {
        let (gram, _) = gram_and_kilogram();
        let piece = UnitOfMeasure::base(PIECE).unwrap();
        assert_eq!(convert(Decimal::ONE, &piece, &gram), Ok(None));
    }

    #[test]
    fn conversion_overflow_is_an_error() {
        let (gram, kilo) = gram_and_kilogram();
        let huge = Decimal::MAX / Decimal::from(10);

        let err = convert(huge, &kilo, &gram).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(msg) if msg.contains("overflows")));
        assert_eq!(convert(huge, &gram, &gram), Ok(Some(huge)));
    }

    #[test]
    fn reporting_unit_prefers_base() {
        let (gram, kilo) = gram_and_kilogram();
        assert_eq!(kilo.reporting_unit(), &gram);
        assert_eq!(gram.reporting_unit(), &gram);
    }

    #[test]
    fn non_positive_factor_is_rejected() {
        let (gram, _) = gram_and_kilogram();
        for factor in [Decimal::ZERO, Decimal::from(-5)] {
            let err = UnitOfMeasure::derived("bag", &gram, factor).unwrap_err();
            assert!(matches!(err, DomainError::Validation(msg) if msg.contains("must be positive")));
        }
    }

    #[test]
    fn base_unit_factor_must_be_one() {
        let err = UnitOfMeasure::new("crate", None, Decimal::from(12)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn two_hop_chains_are_rejected() {
        let (_, kilo) = gram_and_kilogram();
        let err = UnitOfMeasure::derived("ton", &kilo, Decimal::from(1000)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("cannot serve as a base")));
    }

    #[test]
    fn equality_is_by_identity_not_name() {
        let a = UnitOfMeasure::base(GRAM).unwrap();
        let b = UnitOfMeasure::base(GRAM).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn registry_reuses_instances_by_name() {
        let mut registry = UnitRegistry::new();
        let first = registry.create(PIECE, None, Decimal::ONE).unwrap();
        let second = registry.create("  piece ", None, Decimal::ONE).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_validates_before_registering() {
        let mut registry = UnitRegistry::new();
        let gram = registry.create(GRAM, None, Decimal::ONE).unwrap();
        assert!(registry.create("pinch", Some(&gram), Decimal::ZERO).is_err());
        assert!(registry.get("pinch").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn independent_registries_do_not_share_units() {
        let mut a = UnitRegistry::new();
        let mut b = UnitRegistry::new();
        let ga = a.create(GRAM, None, Decimal::ONE).unwrap();
        let gb = b.create(GRAM, None, Decimal::ONE).unwrap();
        assert_ne!(ga, gb);
    }

    #[test]
    fn standard_registry_wires_unit_families() {
        let registry = UnitRegistry::standard().unwrap();
        assert_eq!(registry.len(), 5);

        let gram = registry.require(GRAM).unwrap();
        let kilo = registry.require(KILOGRAM).unwrap();
        let liter = registry.require(LITER).unwrap();
        let milli = registry.require(MILLILITER).unwrap();
        let piece = registry.require(PIECE).unwrap();

        assert_eq!(kilo.base_unit(), Some(&gram));
        assert_eq!(milli.base_unit(), Some(&liter));
        assert!(piece.is_base());
        assert_eq!(milli.convert_to(Decimal::from(250), &liter), Ok(Some(Decimal::new(25, 2))));
    }

    #[test]
    fn require_reports_missing_unit() {
        let registry = UnitRegistry::new();
        assert_eq!(
            registry.require("ounce").unwrap_err(),
            DomainError::not_found("unit 'ounce'")
        );
    }

    proptest! {
        /// Converting through the base is plain multiplication, exactly.
        #[test]
        fn conversion_is_exact_multiplication(
            qty in -1_000_000i64..1_000_000i64,
            factor_millis in 1i64..10_000_000i64,
        ) {
            let base = Arc::new(UnitOfMeasure::base("unit").unwrap());
            let factor = Decimal::new(factor_millis, 3);
            let derived = UnitOfMeasure::derived("pack", &base, factor).unwrap();

            let converted = convert(Decimal::from(qty), &derived, &base).unwrap().unwrap();
            prop_assert_eq!(converted, Decimal::from(qty) * factor);
        }
    }
}
