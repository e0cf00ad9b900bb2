//! Named parallel arrays describing N independent problem instances.

use crate::error::{ComponentError, ComponentResult};
use crate::quantity::Quantity;
use crate::settings::HydraulicSettings;
use hy_core::Real;
use hy_core::units::{Length, VolumeRate, lengths_si, volume_rates_si};
use std::collections::BTreeMap;
use uom::si::length::meter;
use uom::si::volume_rate::cubic_meter_per_second;

/// Batch of hydraulic problems sharing one set of scalar settings.
///
/// Every stored array has exactly `len` entries. Quantities a solver does
/// not read are ignored; solvers write their outputs back through
/// [`ProblemBatch::solve`](crate::ProblemBatch::solve), replacing any
/// previous array under the same quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemBatch {
    len: usize,
    arrays: BTreeMap<Quantity, Vec<Real>>,
    settings: HydraulicSettings,
}

impl ProblemBatch {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            arrays: BTreeMap::new(),
            settings: HydraulicSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: HydraulicSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &HydraulicSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut HydraulicSettings {
        &mut self.settings
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store an array, replacing the previous one.
    pub fn set(&mut self, quantity: Quantity, values: Vec<Real>) -> ComponentResult<()> {
        if values.len() != self.len {
            return Err(ComponentError::LengthMismatch {
                quantity,
                expected: self.len,
                actual: values.len(),
            });
        }
        self.arrays.insert(quantity, values);
        Ok(())
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, quantity: Quantity, values: Vec<Real>) -> ComponentResult<Self> {
        self.set(quantity, values)?;
        Ok(self)
    }

    /// Store typed lengths in metres.
    pub fn set_lengths(&mut self, quantity: Quantity, values: &[Length]) -> ComponentResult<()> {
        self.set(quantity, lengths_si(values))
    }

    /// Store typed discharges in m³/s.
    pub fn set_discharges(
        &mut self,
        quantity: Quantity,
        values: &[VolumeRate],
    ) -> ComponentResult<()> {
        self.set(quantity, volume_rates_si(values))
    }

    /// Read an array back as typed lengths.
    pub fn lengths(&self, quantity: Quantity) -> Option<Vec<Length>> {
        self.get(quantity)
            .map(|v| v.iter().map(|x| Length::new::<meter>(*x)).collect())
    }

    /// Read an array back as typed discharges.
    pub fn discharges(&self, quantity: Quantity) -> Option<Vec<VolumeRate>> {
        self.get(quantity).map(|v| {
            v.iter()
                .map(|x| VolumeRate::new::<cubic_meter_per_second>(*x))
                .collect()
        })
    }

    /// Broadcast one value to every instance.
    pub fn fill(&mut self, quantity: Quantity, value: Real) {
        self.arrays.insert(quantity, vec![value; self.len]);
    }

    pub fn get(&self, quantity: Quantity) -> Option<&[Real]> {
        self.arrays.get(&quantity).map(Vec::as_slice)
    }

    pub fn require(&self, quantity: Quantity) -> ComponentResult<&[Real]> {
        self.get(quantity)
            .ok_or(ComponentError::MissingQuantity { quantity })
    }

    pub fn remove(&mut self, quantity: Quantity) -> Option<Vec<Real>> {
        self.arrays.remove(&quantity)
    }

    pub fn contains(&self, quantity: Quantity) -> bool {
        self.arrays.contains_key(&quantity)
    }

    /// Quantities currently stored, in declaration order.
    pub fn quantities(&self) -> impl Iterator<Item = Quantity> + '_ {
        self.arrays.keys().copied()
    }

    pub(crate) fn store(&mut self, quantity: Quantity, values: Vec<Real>) {
        debug_assert_eq!(values.len(), self.len);
        self.arrays.insert(quantity, values);
    }
}
