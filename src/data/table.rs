// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parameter binding table: the slots a processor reads and writes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::data::payload::MediaPayload;
use crate::errors::BindingError;
use crate::package::{PackageDescriptor, ParameterDescriptor, ParameterId};

/// Mapping from declared parameter identity to its current payload.
///
/// Only identities declared by the package can ever be keys. Output parameters
/// are seeded with an unset placeholder so they can be addressed before a run
/// produces them.
#[derive(Debug, Clone)]
pub struct BindingTable {
    package: Arc<PackageDescriptor>,
    slots: HashMap<ParameterId, MediaPayload>,
}

impl BindingTable {
    pub fn new(package: Arc<PackageDescriptor>) -> Self {
        let slots = package
            .outputs()
            .map(|parameter| (parameter.id.clone(), MediaPayload::unset()))
            .collect();
        Self { package, slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: &ParameterId) -> Option<&MediaPayload> {
        self.slots.get(id)
    }

    /// Validate and store a payload, overwriting any previous binding.
    pub fn bind(&mut self, id: ParameterId, payload: MediaPayload) -> Result<(), BindingError> {
        let parameter = self
            .package
            .parameter(&id)
            .ok_or_else(|| BindingError::UnknownParameter {
                parameter: id.to_string(),
            })?;

        if !parameter.permits(payload.mime_type()) {
            return Err(BindingError::MimeTypeMismatch {
                parameter: id.to_string(),
                mime_type: payload.mime_type().to_string(),
                permitted: parameter.mime_types.clone(),
            });
        }

        self.slots.insert(id, payload);
        Ok(())
    }

    /// Overwrite output slots with produced payloads. Callers pass only declared outputs.
    pub(crate) fn commit_outputs(&mut self, produced: Vec<(ParameterId, MediaPayload)>) {
        for (id, payload) in produced {
            self.slots.insert(id, payload);
        }
    }

    fn satisfies(&self, parameter: &ParameterDescriptor) -> bool {
        match self.slots.get(&parameter.id) {
            Some(payload) if parameter.permits(payload.mime_type()) => {
                parameter.is_output() || payload.has_content()
            }
            _ => false,
        }
    }

    /// Required parameters whose slot does not yet allow a run, in declaration order.
    pub fn missing_parameters(&self) -> Vec<ParameterId> {
        self.package
            .parameters
            .iter()
            .filter(|parameter| parameter.required && !self.satisfies(parameter))
            .map(|parameter| parameter.id.clone())
            .collect()
    }

    pub fn is_feasible(&self) -> bool {
        self.package
            .parameters
            .iter()
            .filter(|parameter| parameter.required)
            .all(|parameter| self.satisfies(parameter))
    }

    /// Bound inputs carrying content, in declaration order.
    pub fn bound_inputs(&self) -> impl Iterator<Item = (&ParameterDescriptor, &MediaPayload)> {
        self.package.inputs().filter_map(move |parameter| {
            self.slots
                .get(&parameter.id)
                .filter(|payload| payload.has_content())
                .map(|payload| (parameter, payload))
        })
    }

    /// Outputs the caller declared a MIME type for, in declaration order.
    pub fn declared_outputs(&self) -> impl Iterator<Item = (&ParameterDescriptor, &MediaPayload)> {
        self.package.outputs().filter_map(move |parameter| {
            self.slots
                .get(&parameter.id)
                .filter(|payload| payload.is_declared())
                .map(|payload| (parameter, payload))
        })
    }

    /// Every output slot, declared or not, in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = (&ParameterId, &MediaPayload)> {
        self.package
            .outputs()
            .filter_map(move |parameter| self.slots.get_key_value(&parameter.id))
    }
}
