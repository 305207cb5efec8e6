//! # Solar-system bodies
//!
//! Bodies live in an arena, [`SolarSystem`], and refer to each other through stable
//! [`BodyId`]s. A body's parent must be inserted before it, so parent indices strictly
//! decrease towards the root and the hierarchy is acyclic by construction.
//!
//! A [`Body`] is immutable once inserted: per-instant state (positions, orientation
//! matrices) is computed on demand, and positions are memoised in a [`PositionCache`] owned
//! by the caller, typically an [`Observer`](crate::observers::Observer).
//!
//! ## Modules
//!
//! * [`rotation`] – equator orientation and sidereal time models,
//! * [`magnitude`] – visual magnitude laws and shadowing,
//! * [`cache`] – the bounded per-body position memo,
//! * [`approximate`] – built-in low-precision planetary and lunar theory,
//! * [`catalog`] – the default solar system.

pub mod approximate;
pub mod cache;
pub mod catalog;
pub mod magnitude;
pub mod rotation;

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use itertools::Itertools;
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::constants::JDE;
use crate::math::transform_vector;
use crate::orbit::{Orbit, StateVector};
use crate::units::Distance;

use self::cache::PositionCache;
use self::magnitude::{MagnitudeModel, Photometry};
use self::rotation::RotationModel;

/// Stable index of a body inside its [`SolarSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Closed set of body categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
    MinorPlanet,
    Comet,
    Dso,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BodyKind::Star => "star",
            BodyKind::Planet => "planet",
            BodyKind::Moon => "moon",
            BodyKind::MinorPlanet => "minor planet",
            BodyKind::Comet => "comet",
            BodyKind::Dso => "deep-sky object",
        };
        f.write_str(name)
    }
}

/// Planetary ring system, in the body's equatorial plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub inner_radius: Distance,
    pub outer_radius: Distance,
}

/// A body of the hierarchy.
#[derive(Debug, Clone)]
pub struct Body {
    name: String,
    kind: BodyKind,
    parent: Option<BodyId>,
    orbit: Option<Arc<dyn Orbit>>,
    rotation: RotationModel,
    ring: Option<Ring>,
    magnitude: MagnitudeModel,
    /// Equatorial radius.
    pub equatorial_radius: Distance,
    /// Flattening `(a − c)/a`.
    pub oblateness: f64,
    /// Geometric albedo.
    pub albedo: f64,
}

impl Body {
    /// A body with no orbit, no rotation and an albedo-based magnitude law.
    pub fn new(name: impl Into<String>, kind: BodyKind) -> Self {
        Body {
            name: name.into(),
            kind,
            parent: None,
            orbit: None,
            rotation: RotationModel::Fixed,
            ring: None,
            magnitude: MagnitudeModel::Albedo,
            equatorial_radius: Distance::ZERO,
            oblateness: 0.0,
            albedo: 0.0,
        }
    }

    pub fn with_parent(mut self, parent: BodyId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_orbit(mut self, orbit: impl Orbit + 'static) -> Self {
        self.orbit = Some(Arc::new(orbit));
        self
    }

    pub fn with_shared_orbit(mut self, orbit: Arc<dyn Orbit>) -> Self {
        self.orbit = Some(orbit);
        self
    }

    pub fn with_rotation(mut self, rotation: RotationModel) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_ring(mut self, ring: Ring) -> Self {
        self.ring = Some(ring);
        self
    }

    pub fn with_magnitude(mut self, magnitude: MagnitudeModel) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// Radius, oblateness and albedo in one go.
    pub fn with_figure(mut self, radius: Distance, oblateness: f64, albedo: f64) -> Self {
        self.equatorial_radius = radius;
        self.oblateness = oblateness;
        self.albedo = albedo;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn parent(&self) -> Option<BodyId> {
        self.parent
    }

    pub fn orbit(&self) -> Option<&Arc<dyn Orbit>> {
        self.orbit.as_ref()
    }

    pub fn rotation(&self) -> &RotationModel {
        &self.rotation
    }

    pub fn ring(&self) -> Option<&Ring> {
        self.ring.as_ref()
    }

    pub fn magnitude_model(&self) -> &MagnitudeModel {
        &self.magnitude
    }

    pub fn photometry(&self) -> Photometry {
        Photometry {
            radius: self.equatorial_radius,
            albedo: self.albedo,
        }
    }

    /// Sidereal orbital period in days.
    pub fn orbital_period(&self) -> Option<f64> {
        self.orbit.as_ref().and_then(|orbit| orbit.sidereal_period())
    }

    /// Ratio of the body's sidereal to mean solar day.
    pub fn day_ratio(&self) -> f64 {
        self.rotation.day_ratio(self.orbital_period())
    }
}

/// Arena owning every body of a hierarchy.
#[derive(Debug, Clone, Default)]
pub struct SolarSystem {
    bodies: Vec<Body>,
    by_name: HashMap<String, BodyId>,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arena from bodies listed parents-first.
    ///
    /// Errors
    /// ----------
    /// * [`AlmagestError::DuplicateBodyName`] when two bodies share a name.
    /// * [`AlmagestError::InvalidBodyHierarchy`] when a parent index does not precede its child.
    pub fn from_bodies(bodies: Vec<Body>) -> Result<Self, AlmagestError> {
        if let Some(name) = bodies.iter().map(|b| b.name.as_str()).duplicates().next() {
            return Err(AlmagestError::DuplicateBodyName(name.to_string()));
        }
        let mut system = SolarSystem::new();
        for body in bodies {
            system.add(body)?;
        }
        Ok(system)
    }

    /// Insert a body and return its id.
    pub fn add(&mut self, body: Body) -> Result<BodyId, AlmagestError> {
        let id = BodyId(self.bodies.len());
        if let Some(parent) = body.parent {
            if parent.0 >= id.0 {
                return Err(AlmagestError::InvalidBodyHierarchy {
                    body: body.name,
                    parent: parent.0,
                });
            }
        }
        if self.by_name.contains_key(&body.name) {
            return Err(AlmagestError::DuplicateBodyName(body.name));
        }
        log::debug!("registering {} '{}' as body {}", body.kind, body.name, id.0);
        self.by_name.insert(body.name.clone(), id);
        self.bodies.push(body);
        Ok(id)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Look a body up by its exact name.
    pub fn find(&self, name: &str) -> Result<BodyId, AlmagestError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AlmagestError::BodyNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        (0..self.bodies.len()).map(BodyId)
    }

    /// Direct children of `id`.
    pub fn children(&self, id: BodyId) -> impl Iterator<Item = BodyId> + '_ {
        self.ids().filter(move |&child| self[child].parent == Some(id))
    }

    /// Parent, grandparent, … of `id`, nearest first.
    pub fn ancestors(&self, id: BodyId) -> impl Iterator<Item = BodyId> + '_ {
        std::iter::successors(self[id].parent, move |&p| self[p].parent)
    }

    /// Position and velocity of `id` relative to its parent, zero for bodies without orbit.
    pub fn relative_state(&self, id: BodyId, jde: JDE) -> StateVector {
        self[id]
            .orbit
            .as_ref()
            .map_or_else(StateVector::default, |orbit| orbit.state_at(jde))
    }

    /// State of `id` relative to the root of its hierarchy, in VSOP87.
    pub fn heliocentric_state(&self, id: BodyId, jde: JDE, cache: &PositionCache) -> StateVector {
        cache.get_or_insert_with(id, jde, || {
            let own = self.relative_state(id, jde);
            match self[id].parent {
                Some(parent) => {
                    let base = self.heliocentric_state(parent, jde, cache);
                    StateVector::new(own.position + base.position, own.velocity + base.velocity)
                }
                None => own,
            }
        })
    }

    /// Rotation from the equatorial frame of `id` to VSOP87 at `jde`.
    ///
    /// Parent-relative orientations are composed up the hierarchy; star ancestors are already
    /// aligned with VSOP87 and end the chain.
    pub fn mat_equatorial_to_vsop87(&self, id: BodyId, jde: JDE, with_nutation: bool) -> Matrix4<f64> {
        let body = &self[id];
        let local = body.rotation.mat_local_to_parent(jde, with_nutation);
        match body.parent {
            Some(parent) if body.rotation.is_parent_relative() && self[parent].kind != BodyKind::Star => {
                self.mat_equatorial_to_vsop87(parent, jde, with_nutation) * local
            }
            _ => local,
        }
    }

    /// Unit rotation axis (north pole) of `id` in VSOP87.
    pub fn rotation_axis(&self, id: BodyId, jde: JDE, with_nutation: bool) -> Vector3<f64> {
        transform_vector(&self.mat_equatorial_to_vsop87(id, jde, with_nutation), &Vector3::z())
    }
}

impl Index<BodyId> for SolarSystem {
    type Output = Body;

    fn index(&self, id: BodyId) -> &Body {
        &self.bodies[id.0]
    }
}
