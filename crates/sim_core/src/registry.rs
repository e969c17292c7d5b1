//! Entity registry: identifier lookup and creation order for drivers, riders and
//! ride requests living in the ECS [World].
//!
//! Entities are spawned once and mutated in place by the systems. Drivers and
//! riders can be removed at any time; removal does not touch ride requests that
//! still reference them.

use std::collections::HashMap;

use bevy_ecs::prelude::{Component, Entity, Resource, World};

use crate::ecs::{Driver, DriverId, RideRequest, RideRequestId, Rider, RiderId, SpawnSeq};
use crate::error::{EntityKind, SimError};
use crate::spatial::Location;

/// External id -> entity maps plus the creation sequence counter.
#[derive(Debug, Default, Resource)]
pub struct EntityIndex {
    drivers: HashMap<DriverId, Entity>,
    riders: HashMap<RiderId, Entity>,
    ride_requests: HashMap<RideRequestId, Entity>,
    next_seq: u64,
}

impl EntityIndex {
    pub fn driver(&self, id: &DriverId) -> Option<Entity> {
        self.drivers.get(id).copied()
    }

    pub fn rider(&self, id: &RiderId) -> Option<Entity> {
        self.riders.get(id).copied()
    }

    pub fn ride_request(&self, id: &RideRequestId) -> Option<Entity> {
        self.ride_requests.get(id).copied()
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    pub fn rider_count(&self) -> usize {
        self.riders.len()
    }

    pub fn ride_request_count(&self) -> usize {
        self.ride_requests.len()
    }

    fn next_seq(&mut self) -> SpawnSeq {
        let seq = SpawnSeq(self.next_seq);
        self.next_seq += 1;
        seq
    }
}

pub fn spawn_driver(world: &mut World, id: DriverId, location: Location) -> Result<Entity, SimError> {
    if world.resource::<EntityIndex>().driver(&id).is_some() {
        return Err(SimError::duplicate(EntityKind::Driver, &id));
    }
    let seq = world.resource_mut::<EntityIndex>().next_seq();
    let entity = world.spawn((Driver::new(id.clone(), location), seq)).id();
    world.resource_mut::<EntityIndex>().drivers.insert(id, entity);
    Ok(entity)
}

pub fn spawn_rider(
    world: &mut World,
    id: RiderId,
    pickup_location: Location,
    dropoff_location: Location,
) -> Result<Entity, SimError> {
    if world.resource::<EntityIndex>().rider(&id).is_some() {
        return Err(SimError::duplicate(EntityKind::Rider, &id));
    }
    let seq = world.resource_mut::<EntityIndex>().next_seq();
    let rider = Rider {
        id: id.clone(),
        pickup_location,
        dropoff_location,
    };
    let entity = world.spawn((rider, seq)).id();
    world.resource_mut::<EntityIndex>().riders.insert(id, entity);
    Ok(entity)
}

/// Creates a waiting ride request for `rider_id`, copying its pickup and dropoff.
pub fn spawn_ride_request(
    world: &mut World,
    id: RideRequestId,
    rider_id: &RiderId,
) -> Result<Entity, SimError> {
    let index = world.resource::<EntityIndex>();
    if index.ride_request(&id).is_some() {
        return Err(SimError::duplicate(EntityKind::RideRequest, &id));
    }
    let rider = index
        .rider(rider_id)
        .and_then(|entity| world.get::<Rider>(entity))
        .ok_or_else(|| SimError::not_found(EntityKind::Rider, rider_id))?;
    let request = RideRequest::new(id.clone(), rider);

    let seq = world.resource_mut::<EntityIndex>().next_seq();
    let entity = world.spawn((request, seq)).id();
    world
        .resource_mut::<EntityIndex>()
        .ride_requests
        .insert(id, entity);
    Ok(entity)
}

pub fn despawn_driver(world: &mut World, id: &DriverId) -> Result<(), SimError> {
    let entity = world
        .resource_mut::<EntityIndex>()
        .drivers
        .remove(id)
        .ok_or_else(|| SimError::not_found(EntityKind::Driver, id))?;
    world.despawn(entity);
    Ok(())
}

pub fn despawn_rider(world: &mut World, id: &RiderId) -> Result<(), SimError> {
    let entity = world
        .resource_mut::<EntityIndex>()
        .riders
        .remove(id)
        .ok_or_else(|| SimError::not_found(EntityKind::Rider, id))?;
    world.despawn(entity);
    Ok(())
}

/// All components of type `T`, in creation order.
pub fn components_in_spawn_order<T: Component>(world: &World) -> Vec<&T> {
    let mut rows: Vec<(SpawnSeq, &T)> = world
        .iter_entities()
        .filter_map(|entity| Some((*entity.get::<SpawnSeq>()?, entity.get::<T>()?)))
        .collect();
    rows.sort_by_key(|(seq, _)| *seq);
    rows.into_iter().map(|(_, component)| component).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_world;

    #[test]
    fn spawn_and_lookup_by_external_id() {
        let mut world = create_test_world();
        let entity = spawn_driver(&mut world, DriverId::from("d1"), Location::new(1, 1))
            .expect("spawn driver");

        let index = world.resource::<EntityIndex>();
        assert_eq!(index.driver(&DriverId::from("d1")), Some(entity));
        assert_eq!(index.driver_count(), 1);
        assert_eq!(
            world.get::<Driver>(entity).map(|d| d.location),
            Some(Location::new(1, 1))
        );
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let mut world = create_test_world();
        spawn_driver(&mut world, DriverId::from("d1"), Location::new(0, 0)).expect("first");
        let err = spawn_driver(&mut world, DriverId::from("d1"), Location::new(5, 5))
            .expect_err("duplicate");
        assert!(matches!(err, SimError::DuplicateId { kind: EntityKind::Driver, .. }));
        assert_eq!(world.resource::<EntityIndex>().driver_count(), 1);
    }

    #[test]
    fn ride_request_requires_existing_rider() {
        let mut world = create_test_world();
        let err = spawn_ride_request(&mut world, RideRequestId::from("q1"), &RiderId::from("nope"))
            .expect_err("rider missing");
        assert_eq!(err, SimError::not_found(EntityKind::Rider, "nope"));
        assert_eq!(world.resource::<EntityIndex>().ride_request_count(), 0);
    }

    #[test]
    fn despawn_missing_driver_is_not_found() {
        let mut world = create_test_world();
        let err = despawn_driver(&mut world, &DriverId::from("ghost")).expect_err("missing");
        assert!(matches!(err, SimError::NotFound { kind: EntityKind::Driver, .. }));
    }

    #[test]
    fn spawn_order_survives_deletion() {
        let mut world = create_test_world();
        for id in ["a", "b", "c", "d"] {
            spawn_driver(&mut world, DriverId::from(id), Location::new(0, 0)).expect("spawn");
        }
        despawn_driver(&mut world, &DriverId::from("b")).expect("despawn");
        spawn_driver(&mut world, DriverId::from("e"), Location::new(0, 0)).expect("spawn");

        let ids: Vec<&str> = components_in_spawn_order::<Driver>(&world)
            .into_iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c", "d", "e"]);
    }
}
