mod support;

use sim_core::dispatch::DispatchMode;
use sim_core::ecs::{DriverId, DriverStatusKind, RideRequestId, RideRequestStatus};
use sim_core::error::{EntityKind, SimError};
use sim_core::test_helpers::{advance_by, loc};
use support::fleet::{assigned, driver, request, ride, FleetBuilder};

fn req_id(name: &str) -> RideRequestId {
    RideRequestId(format!("req-{name}"))
}

#[test]
fn rejection_reassigns_to_next_best_driver() {
    let mut sim = FleetBuilder::new()
        .with_mode(DispatchMode::EtaOnly)
        .with_driver("a", 1, 0)
        .with_driver("b", 4, 0)
        .build();
    let req = ride(&mut sim, "r", loc(0, 0), loc(0, 5));
    assert_eq!(assigned(&req), Some("a"));

    let req = sim
        .reject_assignment(&req_id("r"), &DriverId::from("a"))
        .expect("reject");

    assert_eq!(req.status, RideRequestStatus::Assigned);
    assert_eq!(assigned(&req), Some("b"));
    assert_eq!(req.rejected_drivers, vec![DriverId::from("a")]);

    let a = driver(&sim, "a");
    assert_eq!(a.status, DriverStatusKind::Available);
    assert_eq!(a.current_ride_id, None);
    assert_eq!(a.target_location, None);
    assert!(!a.is_moving_to_pickup);

    let b = driver(&sim, "b");
    assert_eq!(b.current_ride_id, Some(req_id("r")));
    assert!(b.is_moving_to_pickup);
}

#[test]
fn rejection_by_sole_driver_leaves_request_waiting() {
    let mut sim = FleetBuilder::new().with_driver("solo", 2, 2).build();
    ride(&mut sim, "r", loc(0, 0), loc(1, 1));

    let req = sim
        .reject_assignment(&req_id("r"), &DriverId::from("solo"))
        .expect("reject");

    assert_eq!(req.status, RideRequestStatus::Waiting);
    assert_eq!(req.assigned_driver_id, None);
    assert_eq!(driver(&sim, "solo").status, DriverStatusKind::Available);
}

#[test]
fn rejecting_driver_is_never_reselected() {
    let mut sim = FleetBuilder::new()
        .with_mode(DispatchMode::EtaOnly)
        .with_driver("a", 0, 1)
        .with_driver("b", 0, 2)
        .build();
    ride(&mut sim, "r", loc(0, 0), loc(3, 3));

    let req = sim
        .reject_assignment(&req_id("r"), &DriverId::from("a"))
        .expect("first reject");
    assert_eq!(assigned(&req), Some("b"));

    // a is the only available driver now, but it already said no.
    let req = sim
        .reject_assignment(&req_id("r"), &DriverId::from("b"))
        .expect("second reject");
    assert_eq!(req.status, RideRequestStatus::Waiting);
    assert_eq!(
        req.rejected_drivers,
        vec![DriverId::from("a"), DriverId::from("b")]
    );
    assert_eq!(driver(&sim, "a").status, DriverStatusKind::Available);
    assert_eq!(driver(&sim, "b").status, DriverStatusKind::Available);
}

#[test]
fn rejection_of_unknown_request_is_not_found() {
    let mut sim = FleetBuilder::new().with_driver("a", 0, 0).build();
    let err = sim
        .reject_assignment(&req_id("missing"), &DriverId::from("a"))
        .expect_err("missing request");
    assert!(matches!(
        err,
        SimError::NotFound {
            kind: EntityKind::RideRequest,
            ..
        }
    ));
}

#[test]
fn rejection_by_unassigned_driver_changes_nothing() {
    let mut sim = FleetBuilder::new()
        .with_mode(DispatchMode::EtaOnly)
        .with_driver("a", 0, 1)
        .with_driver("b", 0, 9)
        .build();
    ride(&mut sim, "r", loc(0, 0), loc(3, 3));
    let before = sim.state();

    let err = sim
        .reject_assignment(&req_id("r"), &DriverId::from("b"))
        .expect_err("b is not assigned");

    assert_eq!(
        err,
        SimError::InvalidState("Driver not assigned to this ride".to_string())
    );
    assert_eq!(sim.state(), before);
}

#[test]
fn completed_request_cannot_be_rejected() {
    let mut sim = FleetBuilder::new().with_driver("a", 0, 0).build();
    ride(&mut sim, "r", loc(1, 0), loc(2, 0));
    advance_by(&mut sim, 2);
    assert_eq!(request(&sim, "r").status, RideRequestStatus::Completed);

    let err = sim
        .reject_assignment(&req_id("r"), &DriverId::from("a"))
        .expect_err("completed");
    assert!(matches!(err, SimError::InvalidState(_)));
    assert_eq!(request(&sim, "r").status, RideRequestStatus::Completed);
}

#[test]
fn stale_rejection_leaves_driver_on_its_next_trip() {
    let mut sim = FleetBuilder::new().with_driver("a", 0, 0).build();
    ride(&mut sim, "old", loc(1, 0), loc(2, 0));
    advance_by(&mut sim, 2);
    let next = ride(&mut sim, "new", loc(5, 0), loc(6, 0));
    assert_eq!(assigned(&next), Some("a"));

    let err = sim
        .reject_assignment(&req_id("old"), &DriverId::from("a"))
        .expect_err("old request is completed");
    assert!(matches!(err, SimError::InvalidState(_)));

    let a = driver(&sim, "a");
    assert_eq!(a.status, DriverStatusKind::OnTrip);
    assert_eq!(a.current_ride_id, Some(req_id("new")));
    assert_eq!(request(&sim, "new").status, RideRequestStatus::Assigned);
    assert_eq!(request(&sim, "old").rejected_drivers, Vec::<DriverId>::new());
}

#[test]
fn rejection_after_driver_deletion_still_redispatches() {
    let mut sim = FleetBuilder::new()
        .with_mode(DispatchMode::EtaOnly)
        .with_driver("gone", 0, 1)
        .with_driver("backup", 5, 5)
        .build();
    ride(&mut sim, "r", loc(0, 0), loc(3, 3));
    sim.delete_driver(&DriverId::from("gone")).expect("delete");

    // The request still points at the deleted driver.
    assert_eq!(assigned(&request(&sim, "r")), Some("gone"));

    let req = sim
        .reject_assignment(&req_id("r"), &DriverId::from("gone"))
        .expect("reject");
    assert_eq!(assigned(&req), Some("backup"));
    assert_eq!(req.rejected_drivers, vec![DriverId::from("gone")]);
}
