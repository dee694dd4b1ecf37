use seatalloc::core::assignment::{AssignmentManager, SeatSeed};
use seatalloc::core::error::{ErrorKind, SeatAllocError};
use seatalloc::core::model::{EmployeeUpdate, NewEmployee, Placement, SeatRef, SeatStatus};
use seatalloc::core::request::{EmployeeRequest, EmployeeUpdateRequest};
use seatalloc::core::store::Store;
use tempfile::{TempDir, tempdir};

fn setup(seats: &[(&str, SeatStatus)]) -> (TempDir, AssignmentManager) {
    let tmp = tempdir().unwrap();
    let mgr = AssignmentManager::open(&Store::new(tmp.path()), 5).unwrap();
    let seeds: Vec<SeatSeed> = seats
        .iter()
        .map(|(id, status)| SeatSeed {
            id: id.to_string(),
            status: *status,
        })
        .collect();
    mgr.seed_seats(&seeds).unwrap();
    (tmp, mgr)
}

fn new_employee(id: i64, name: &str, seat: &str) -> NewEmployee {
    NewEmployee {
        id,
        name: name.to_string(),
        role: "Engineer".to_string(),
        department: "R&D".to_string(),
        seat: SeatRef::parse(seat),
    }
}

fn move_to(seat: &str) -> EmployeeUpdate {
    EmployeeUpdate {
        name: "Alice".to_string(),
        role: "Engineer".to_string(),
        department: "R&D".to_string(),
        seat: Some(SeatRef::parse(seat)),
    }
}

fn seat_status(mgr: &AssignmentManager, id: &str) -> SeatStatus {
    mgr.seat_detail(id).unwrap().status
}

#[test]
fn test_create_assigns_vacant_seat() {
    let (_tmp, mgr) = setup(&[("A1", SeatStatus::Vacant), ("A2", SeatStatus::Vacant)]);

    let out = mgr.create_employee(new_employee(1, "Alice", "A1")).unwrap();
    assert_eq!(out.message, "Employee assigned to seat A1");

    let alice = mgr.get_employee(1).unwrap().expect("employee 1");
    assert_eq!(alice.seat, SeatRef::Seat("A1".to_string()));

    let vacant: Vec<String> = mgr
        .list_vacant_seats()
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(vacant, vec!["A2".to_string()]);

    let detail = mgr.seat_detail("A1").unwrap();
    assert_eq!(detail.status, SeatStatus::Occupied);
    assert_eq!(detail.employee_id, Some(1));
    assert_eq!(detail.employee_name.as_deref(), Some("Alice"));
}

#[test]
fn test_update_to_work_from_home_frees_seat() {
    let (_tmp, mgr) = setup(&[("A1", SeatStatus::Vacant)]);
    mgr.create_employee(new_employee(1, "Alice", "A1")).unwrap();

    let out = mgr.update_employee(1, move_to("Work From Home")).unwrap();
    assert_eq!(out.message, "Employee updated successfully");
    assert_eq!(out.employee.seat, SeatRef::WorkFromHome);

    let detail = mgr.seat_detail("A1").unwrap();
    assert_eq!(detail.status, SeatStatus::Vacant);
    assert_eq!(detail.employee_id, None);
    assert_eq!(detail.message.as_deref(), Some("Seat is vacant"));
}

#[test]
fn test_delete_releases_seat() {
    let (_tmp, mgr) = setup(&[("B2", SeatStatus::Vacant)]);
    mgr.create_employee(new_employee(1, "Alice", "B2")).unwrap();
    assert_eq!(seat_status(&mgr, "B2"), SeatStatus::Occupied);

    let message = mgr.delete_employee(1).unwrap();
    assert_eq!(message, "Employee 'Alice' (ID: 1) deleted successfully.");
    assert_eq!(seat_status(&mgr, "B2"), SeatStatus::Vacant);
    assert!(mgr.list_employees().unwrap().iter().all(|e| e.id != 1));

    let err = mgr.delete_employee(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmployeeNotFound);
}

#[test]
fn test_create_on_occupied_seat_is_rejected() {
    let (_tmp, mgr) = setup(&[("A1", SeatStatus::Vacant)]);
    mgr.create_employee(new_employee(1, "Alice", "A1")).unwrap();

    let err = mgr.create_employee(new_employee(2, "Bob", "A1")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SeatUnavailable);
    assert_eq!(
        err.to_string(),
        "Seat A1 is already occupied! Please select a different seat."
    );
    assert!(mgr.get_employee(2).unwrap().is_none());
    assert_eq!(mgr.seat_detail("A1").unwrap().employee_id, Some(1));
}

#[test]
fn test_create_rejects_unknown_seat_and_duplicate_id() {
    let (_tmp, mgr) = setup(&[("A1", SeatStatus::Vacant), ("A2", SeatStatus::Vacant)]);

    let err = mgr.create_employee(new_employee(1, "Alice", "Z9")).unwrap_err();
    assert!(matches!(err, SeatAllocError::SeatNotFound(ref s) if s == "Z9"));
    assert!(mgr.get_employee(1).unwrap().is_none());

    mgr.create_employee(new_employee(1, "Alice", "A1")).unwrap();
    let err = mgr.create_employee(new_employee(1, "Alice Again", "A2")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    // The rejected duplicate must not have taken A2.
    assert_eq!(seat_status(&mgr, "A2"), SeatStatus::Vacant);
}

#[test]
fn test_create_with_sentinels_touches_no_seat() {
    let (_tmp, mgr) = setup(&[("A1", SeatStatus::Vacant)]);

    let out = mgr.create_employee(new_employee(1, "Alice", "")).unwrap();
    assert_eq!(out.employee.seat, SeatRef::Unassigned);
    assert_eq!(out.message, "Employee assigned to Unassigned");

    let out = mgr
        .create_employee(new_employee(2, "Bob", "work from home"))
        .unwrap();
    assert_eq!(out.employee.seat, SeatRef::WorkFromHome);

    assert_eq!(seat_status(&mgr, "A1"), SeatStatus::Vacant);
    assert!(mgr.get_employee_by_seat("Work From Home").unwrap().is_none());
}

#[test]
fn test_update_moves_between_seats() {
    let (_tmp, mgr) = setup(&[("A1", SeatStatus::Vacant), ("A2", SeatStatus::Vacant)]);
    mgr.create_employee(new_employee(1, "Alice", "A1")).unwrap();

    let out = mgr.update_employee(1, move_to("a2")).unwrap();
    assert_eq!(out.employee.seat, SeatRef::Seat("A2".to_string()));
    assert_eq!(seat_status(&mgr, "A1"), SeatStatus::Vacant);
    assert_eq!(mgr.seat_detail("A2").unwrap().employee_id, Some(1));

    let by_seat = mgr.get_employee_by_seat("A2").unwrap().expect("occupant");
    assert_eq!(by_seat.id, 1);
    assert!(mgr.get_employee_by_seat("A1").unwrap().is_none());
}

#[test]
fn test_update_to_same_seat_only_changes_details() {
    let (_tmp, mgr) = setup(&[("A1", SeatStatus::Vacant)]);
    mgr.create_employee(new_employee(1, "Alice", "A1")).unwrap();

    let mut update = move_to("A1");
    update.role = "Lead".to_string();
    let out = mgr.update_employee(1, update).unwrap();
    assert_eq!(out.employee.role, "Lead");
    assert_eq!(mgr.seat_detail("A1").unwrap().employee_id, Some(1));

    let keep = EmployeeUpdate {
        seat: None,
        ..move_to("ignored")
    };
    let out = mgr.update_employee(1, keep).unwrap();
    assert_eq!(out.employee.seat, SeatRef::Seat("A1".to_string()));
}

#[test]
fn test_rejected_update_changes_nothing() {
    let (_tmp, mgr) = setup(&[
        ("A1", SeatStatus::Vacant),
        ("A2", SeatStatus::Vacant),
        ("R1", SeatStatus::Reserved),
    ]);
    mgr.create_employee(new_employee(1, "Alice", "A1")).unwrap();
    mgr.create_employee(new_employee(2, "Bob", "A2")).unwrap();

    let mut update = move_to("A2");
    update.name = "Renamed".to_string();
    let err = mgr.update_employee(1, update).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SeatUnavailable);

    let err = mgr.update_employee(1, move_to("R1")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SeatUnavailable);
    assert!(err.to_string().contains("reserved"));

    let alice = mgr.get_employee(1).unwrap().unwrap();
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.seat, SeatRef::Seat("A1".to_string()));
    assert_eq!(mgr.seat_detail("A1").unwrap().employee_id, Some(1));
    assert_eq!(seat_status(&mgr, "R1"), SeatStatus::Reserved);

    let err = mgr.update_employee(99, move_to("A1")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmployeeNotFound);
}

#[test]
fn test_release_is_idempotent() {
    let (_tmp, mgr) = setup(&[("A1", SeatStatus::Vacant)]);
    mgr.create_employee(new_employee(1, "Alice", "A1")).unwrap();

    let released = mgr.release_seat_by_employee(1).unwrap().expect("seat");
    assert_eq!(released.id, "A1");
    assert_eq!(released.status, SeatStatus::Vacant);
    assert_eq!(mgr.get_employee(1).unwrap().unwrap().seat, SeatRef::Unassigned);

    assert!(mgr.release_seat_by_employee(1).unwrap().is_none());
    assert!(mgr.release_seat_by_employee(42).unwrap().is_none());
    assert_eq!(seat_status(&mgr, "A1"), SeatStatus::Vacant);
}

#[test]
fn test_search_placement_and_report() {
    let (_tmp, mgr) = setup(&[("A1", SeatStatus::Vacant)]);
    mgr.create_employee(new_employee(1, "Alice", "A1")).unwrap();
    mgr.create_employee(NewEmployee {
        department: "Finance".to_string(),
        ..new_employee(2, "Bob", "Work From Home")
    })
    .unwrap();
    mgr.create_employee(new_employee(3, "Carol", "Unassigned"))
        .unwrap();

    let hits = mgr.search_employees("finance").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 2);
    assert_eq!(mgr.search_employees("  ").unwrap().len(), 3);

    let seated = mgr.list_employees_by_placement(Placement::Seated).unwrap();
    assert_eq!(seated.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1]);
    let remote = mgr
        .list_employees_by_placement(Placement::WorkFromHome)
        .unwrap();
    assert_eq!(remote.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2]);
    let unassigned = mgr
        .list_employees_by_placement(Placement::Unassigned)
        .unwrap();
    assert_eq!(unassigned.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3]);

    let report = mgr.seating_report().unwrap();
    assert_eq!(report.len(), 3);
    assert_eq!(report[1].seat, "Work From Home");
}

#[test]
fn test_request_validation_messages() {
    let missing_id = EmployeeRequest {
        name: Some("Alice".to_string()),
        ..Default::default()
    };
    let err = missing_id.validate().unwrap_err();
    assert_eq!(err.to_string(), "Employee ID is required");

    let bad_id = EmployeeRequest::from_json(
        r#"{"employeeid": "abc", "name": "Alice", "role": "Engineer", "department": "R&D"}"#,
    )
    .unwrap();
    assert_eq!(
        bad_id.validate().unwrap_err().to_string(),
        "Invalid Employee ID format. It must be a number."
    );

    let no_name = EmployeeRequest::from_json(
        r#"{"employeeid": 5, "name": "   ", "role": "Engineer", "department": "R&D"}"#,
    )
    .unwrap();
    assert_eq!(
        no_name.validate().unwrap_err().kind(),
        ErrorKind::ValidationFailed
    );

    let ok = EmployeeRequest::from_json(
        r#"{"employeeid": "7", "name": "Dee", "role": "QA", "department": "R&D", "seatId": "work from home"}"#,
    )
    .unwrap()
    .validate()
    .unwrap();
    assert_eq!(ok.id, 7);
    assert_eq!(ok.seat, SeatRef::WorkFromHome);

    let update = EmployeeUpdateRequest::from_json(
        r#"{"name": "Dee", "role": "QA", "department": "R&D"}"#,
    )
    .unwrap()
    .validate()
    .unwrap();
    assert_eq!(update.seat, None);
}
