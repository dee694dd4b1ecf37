use seatalloc::core::assignment::{AssignmentManager, SeatSeed};
use seatalloc::core::error::ErrorKind;
use seatalloc::core::model::{NewEmployee, SeatRef, SeatStatus};
use seatalloc::core::store::Store;
use seatalloc::plugins::seats::parse_seed;
use tempfile::tempdir;

fn seed(id: &str, status: SeatStatus) -> SeatSeed {
    SeatSeed {
        id: id.to_string(),
        status,
    }
}

fn employee(id: i64, name: &str, seat: &str) -> NewEmployee {
    NewEmployee {
        id,
        name: name.to_string(),
        role: "Analyst".to_string(),
        department: "Finance".to_string(),
        seat: SeatRef::parse(seat),
    }
}

#[test]
fn test_seed_is_additive() {
    let tmp = tempdir().unwrap();
    let mgr = AssignmentManager::open(&Store::new(tmp.path()), 5).unwrap();

    let inserted = mgr
        .seed_seats(&[seed("A1", SeatStatus::Vacant), seed("R1", SeatStatus::Reserved)])
        .unwrap();
    assert_eq!(inserted, 2);

    mgr.create_employee(employee(1, "Alice", "A1")).unwrap();
    // Re-seeding an occupied seat as vacant must not clobber it.
    let inserted = mgr
        .seed_seats(&[seed("a1", SeatStatus::Vacant), seed("A2", SeatStatus::Vacant)])
        .unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(mgr.seat_detail("A1").unwrap().status, SeatStatus::Occupied);

    let err = mgr
        .seed_seats(&[seed("X1", SeatStatus::Occupied)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    let err = mgr
        .seed_seats(&[seed("bad seat!", SeatStatus::Vacant)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(mgr.list_seats().unwrap().len(), 3);
}

#[test]
fn test_status_filters() {
    let tmp = tempdir().unwrap();
    let mgr = AssignmentManager::open(&Store::new(tmp.path()), 5).unwrap();
    mgr.seed_seats(&[
        seed("A1", SeatStatus::Vacant),
        seed("A2", SeatStatus::Vacant),
        seed("R1", SeatStatus::Reserved),
    ])
    .unwrap();
    mgr.create_employee(employee(1, "Alice", "A2")).unwrap();

    let ids = |status| -> Vec<String> {
        mgr.list_seats_by_status(status)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect()
    };
    assert_eq!(ids(SeatStatus::Vacant), vec!["A1".to_string()]);
    assert_eq!(ids(SeatStatus::Occupied), vec!["A2".to_string()]);
    assert_eq!(ids(SeatStatus::Reserved), vec!["R1".to_string()]);

    let occupied = mgr.list_seats_by_status(SeatStatus::Occupied).unwrap();
    assert_eq!(occupied[0].employee_id, Some(1));
}

#[test]
fn test_seat_detail_messages() {
    let tmp = tempdir().unwrap();
    let mgr = AssignmentManager::open(&Store::new(tmp.path()), 5).unwrap();
    mgr.seed_seats(&[seed("A1", SeatStatus::Vacant), seed("R1", SeatStatus::Reserved)])
        .unwrap();

    let reserved = mgr.seat_detail("R1").unwrap();
    assert_eq!(reserved.message.as_deref(), Some("Seat is reserved"));
    assert_eq!(reserved.employee_id, None);

    mgr.create_employee(employee(4, "Dana", "A1")).unwrap();
    let detail = mgr.seat_detail(" a1 ").unwrap();
    assert_eq!(detail.seat_id, "A1");
    assert_eq!(detail.employee_id, Some(4));
    assert_eq!(detail.department.as_deref(), Some("Finance"));
    assert_eq!(detail.message, None);

    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["seatId"], "A1");
    assert_eq!(json["status"], "OCCUPIED");
    assert_eq!(json["employeeName"], "Dana");
    assert!(json.get("message").is_none());

    let err = mgr.seat_detail("Nope").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SeatNotFound);
}

#[test]
fn test_seed_file_feeds_manager() {
    let tmp = tempdir().unwrap();
    let mgr = AssignmentManager::open(&Store::new(tmp.path()), 5).unwrap();
    let seeds = parse_seed(
        r#"
        [[seat]]
        id = "C1"

        [[seat]]
        id = "C2"
        status = "RESERVED"
        "#,
    )
    .unwrap();
    assert_eq!(mgr.seed_seats(&seeds).unwrap(), 2);
    assert_eq!(mgr.list_vacant_seats().unwrap().len(), 1);
}
